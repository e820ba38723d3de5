use serde::{Deserialize, Serialize};

/// One category row of the question table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRow {
    /// Category label, shown on the intro slide and in grid column 0
    pub category: String,
    /// Question text per point column, left to right
    pub values: Vec<String>,
}

impl DatasetRow {
    pub fn new<C, I, V>(category: C, values: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            category: category.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// The question table as read from the tabular source.
///
/// Rows keep their source order; that order drives slide order and grid rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub rows: Vec<DatasetRow>,
}

impl Dataset {
    #[must_use]
    pub fn new(rows: Vec<DatasetRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Category labels in row order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.category.as_str())
    }
}
