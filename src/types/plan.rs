use serde::Serialize;
use std::fmt;

/// The five point columns of the board, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PointColumn {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl PointColumn {
    /// Number of point columns on every board.
    pub const COUNT: usize = 5;

    /// All columns in board order.
    pub const ALL: [PointColumn; Self::COUNT] = [
        PointColumn::First,
        PointColumn::Second,
        PointColumn::Third,
        PointColumn::Fourth,
        PointColumn::Fifth,
    ];

    /// 0-based position among the point columns.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PointColumn::First => 0,
            PointColumn::Second => 1,
            PointColumn::Third => 2,
            PointColumn::Fourth => 3,
            PointColumn::Fifth => 4,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Internal hyperlink address naming one slide of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Anchor(String);

impl Anchor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A (row, column) position in the grid table. Column 0 is the category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Everything needed to build one question slide and its grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSlot {
    /// Dataset row index; the stable identity of the category
    pub row: usize,
    pub column: PointColumn,
    pub category: String,
    /// Point value as displayed, e.g. "400"
    pub points: String,
    pub question: String,
}

/// What a slide is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum SlideRole {
    Title,
    CategoryIntro { row: usize, category: String },
    GridTable,
    Question(QuestionSlot),
}

impl SlideRole {
    #[must_use]
    pub fn kind(&self) -> RoleKind {
        match self {
            SlideRole::Title => RoleKind::Title,
            SlideRole::CategoryIntro { .. } => RoleKind::CategoryIntro,
            SlideRole::GridTable => RoleKind::GridTable,
            SlideRole::Question(_) => RoleKind::Question,
        }
    }
}

/// Data-free discriminant of [`SlideRole`], used to pick layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RoleKind {
    Title,
    CategoryIntro,
    GridTable,
    Question,
}

/// One slide of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlidePlanEntry {
    /// 1-based position in the final deck
    pub ordinal: usize,
    #[serde(flatten)]
    pub role: SlideRole,
}

impl SlidePlanEntry {
    #[must_use]
    pub fn question(&self) -> Option<&QuestionSlot> {
        match &self.role {
            SlideRole::Question(slot) => Some(slot),
            _ => None,
        }
    }
}

/// The ordered slide list computed before any document mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlidePlan {
    pub(crate) entries: Vec<SlidePlanEntry>,
    pub(crate) categories: usize,
}

impl SlidePlan {
    #[must_use]
    pub fn entries(&self) -> &[SlidePlanEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of category rows, which is also the grid table's row count.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories
    }

    /// Ordinal of the grid table slide.
    #[must_use]
    pub fn grid_ordinal(&self) -> usize {
        self.categories + 2
    }

    /// Ordinal of the first question slide.
    #[must_use]
    pub fn first_question_ordinal(&self) -> usize {
        self.categories + 3
    }

    /// Question entries in ordinal order.
    pub fn questions(&self) -> impl Iterator<Item = &QuestionSlot> {
        self.entries.iter().filter_map(SlidePlanEntry::question)
    }

    /// Grid table shape as (rows, columns).
    #[must_use]
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.categories, PointColumn::COUNT + 1)
    }
}
