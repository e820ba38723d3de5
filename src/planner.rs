//! Slide planning.
//!
//! Turns a [`Dataset`] into the complete, ordered [`SlidePlan`]: title slide,
//! one intro slide per category, the grid table slide, then one question slide
//! per (category, point column) in row-major order. No I/O happens here.

use std::collections::HashMap;

use tracing::debug;

use crate::config::DeckConfig;
use crate::error::{DeckError, Result};
use crate::types::{Dataset, PointColumn, QuestionSlot, SlidePlan, SlidePlanEntry, SlideRole};

/// Number of slides a dataset of `rows` categories produces.
#[must_use]
pub const fn slide_count(rows: usize) -> usize {
    1 + rows + 1 + rows * PointColumn::COUNT
}

/// Check the structural invariants the plan relies on.
///
/// Fails with `EmptyDataset`, `BlankCategory`, `MalformedRow` or
/// `DuplicateCategory`, in that order of precedence per row.
pub fn validate(dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        return Err(DeckError::EmptyDataset);
    }

    let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(dataset.len());
    for (row, entry) in dataset.rows.iter().enumerate() {
        if entry.category.trim().is_empty() {
            return Err(DeckError::BlankCategory { row });
        }
        if entry.values.len() != PointColumn::COUNT {
            return Err(DeckError::MalformedRow {
                row,
                expected: PointColumn::COUNT,
                found: entry.values.len(),
            });
        }
        if let Some(&first_row) = first_seen.get(entry.category.as_str()) {
            return Err(DeckError::DuplicateCategory {
                label: entry.category.clone(),
                first_row,
                row,
            });
        }
        first_seen.insert(entry.category.as_str(), row);
    }
    Ok(())
}

/// Build the slide plan for `dataset`.
pub fn plan(dataset: &Dataset, config: &DeckConfig) -> Result<SlidePlan> {
    validate(dataset)?;

    let rows = dataset.len();
    let mut entries = Vec::with_capacity(slide_count(rows));
    let mut ordinal = 0;
    let mut push = |role: SlideRole| {
        ordinal += 1;
        entries.push(SlidePlanEntry { ordinal, role });
    };

    push(SlideRole::Title);

    for (row, entry) in dataset.rows.iter().enumerate() {
        push(SlideRole::CategoryIntro {
            row,
            category: entry.category.clone(),
        });
    }

    push(SlideRole::GridTable);

    for (row, entry) in dataset.rows.iter().enumerate() {
        for (column, question) in PointColumn::ALL.into_iter().zip(&entry.values) {
            push(SlideRole::Question(QuestionSlot {
                row,
                column,
                category: entry.category.clone(),
                points: config.points_label(column),
                question: question.clone(),
            }));
        }
    }

    debug!(rows, slides = entries.len(), "planned deck");

    Ok(SlidePlan {
        entries,
        categories: rows,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{DatasetRow, RoleKind};
    use test_case::test_case;

    fn row(category: &str) -> DatasetRow {
        DatasetRow::new(category, ["q1", "q2", "q3", "q4", "q5"])
    }

    #[test_case(1, 8 ; "one row")]
    #[test_case(2, 14 ; "two rows")]
    #[test_case(6, 38 ; "full board")]
    fn test_slide_count(rows: usize, expected: usize) {
        assert_eq!(slide_count(rows), expected);
        let dataset = Dataset::new((0..rows).map(|i| row(&format!("C{i}"))).collect());
        let plan = plan(&dataset, &DeckConfig::default()).unwrap();
        assert_eq!(plan.len(), expected);
    }

    #[test]
    fn test_topology() {
        let dataset = Dataset::new(vec![row("History"), row("Science")]);
        let plan = plan(&dataset, &DeckConfig::default()).unwrap();
        let kinds: Vec<RoleKind> = plan.entries().iter().map(|e| e.role.kind()).collect();
        assert_eq!(kinds[0], RoleKind::Title);
        assert_eq!(kinds[1..3], [RoleKind::CategoryIntro, RoleKind::CategoryIntro]);
        assert_eq!(kinds[3], RoleKind::GridTable);
        assert!(kinds[4..].iter().all(|k| *k == RoleKind::Question));
        assert_eq!(plan.grid_ordinal(), 4);
        assert_eq!(plan.first_question_ordinal(), 5);
        assert_eq!(plan.entries()[3].ordinal, plan.grid_ordinal());
    }

    #[test]
    fn test_questions_are_row_major() {
        let dataset = Dataset::new(vec![row("History"), row("Science")]);
        let plan = plan(&dataset, &DeckConfig::default()).unwrap();
        let order: Vec<(usize, usize)> = plan.questions().map(|q| (q.row, q.column.index())).collect();
        let expected: Vec<(usize, usize)> =
            (0..2).flat_map(|r| (0..5).map(move |c| (r, c))).collect();
        assert_eq!(order, expected);

        let sixth = plan.questions().nth(5).unwrap();
        assert_eq!(sixth.category, "Science");
        assert_eq!(sixth.points, "200");
        assert_eq!(sixth.question, "q1");
    }

    #[test]
    fn test_ordinals_contiguous() {
        let dataset = Dataset::new(vec![row("A"), row("B"), row("C")]);
        let plan = plan(&dataset, &DeckConfig::default()).unwrap();
        for (i, entry) in plan.entries().iter().enumerate() {
            assert_eq!(entry.ordinal, i + 1);
        }
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = plan(&Dataset::default(), &DeckConfig::default()).unwrap_err();
        assert!(matches!(err, DeckError::EmptyDataset));
    }

    #[test]
    fn test_short_row_rejected() {
        let dataset = Dataset::new(vec![row("A"), DatasetRow::new("B", ["only", "four", "of", "them"])]);
        match plan(&dataset, &DeckConfig::default()) {
            Err(DeckError::MalformedRow { row, expected, found }) => {
                assert_eq!((row, expected, found), (1, 5, 4));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let dataset = Dataset::new(vec![row("History"), row("Art"), row("History")]);
        match plan(&dataset, &DeckConfig::default()) {
            Err(DeckError::DuplicateCategory { label, first_row, row }) => {
                assert_eq!(label, "History");
                assert_eq!((first_row, row), (0, 2));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_blank_category_rejected() {
        let dataset = Dataset::new(vec![row("History"), row("  ")]);
        assert!(matches!(
            plan(&dataset, &DeckConfig::default()),
            Err(DeckError::BlankCategory { row: 1 })
        ));
    }
}
