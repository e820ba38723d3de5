//! Slide addressing.
//!
//! Maps a question slot to the anchor of its slide and to its cell in the grid
//! table, and maps grid cells back to slots.

use crate::config::DeckConfig;
use crate::types::{Anchor, GridCell, PointColumn, QuestionSlot, SlidePlan};

/// Anchor of the slide holding `slot`: `"<category> - <points>"`.
#[must_use]
pub fn anchor_for(slot: &QuestionSlot) -> Anchor {
    Anchor::new(format!("{} - {}", slot.category, slot.points))
}

/// Grid cell showing `slot`. Column 0 holds the category label, so point
/// columns are shifted right by one.
#[must_use]
pub fn grid_cell_for(slot: &QuestionSlot) -> GridCell {
    GridCell::new(slot.row, slot.column.index() + 1)
}

/// Anchor of the grid table slide, the target of every back link.
#[must_use]
pub fn grid_anchor(config: &DeckConfig) -> Anchor {
    Anchor::new(config.main_slide_name.clone())
}

/// The question slot occupying `cell`, if any.
///
/// Inverse of [`grid_cell_for`]: returns `None` for the category column and
/// for cells outside the grid.
#[must_use]
pub fn question_at(plan: &SlidePlan, cell: GridCell) -> Option<&QuestionSlot> {
    let column = PointColumn::from_index(cell.column.checked_sub(1)?)?;
    if cell.row >= plan.category_count() {
        return None;
    }
    // Questions are row-major, five per row
    let offset = plan.first_question_ordinal() - 1 + cell.row * PointColumn::COUNT + column.index();
    plan.entries()
        .get(offset)
        .and_then(|entry| entry.question())
        .filter(|slot| slot.row == cell.row && slot.column == column)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::planner::plan;
    use crate::types::{Dataset, DatasetRow};
    use std::collections::HashSet;

    fn history_science() -> SlidePlan {
        let config = DeckConfig {
            point_values: [100, 200, 300, 400, 500],
            ..DeckConfig::default()
        };
        let dataset = Dataset::new(vec![
            DatasetRow::new("History", ["h1", "h2", "h3", "h4", "h5"]),
            DatasetRow::new("Science", ["s1", "s2", "s3", "s4", "s5"]),
        ]);
        plan(&dataset, &config).unwrap()
    }

    #[test]
    fn test_anchor_format() {
        let plan = history_science();
        let slot = question_at(&plan, GridCell::new(0, 3)).unwrap();
        assert_eq!(anchor_for(slot).as_str(), "History - 300");
        assert_eq!(slot.question, "h3");
    }

    #[test]
    fn test_grid_cell_round_trip() {
        let plan = history_science();
        let mut cells = HashSet::new();
        for slot in plan.questions() {
            let cell = grid_cell_for(slot);
            assert!((1..=5).contains(&cell.column));
            assert!(cells.insert(cell), "cell {cell:?} used twice");
            assert_eq!(question_at(&plan, cell), Some(slot));
        }
        assert_eq!(cells.len(), 10);
    }

    #[test]
    fn test_question_at_outside_grid() {
        let plan = history_science();
        assert_eq!(question_at(&plan, GridCell::new(0, 0)), None);
        assert_eq!(question_at(&plan, GridCell::new(0, 6)), None);
        assert_eq!(question_at(&plan, GridCell::new(2, 1)), None);
    }

    #[test]
    fn test_anchors_distinct() {
        let plan = history_science();
        let anchors: HashSet<Anchor> = plan.questions().map(anchor_for).collect();
        assert_eq!(anchors.len(), 10);
        assert!(!anchors.contains(&grid_anchor(&DeckConfig::default())));
    }
}
