//! Property tests for slide planning and grid addressing.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use proptest::prelude::*;
use quizdeck::address::{anchor_for, grid_anchor, grid_cell_for, question_at};
use quizdeck::planner::{plan, slide_count};
use quizdeck::{build_deck, Dataset, DatasetRow, Deck, DeckConfig, PointColumn, SlideRole, Template};
use std::collections::HashSet;

/// Datasets with distinct, non-blank category labels.
fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::btree_set("[A-Za-z][A-Za-z ]{0,11}", 1..12).prop_flat_map(|labels| {
        let n = labels.len();
        (
            Just(labels.into_iter().collect::<Vec<_>>()),
            prop::collection::vec(prop::collection::vec(".{0,20}", PointColumn::COUNT), n),
        )
            .prop_map(|(labels, values)| {
                Dataset::new(
                    labels
                        .into_iter()
                        .zip(values)
                        .map(|(label, vals)| DatasetRow::new(label, vals))
                        .collect(),
                )
            })
    })
}

proptest! {
    #[test]
    fn plan_length_matches_formula(ds in dataset()) {
        let p = plan(&ds, &DeckConfig::default()).unwrap();
        let rows = ds.len();
        prop_assert_eq!(p.len(), 2 + rows + PointColumn::COUNT * rows);
        prop_assert_eq!(p.len(), slide_count(rows));
    }

    #[test]
    fn ordinals_are_contiguous(ds in dataset()) {
        let p = plan(&ds, &DeckConfig::default()).unwrap();
        for (i, entry) in p.entries().iter().enumerate() {
            prop_assert_eq!(entry.ordinal, i + 1);
        }
        prop_assert!(matches!(p.entries()[0].role, SlideRole::Title));
        prop_assert!(matches!(p.entries()[p.grid_ordinal() - 1].role, SlideRole::GridTable));
    }

    #[test]
    fn grid_cells_are_a_bijection(ds in dataset()) {
        let p = plan(&ds, &DeckConfig::default()).unwrap();
        let (rows, cols) = p.grid_shape();
        let mut seen = HashSet::new();

        for slot in p.questions() {
            let cell = grid_cell_for(slot);
            prop_assert!(cell.row < rows && (1..cols).contains(&cell.column));
            prop_assert!(seen.insert(cell));
            prop_assert_eq!(question_at(&p, cell), Some(slot));
        }
        prop_assert_eq!(seen.len(), rows * (cols - 1));
    }

    #[test]
    fn anchors_are_distinct(ds in dataset()) {
        let config = DeckConfig::default();
        let p = plan(&ds, &config).unwrap();
        let mut anchors: HashSet<_> = p.questions().map(anchor_for).collect();
        prop_assert_eq!(anchors.len(), p.questions().count());
        // Question anchors carry the " - " separator, the grid name does not
        prop_assert!(anchors.insert(grid_anchor(&config)));
    }

    #[test]
    fn built_deck_holds_every_planned_slide(ds in dataset()) {
        let config = DeckConfig::default();
        let p = plan(&ds, &config).unwrap();
        let mut deck = Deck::new(Template::builtin().unwrap());
        build_deck(&p, &config, &mut deck).unwrap();

        prop_assert_eq!(deck.slides().len(), p.len());
        for slot in p.questions() {
            prop_assert!(deck.resolve(&anchor_for(slot)).is_some());
        }
    }
}
