//! Link weaving.
//!
//! Fills question slides and binds the two directions of navigation: each
//! question slide gets a back link to the grid slide, and each grid cell gets
//! a forward link to its question slide.

use tracing::debug;

use crate::address::{anchor_for, grid_anchor, grid_cell_for};
use crate::assembler::AssembledDeck;
use crate::error::{DeckError, Result};
use crate::sink::{PresentationSink, Run, TextTarget};
use crate::types::SlideRole;

/// Write question text and every hyperlink of an assembled deck.
pub fn weave<S: PresentationSink + ?Sized>(deck: &AssembledDeck<'_>, sink: &mut S) -> Result<()> {
    let config = deck.config();
    let back = grid_anchor(config);
    let mut links = 0_usize;

    for entry in deck.plan().entries() {
        let SlideRole::Question(slot) = &entry.role else {
            continue;
        };
        let slide = deck.slide(entry.ordinal).ok_or_else(|| {
            DeckError::InvalidTarget(format!("no slide for ordinal {}", entry.ordinal))
        })?;
        let anchor = anchor_for(slot);

        sink.push_run(TextTarget::Title(slide), Run::plain(anchor.as_str()))?;
        sink.push_run(TextTarget::Body(slide), Run::plain(slot.question.as_str()))?;

        let button = sink.add_text_box(slide, config.back_button_rect())?;
        sink.push_run(
            TextTarget::Shape(button),
            Run::plain(config.back_text.as_str())
                .sized(config.back_text_size_pt)
                .linked(back.clone()),
        )?;

        sink.push_run(
            TextTarget::Cell(deck.table(), grid_cell_for(slot)),
            Run::plain(slot.points.as_str()).linked(anchor),
        )?;
        links += 2;
    }

    debug!(links, "wove links");
    Ok(())
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
    use crate::address::question_at;
    use crate::assembler::assemble;
    use crate::config::DeckConfig;
    use crate::deck::{Deck, Shape};
    use crate::planner::plan;
    use crate::template::Template;
    use crate::types::{Anchor, Dataset, DatasetRow, GridCell};

    fn config() -> DeckConfig {
        DeckConfig {
            point_values: [100, 200, 300, 400, 500],
            ..DeckConfig::default()
        }
    }

    fn built() -> (Deck, crate::types::SlidePlan) {
        let config = config();
        let dataset = Dataset::new(vec![
            DatasetRow::new("History", ["h1", "h2", "h3", "h4", "h5"]),
            DatasetRow::new("Science", ["s1", "s2", "s3", "s4", "s5"]),
        ]);
        let plan = plan(&dataset, &config).unwrap();
        let mut deck = Deck::new(Template::builtin().unwrap());
        let assembled = assemble(&plan, &config, &mut deck).unwrap();
        weave(&assembled, &mut deck).unwrap();
        (deck, plan)
    }

    #[test]
    fn test_question_slide_contents() {
        let (deck, _) = built();
        let slide = deck.resolve(&Anchor::new("History - 300")).unwrap();
        let s = deck.slide(slide).unwrap();
        assert_eq!(s.title.text(), "History - 300");
        assert_eq!(s.body.text(), "h3");

        let Shape::TextBox { rect, paragraph } = &s.shapes[0] else {
            panic!("expected back button");
        };
        assert_eq!(*rect, config().back_button_rect());
        assert_eq!(paragraph.text(), "Back");
        assert_eq!(paragraph.runs[0].size_pt, Some(11));
        assert_eq!(paragraph.runs[0].link, deck.resolve(&Anchor::new("MainTable")));
    }

    #[test]
    fn test_every_cell_round_trips() {
        let (deck, plan) = built();
        let grid = deck.resolve(&Anchor::new("MainTable")).unwrap();
        let table = deck.slide(grid).unwrap().table().unwrap();

        for row in 0..2 {
            for column in 1..6 {
                let cell = GridCell::new(row, column);
                let slot = question_at(&plan, cell).unwrap();
                let run = &table.cell(cell).unwrap().runs[0];
                assert_eq!(run.text, slot.points);

                // cell -> question slide -> back link -> grid slide
                let target = run.link.unwrap();
                assert_eq!(deck.slide(target).unwrap().anchor, Some(anchor_for(slot)));
                let back = deck.slide(target).unwrap().links().next().unwrap();
                assert_eq!(back, grid);
            }
        }
    }

    #[test]
    fn test_example_cell() {
        let (deck, _) = built();
        let grid = deck.resolve(&Anchor::new("MainTable")).unwrap();
        let table = deck.slide(grid).unwrap().table().unwrap();
        let link = table.cell(GridCell::new(0, 3)).unwrap().runs[0].link;
        assert_eq!(link, deck.resolve(&Anchor::new("History - 300")));
    }
}
