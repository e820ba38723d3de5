//! Deck assembly.
//!
//! Creates every slide of a [`SlidePlan`] in ordinal order, fills the
//! title, category and grid slide titles, and builds the grid table with its
//! category column. Links are left to [`crate::weaver`], which only accepts
//! the [`AssembledDeck`] produced here.

use tracing::debug;

use crate::address::{anchor_for, grid_anchor};
use crate::config::DeckConfig;
use crate::error::{DeckError, Result};
use crate::sink::{PresentationSink, Run, ShapeId, SlideId, TextTarget};
use crate::types::{GridCell, SlidePlan, SlideRole};

/// A document holding every planned slide and the empty-valued grid table.
///
/// Only [`assemble`] constructs this, so holding one proves every anchor the
/// plan names is registered with the sink.
#[derive(Debug)]
pub struct AssembledDeck<'p> {
    plan: &'p SlidePlan,
    config: &'p DeckConfig,
    /// Slide handle per plan entry, in ordinal order
    slides: Vec<SlideId>,
    grid_slide: SlideId,
    table: ShapeId,
}

impl<'p> AssembledDeck<'p> {
    #[must_use]
    pub fn plan(&self) -> &'p SlidePlan {
        self.plan
    }

    #[must_use]
    pub fn config(&self) -> &'p DeckConfig {
        self.config
    }

    /// Handle of the slide at `ordinal` (1-based).
    #[must_use]
    pub fn slide(&self, ordinal: usize) -> Option<SlideId> {
        self.slides.get(ordinal.checked_sub(1)?).copied()
    }

    #[must_use]
    pub fn grid_slide(&self) -> SlideId {
        self.grid_slide
    }

    #[must_use]
    pub fn table(&self) -> ShapeId {
        self.table
    }
}

/// Create all slides of `plan` on `sink` and populate the category column.
pub fn assemble<'p, S: PresentationSink + ?Sized>(
    plan: &'p SlidePlan,
    config: &'p DeckConfig,
    sink: &mut S,
) -> Result<AssembledDeck<'p>> {
    let before = sink.slide_count();
    let mut slides = Vec::with_capacity(plan.len());
    let mut grid_slide = None;

    for entry in plan.entries() {
        let layout = config.layouts.for_role(entry.role.kind());
        let anchor = match &entry.role {
            SlideRole::Question(slot) => Some(anchor_for(slot)),
            SlideRole::GridTable => Some(grid_anchor(config)),
            SlideRole::Title | SlideRole::CategoryIntro { .. } => None,
        };
        let id = sink.add_slide(layout, anchor.as_ref())?;
        debug!(ordinal = entry.ordinal, layout, slide = id.0, "created slide");

        match &entry.role {
            SlideRole::Title => {
                sink.push_run(TextTarget::Title(id), Run::plain(config.title_text.as_str()))?;
            }
            SlideRole::CategoryIntro { category, .. } => {
                sink.push_run(TextTarget::Title(id), Run::plain(category.as_str()))?;
            }
            SlideRole::GridTable => {
                // Named for navigation but not meant to be read
                sink.push_run(
                    TextTarget::Title(id),
                    Run::plain(config.main_slide_name.as_str()).sized(config.hidden_title_size_pt),
                )?;
                grid_slide = Some(id);
            }
            SlideRole::Question(_) => {}
        }
        slides.push(id);
    }

    let actual = sink.slide_count() - before;
    if actual != plan.len() {
        return Err(DeckError::SlideCountMismatch {
            expected: plan.len(),
            actual,
        });
    }

    let grid_slide = grid_slide
        .ok_or_else(|| DeckError::InvalidTarget("plan has no grid table slide".into()))?;
    let (rows, cols) = plan.grid_shape();
    let table = sink.add_table(
        grid_slide,
        rows,
        cols,
        config.table_rect(sink.slide_size()),
        &config.table_style_id,
    )?;

    for entry in plan.entries() {
        if let SlideRole::CategoryIntro { row, category } = &entry.role {
            sink.push_run(
                TextTarget::Cell(table, GridCell::new(*row, 0)),
                Run::plain(category.as_str()),
            )?;
        }
    }

    Ok(AssembledDeck {
        plan,
        config,
        slides,
        grid_slide,
        table,
    })
}
