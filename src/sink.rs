//! Presentation sink trait for pluggable document builders.
//!
//! The assembler and the weaver only talk to a [`PresentationSink`]; the
//! PPTX implementation lives in [`crate::deck`].

use std::path::Path;

use crate::error::Result;
use crate::types::{Anchor, GridCell, Rect, SlideSize};

/// Handle to a slide, by 0-based position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlideId(pub usize);

/// Handle to a shape added to a slide (text box or table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId {
    pub slide: SlideId,
    pub index: usize,
}

/// A text frame that can receive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    /// Title placeholder of a slide
    Title(SlideId),
    /// Body placeholder (idx 1) of a slide
    Body(SlideId),
    /// A text box shape
    Shape(ShapeId),
    /// A cell of a table shape
    Cell(ShapeId, GridCell),
}

/// One run of text, optionally sized and optionally linked to a slide anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    /// Font size in whole points
    pub size_pt: Option<u32>,
    pub link: Option<Anchor>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size_pt: None,
            link: None,
        }
    }

    #[must_use]
    pub fn sized(mut self, size_pt: u32) -> Self {
        self.size_pt = Some(size_pt);
        self
    }

    #[must_use]
    pub fn linked(mut self, anchor: Anchor) -> Self {
        self.link = Some(anchor);
        self
    }
}

/// Document-building operations the deck pipeline needs.
pub trait PresentationSink {
    /// Slide dimensions of the document.
    fn slide_size(&self) -> SlideSize;

    /// Append a slide built from the layout at `layout` in the master's layout
    /// list. If `anchor` is given, internal hyperlinks can target the slide by it.
    fn add_slide(&mut self, layout: usize, anchor: Option<&Anchor>) -> Result<SlideId>;

    /// Add a `rows` x `cols` table shape tagged with a table style GUID.
    fn add_table(
        &mut self,
        slide: SlideId,
        rows: usize,
        cols: usize,
        rect: Rect,
        style_id: &str,
    ) -> Result<ShapeId>;

    /// Add an empty text box shape.
    fn add_text_box(&mut self, slide: SlideId, rect: Rect) -> Result<ShapeId>;

    /// Append a run to the first paragraph of `target`.
    ///
    /// A linked run must name an anchor already registered by `add_slide`.
    fn push_run(&mut self, target: TextTarget, run: Run) -> Result<()>;

    fn slide_count(&self) -> usize;

    /// Serialize the document to `path`.
    fn save(&self, path: &Path) -> Result<()>;
}
