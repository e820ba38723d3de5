//! PPTX export pipeline.
//!
//! Produces the output package from a template and the generated slides.
//! Template parts are passed through byte-identical except the three the
//! slides must be registered in: the presentation part, its relationships
//! and `[Content_Types].xml`.

pub(crate) mod package_writer;
pub(crate) mod slide_writer;

use crate::deck::Deck;
use crate::error::Result;

/// Serialize a deck to `.pptx` bytes.
pub(crate) fn write_pptx(deck: &Deck) -> Result<Vec<u8>> {
    package_writer::write_package(deck)
}
