//! Data types for the quiz deck pipeline.

mod dataset;
mod geometry;
mod plan;

pub use dataset::*;
pub use geometry::*;
pub use plan::*;
