//! quizdeck - quiz board presentations from spreadsheets
//!
//! Turns a table of categories and questions into a `.pptx` deck shaped like
//! a quiz board:
//! - a title slide and one intro slide per category
//! - a grid slide whose table has one row per category and five point columns
//! - one question slide per cell, linked from the grid and back to it
//!
//! # Usage
//!
//! ```no_run
//! use quizdeck::{run, DeckConfig, RunOptions};
//!
//! let saved = run(&RunOptions {
//!     input: "input.xlsx".into(),
//!     output: "quiz_presentation.pptx".into(),
//!     sheet: None,
//!     template: None,
//!     config: DeckConfig::default(),
//! })?;
//! println!("{}", saved.display());
//! # Ok::<(), quizdeck::DeckError>(())
//! ```

// Planning and addressing
pub mod address;
pub mod config;
pub mod error;
pub mod planner;
pub mod types;

// Document building
pub mod assembler;
pub mod deck;
mod export;
pub mod sink;
pub mod template;
pub mod weaver;

// Package plumbing
pub mod cell_ref;
pub mod namespaces;
pub mod opc;
pub mod source;
pub mod xml_helpers;

use std::path::PathBuf;
use tracing::info;

pub use assembler::{assemble, AssembledDeck};
pub use config::{resolve_path, DeckConfig, LayoutMap};
pub use deck::Deck;
pub use error::{DeckError, Result};
pub use sink::PresentationSink;
pub use source::{read_dataset, SourceOptions};
pub use template::Template;
pub use types::*;
pub use weaver::weave;

/// Assemble every slide of `plan` on `sink`, then attach every link.
pub fn build_deck<S: PresentationSink + ?Sized>(
    plan: &SlidePlan,
    config: &DeckConfig,
    sink: &mut S,
) -> Result<()> {
    let assembled = assemble(plan, config, sink)?;
    weave(&assembled, sink)
}

/// Inputs of one end-to-end run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Worksheet name; the first sheet when `None`
    pub sheet: Option<String>,
    /// `.pptx` template; the built-in one when `None`
    pub template: Option<PathBuf>,
    pub config: DeckConfig,
}

/// Read the input, build the deck and save it. Returns the absolute output path.
///
/// The dataset is read and planned before the template is opened, so
/// structural errors never touch the output path.
pub fn run(options: &RunOptions) -> Result<PathBuf> {
    let config = &options.config;
    config.validate()?;

    let input = resolve_path(&options.input);
    let output = resolve_path(&options.output);

    let dataset = read_dataset(
        &input,
        &SourceOptions {
            sheet: options.sheet.clone(),
        },
        config,
    )?;
    let plan = planner::plan(&dataset, config)?;
    info!(
        categories = plan.category_count(),
        slides = plan.len(),
        "planned deck"
    );

    let template = match &options.template {
        Some(path) => Template::from_file(&resolve_path(path))?,
        None => Template::builtin()?,
    };
    info!(layouts = template.layouts().len(), "loaded template");

    let mut deck = Deck::new(template);
    build_deck(&plan, config, &mut deck)?;
    deck.save(&output)?;
    info!(path = %output.display(), slides = deck.slide_count(), "saved presentation");

    Ok(output)
}
