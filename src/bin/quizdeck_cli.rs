//! CLI for quizdeck - builds a quiz board presentation from a spreadsheet
//!
//! Usage:
//!   quizdeck                                   # input.xlsx -> quiz_presentation.pptx
//!   quizdeck -i quiz.xlsx -o board.pptx --sheet "Round 1"
//!   quizdeck -i quiz.csv --template brand.pptx --config deck.json

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use quizdeck::{run, DeckConfig, DeckError, RunOptions};

#[derive(Parser)]
#[command(name = "quizdeck")]
#[command(about = "Build a quiz board presentation from a spreadsheet")]
#[command(version)]
struct Cli {
    /// Input workbook (.xlsx) or delimited file (.csv, .tsv)
    #[arg(short, long, default_value = "input.xlsx")]
    input: PathBuf,

    /// Output presentation path
    #[arg(short, long, default_value = "quiz_presentation.pptx")]
    output: PathBuf,

    /// Worksheet to read (default: first sheet)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Presentation template (.pptx) providing the master and layouts
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// JSON deck configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => DeckConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DeckConfig::default(),
    };

    let options = RunOptions {
        input: cli.input,
        output: cli.output,
        sheet: cli.sheet,
        template: cli.template,
        config,
    };

    match run(&options) {
        Ok(saved) => {
            println!("Presentation saved to {}", saved.display());
            Ok(())
        }
        Err(err @ DeckError::WritePermissionDenied { .. }) => Err(anyhow::Error::new(err)
            .context("close the file if it is open in another program, or choose another --output")),
        Err(err) => Err(err.into()),
    }
}
