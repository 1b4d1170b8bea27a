use clap::{Args, Parser, Subcommand};
use pdf_splitter::types::{DEFAULT_INPUT, DEFAULT_OUTPUT_DIR, DEFAULT_PAGES_PER_PART};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-split")]
#[command(about = "A CLI tool for splitting a PDF into parts with a fixed number of pages")]
#[command(version)]
pub struct Cli {
    /// Defaults to `split` on RUSHLP.pdf when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output directory for part files
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a PDF into part files
    Split(SplitArgs),

    /// Show the parts a split would produce without writing them
    Plan(PlanArgs),

    /// Check an output directory against the parts planned for a PDF
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct SplitArgs {
    /// Input PDF
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Number of pages in each part
    #[arg(short, long, default_value_t = DEFAULT_PAGES_PER_PART)]
    pub pages_per_part: usize,

    /// Write a JSON report of the produced parts
    #[arg(long, value_name = "FILE")]
    pub json_report: Option<PathBuf>,
}

impl Default for SplitArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            pages_per_part: DEFAULT_PAGES_PER_PART,
            json_report: None,
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Input PDF
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Number of pages in each part
    #[arg(short, long, default_value_t = DEFAULT_PAGES_PER_PART)]
    pub pages_per_part: usize,

    /// Write the plan to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// PDF the output directory was split from
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Number of pages in each part
    #[arg(short, long, default_value_t = DEFAULT_PAGES_PER_PART)]
    pub pages_per_part: usize,
}
