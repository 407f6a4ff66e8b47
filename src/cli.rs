//! CLI argument parsing for the corpus generator.
use clap::{Parser, Subcommand, ValueEnum};
use cmd_corpus::types::SegmentKind;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "data/generated";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "corpusgen",
    version,
    about = "Synthetic training data for shell command correction",
    after_help = "Commands:\n  generate [--dataset ds1] [--sample N]   Generate segment files and final splits\n  verify <DIR>                            Check quality and distribution of a corpus\n  init --config <path>                    Write a default config file\n\nExamples:\n  corpusgen generate --sample 200\n  corpusgen generate --dataset ds3 --seed 7 --output-dir /tmp/corpus\n  corpusgen verify data/generated --json\n  corpusgen init --config corpus.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Generate(GenerateArgs),
    Verify(VerifyArgs),
    Init(InitArgs),
}

/// Segment selection on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetArg {
    All,
    Ds1,
    Ds2,
    Ds3,
    Ds4,
}

impl DatasetArg {
    /// Segments selected by this value; `all` selects every segment.
    pub fn segments(self) -> Vec<SegmentKind> {
        let alias = self
            .to_possible_value()
            .map(|value| value.get_name().to_string());
        match alias.as_deref().and_then(SegmentKind::from_alias) {
            Some(kind) => vec![kind],
            None => SegmentKind::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Generate corpus segments and train/validation/test splits")]
pub struct GenerateArgs {
    /// Segment to generate
    #[arg(long, value_enum, default_value_t = DatasetArg::All)]
    pub dataset: DatasetArg,

    /// Generate only N examples per segment
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Seed shared by every segment and the final shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Config file (defaults are used when absent)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory of catalog JSON files overriding the built-in ones
    #[arg(long, value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Directory for per-segment files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Directory for final splits (defaults to `final` next to the output dir)
    #[arg(long, value_name = "DIR")]
    pub final_dir: Option<PathBuf>,

    /// Skip combining segments into train/validation/test splits
    #[arg(long)]
    pub no_combine: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}

impl GenerateArgs {
    pub fn final_dir(&self) -> PathBuf {
        match &self.final_dir {
            Some(dir) => dir.clone(),
            None => self
                .output_dir
                .parent()
                .map(|parent| parent.join("final"))
                .unwrap_or_else(|| PathBuf::from("final")),
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Verify single-char share, null corrections and distributions")]
pub struct VerifyArgs {
    /// Directory holding `*_analysis.jsonl` files
    #[arg(value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub dir: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Write a default corpus config")]
pub struct InitArgs {
    /// Destination config path
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}
