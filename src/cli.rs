use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::matching::{MatchThresholds, ScoreScaling};

#[derive(Parser, Debug)]
#[command(
    name = "chargefetch",
    version,
    about = "Retrieve and verify UK company charge filings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a batch of expected charges and write the summary report.
    Run(RunArgs),
    /// Print the fields extracted from one charge document.
    Inspect(InspectArgs),
    /// Check one charge document against expected fields.
    Verify(VerifyArgs),
    /// Summarise the latest run for a day.
    Status(StatusArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum PersonsScaling {
    Single,
    Legacy,
}

impl From<PersonsScaling> for ScoreScaling {
    fn from(value: PersonsScaling) -> Self {
        match value {
            PersonsScaling::Single => Self::Single,
            PersonsScaling::Legacy => Self::Legacy,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ThresholdArgs {
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub company_threshold: u8,

    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub persons_threshold: u8,

    #[arg(long, value_enum, default_value_t = PersonsScaling::Single)]
    pub persons_scaling: PersonsScaling,
}

impl ThresholdArgs {
    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            company_name: self.company_threshold,
            persons_entitled: self.persons_threshold,
            persons_entitled_scaling: self.persons_scaling.into(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Spreadsheet (.xlsx, .xls, .ods) or JSON array of expected charges.
    #[arg(long)]
    pub input: PathBuf,

    /// Worksheet to read; defaults to the first one.
    #[arg(long)]
    pub sheet: Option<String>,

    /// Directory of candidate charge documents.
    #[arg(long, default_value = "filings")]
    pub filings_dir: PathBuf,

    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Stop after this many rows; the rest are reported as unprocessed.
    #[arg(long)]
    pub max_rows: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Charge document (.pdf or .txt).
    pub document: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Charge document (.pdf or .txt).
    pub document: PathBuf,

    #[arg(long)]
    pub company: String,

    #[arg(long)]
    pub date: String,

    #[arg(long, default_value = "")]
    pub persons: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    /// Day folder to inspect (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub day: Option<String>,
}
