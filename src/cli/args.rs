//! Command line argument parsing for the flare CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Flare - classify tweets as disaster-related or not
#[derive(Parser, Debug, Clone)]
#[command(name = "flare")]
#[command(about = "Disaster tweet classification with TF-IDF features and logistic regression")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FlareArgs {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FlareArgs {
    /// Effective verbosity: 0 quiet, 1 normal, 2 verbose, 3+ debug.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Default log filter for the verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a classifier on a labeled file and save the model
    Train(TrainArgs),

    /// Label the tweets of a file with a saved model
    Predict(PredictArgs),

    /// Summarize a tweet file
    Stats(StatsArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled tweets (CSV or JSONL) with id, text and target
    #[arg(value_name = "TRAIN_FILE")]
    pub train_file: PathBuf,

    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "FLARE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where to write the model artifact
    #[arg(short, long, value_name = "MODEL_FILE", default_value = "model.json")]
    pub output: PathBuf,

    /// Override the split seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the validation fraction
    #[arg(long)]
    pub validation_fraction: Option<f64>,

    /// Override the vocabulary size limit
    #[arg(long)]
    pub max_features: Option<usize>,

    /// Preserve class proportions in the split
    #[arg(long)]
    pub stratify: bool,

    /// Number of strongest terms per class to report
    #[arg(long, default_value = "10")]
    pub top_terms: usize,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Model artifact written by `flare train`
    #[arg(value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Tweets to label (CSV or JSONL) with id and text
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Where to write the id,target submission
    #[arg(short, long, value_name = "SUBMISSION_FILE", default_value = "submission.csv")]
    pub output: PathBuf,
}

/// Arguments for corpus statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Tweets to summarize (CSV or JSONL)
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Number of most frequent tokens to list per class
    #[arg(short = 'n', long, default_value = "20")]
    pub top: usize,

    /// Configuration whose preprocessing settings drive tokenization
    #[arg(short, long, value_name = "CONFIG_FILE", env = "FLARE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
