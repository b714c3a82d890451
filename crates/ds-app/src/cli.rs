//! Command-line structure for `depot-safety`.

use clap::{Args, Parser, Subcommand};
use ds_core::profile::ProfileInput;
use ds_core::report::{DevicePreference, Horizon, PredictionMode, MAX_KEYWORDS, MAX_MEASURES};
use std::path::PathBuf;

/// Depot Safety - rule-based risk prediction for maintenance duty assignments.
#[derive(Debug, Parser)]
#[command(name = "depot-safety")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict the risk score, keywords and safety measures for one person and task
    Predict(PredictArgs),

    /// Rank candidate tasks from safest to riskiest for one person
    Recommend(RecommendArgs),

    /// Rule table utilities
    #[command(subcommand)]
    Tables(TablesCommands),
}

/// Profile fields, taken as raw strings so every invalid field is reported at once.
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Gender (male, female)
    #[arg(long)]
    pub gender: String,

    /// Age in years (18-65)
    #[arg(long, allow_hyphen_values = true)]
    pub age: String,

    /// Years of service (0-40)
    #[arg(long, allow_hyphen_values = true)]
    pub service_years: String,
}

impl ProfileArgs {
    pub fn to_input(&self) -> ProfileInput {
        ProfileInput {
            name: self.name.clone(),
            gender: self.gender.clone(),
            age: self.age.clone(),
            service_years: self.service_years.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Task category id or label (e.g. laminated-armor)
    #[arg(short, long)]
    pub task: String,

    /// Prediction mode: ml, dl or integrated [default: from config]
    #[arg(short, long)]
    pub mode: Option<PredictionMode>,

    /// Forecast horizon: 1h, 24h, 168h or full [default: from config]
    #[arg(long)]
    pub horizon: Option<Horizon>,

    /// Seed for reproducible jitter and keyword order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Compute device preference: auto, cpu or gpu [default: from config]
    #[arg(long)]
    pub device: Option<DevicePreference>,

    /// Number of keywords to select
    #[arg(long, default_value_t = MAX_KEYWORDS)]
    pub keywords: usize,

    /// Number of safety measures to recommend
    #[arg(long, default_value_t = MAX_MEASURES)]
    pub measures: usize,

    /// Export the report (.xlsx or .json; a directory gets a generated file name)
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Comma-separated candidate tasks [default: all non-weapons tasks]
    #[arg(long, value_delimiter = ',')]
    pub tasks: Option<Vec<String>>,

    /// Seed for reproducible jitter
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum TablesCommands {
    /// Write the built-in rule tables as JSON
    Dump {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
