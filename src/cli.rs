use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kira-biotriage",
    version,
    about = "Staged glucose/lactate danger triage and threshold search"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Run(RunArgs),
    Search(SearchArgs),
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Calibrated readings TSV (optionally .gz)")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long, help = "Calibrated readings TSV with ground truth (optionally .gz)")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Optional grid TSV to overlay on the built-in grid")]
    pub grid: Option<PathBuf>,

    #[arg(long, default_value_t = 0.95, help = "Minimum sensitivity in [0, 1]")]
    pub min_sensitivity: f64,

    #[arg(long, default_value_t = 10)]
    pub top: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Calibrated readings TSV (optionally .gz)")]
    pub input: PathBuf,
}
