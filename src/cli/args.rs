use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aqi-processor")]
#[command(about = "Clean and analyze air-quality CSV datasets")]
#[command(version)]
pub struct Cli {
    /// Defaults to `clean` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors, hide progress bars"
    )]
    pub quiet: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: aqi-processor.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

/// Overrides for the configured directories and file list.
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    #[arg(long, help = "Directory holding the raw CSV files")]
    pub raw_dir: Option<PathBuf>,

    #[arg(long, help = "Directory for cleaned CSV files")]
    pub processed_dir: Option<PathBuf>,

    #[arg(long, help = "Directory for analysis outputs")]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long = "file",
        value_name = "FILE",
        help = "Raw file name to process (repeatable) [default: configured list]"
    )]
    pub files: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean every raw dataset and write *_cleaned.csv files
    Clean {
        #[command(flatten)]
        paths: PathArgs,

        #[arg(long, help = "Also write cleaning_report.json to the processed directory")]
        report: bool,
    },

    /// Compute trends, correlations and seasonal ANOVA over cleaned datasets
    Analyze {
        #[command(flatten)]
        paths: PathArgs,

        #[arg(long, help = "Pollutant used for trend and seasonal analysis")]
        pollutant: Option<String>,

        #[arg(long, help = "Number of cities in the top polluted ranking")]
        top_n: Option<usize>,
    },

    /// Clean, then analyze
    Run {
        #[command(flatten)]
        paths: PathArgs,

        #[arg(long, help = "Pollutant used for trend and seasonal analysis")]
        pollutant: Option<String>,

        #[arg(long, help = "Number of cities in the top polluted ranking")]
        top_n: Option<usize>,

        #[arg(long, help = "Also write cleaning_report.json to the processed directory")]
        report: bool,
    },
}
