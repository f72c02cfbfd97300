//! Command-line interface for the sentiment experiment.

use super::config::Config;
use super::evaluate::print_summary;
use super::train::{build_pipeline, load_corpus, run_experiment};
use crate::data::sentiment_summary;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "config.toml";

#[derive(Debug, Parser)]
#[command(name = "vn-sentiment")]
#[command(about = "Compare sentiment classifiers on Vietnamese product reviews")]
#[command(version)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Train and compare the three classifiers, before and after oversampling
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Split seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the full report as JSON
        #[arg(long)]
        report_json: Option<PathBuf>,
    },

    /// Print row counts and mean text length per sentiment
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Segment one text and remove stop words
    Tokenize {
        text: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where configuration and input files come from.
#[derive(Debug, clap::Args)]
pub struct SourceArgs {
    /// TOML configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "VN_SENTIMENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Review CSV file (overrides the config file)
    #[arg(short, long)]
    pub data: Option<String>,

    /// Stop-word list (overrides the config file)
    #[arg(short, long)]
    pub stopwords: Option<String>,
}

impl SourceArgs {
    /// Resolve the configuration: explicit file, then `config.toml`, then
    /// defaults; command-line paths win over all of them.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None if Path::new(DEFAULT_CONFIG).exists() => Config::load(DEFAULT_CONFIG)?,
            None => {
                tracing::debug!("No {} found, using default configuration", DEFAULT_CONFIG);
                Config::default()
            }
        };
        if let Some(data) = &self.data {
            config.data.csv_path = data.clone();
        }
        if let Some(stopwords) = &self.stopwords {
            config.data.stopwords_path = Some(stopwords.clone());
        }
        Ok(config)
    }
}

/// Execute a parsed command line.
///
/// # Arguments
///
/// * `cli` - Parsed arguments
pub fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            source,
            seed,
            report_json,
        } => {
            let mut config = source.resolve()?;
            if seed.is_some() {
                config.data.seed = seed;
            }
            let report = run_experiment(&config)?;
            if let Some(path) = report_json {
                report.write_json(&path)?;
            }
            Ok(())
        }
        Commands::Stats { source } => {
            let config = source.resolve()?;
            let (records, load, cleaning) = load_corpus(&config)?;
            println!(
                "{} rows read, {} null, {} malformed rating, {} kept after cleaning\n",
                load.rows_read, load.null_rows, load.malformed_ratings, cleaning.kept
            );
            print_summary(&sentiment_summary(&records));
            Ok(())
        }
        Commands::Tokenize { text, source } => {
            let config = source.resolve()?;
            let pipeline = build_pipeline(&config)?;
            println!("{}", pipeline.tokenize(&text).join(" "));
            Ok(())
        }
    }
}
