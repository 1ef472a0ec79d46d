//! Main CLI application structure

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::sources::{HistoryArgs, InputArgs};
use super::{reconcile, tools};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "antledger")]
#[command(author, version, about = "Reconcile ant suggestions and emit release-numbered SQL seeds")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./antledger.toml, then the global config)
    #[arg(long, short = 'c', global = true, env = "ANTLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default antledger.toml
    Init,

    /// Reconcile all sources and write the SQL seed
    Reconcile {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        history: HistoryArgs,

        /// Output directory (overrides config)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Classify the issue export against the site data
    Classify {
        #[command(flatten)]
        inputs: InputArgs,

        /// List the ants in each category
        #[arg(long, short)]
        list: bool,
    },

    /// Cross-check reconciled ants, site data and the legacy listing
    Check {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        history: HistoryArgs,

        /// Legacy listing (overrides config)
        #[arg(long)]
        listing: Option<PathBuf>,

        /// Exit with failure when the report contains errors
        #[arg(long)]
        deny_errors: bool,
    },

    /// Print the content hash of a string
    Hash {
        /// Content to hash
        text: String,
    },

    /// Emit the migration adding one release from a release file
    Release {
        /// Release file JSON
        file: PathBuf,

        /// Release number
        number: u32,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Emit the migration reordering content hashes to follow a listing
    Rehash {
        /// Newline-delimited ant listing
        file: PathBuf,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("antledger starting");

    match cli.command {
        Commands::Init => tools::init(&output, cli.config.as_deref())?,

        Commands::Hash { text } => tools::hash(&output, &text)?,

        Commands::Rehash { file, out } => tools::rehash(&output, &file, out)?,

        Commands::Reconcile { inputs, history, out } => {
            let config = load_config(&output, cli.config.as_deref())?;
            reconcile::reconcile(&output, config, &inputs, &history, out)?
        }

        Commands::Classify { inputs, list } => {
            let config = load_config(&output, cli.config.as_deref())?;
            reconcile::classify(&output, config, &inputs, list)?
        }

        Commands::Check { inputs, history, listing, deny_errors } => {
            let config = load_config(&output, cli.config.as_deref())?;
            reconcile::check(&output, config, &inputs, &history, listing, deny_errors)?
        }

        Commands::Release { file, number, out } => {
            let config = load_config(&output, cli.config.as_deref())?;
            tools::release(&output, &config, &file, number, out)?
        }
    }

    output.verbose("Command completed successfully");
    Ok(())
}

fn load_config(output: &Output, explicit: Option<&Path>) -> Result<Config> {
    let config = Config::load(explicit)?;
    match &config.source {
        Some(path) => output.verbose_ctx("config", &format!("Loaded {}", path.display())),
        None => output.verbose_ctx("config", "No config file, using defaults"),
    }
    Ok(config)
}
