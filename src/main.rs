use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod advisor;
mod catalog;
mod config;
mod data;
mod format;
mod orchestrator;
mod pricing;
mod rates;
mod sampler;
mod storage;
mod timeline;
mod validation;
mod wizard;

use config::EstimatorConfig;

#[derive(Parser)]
#[command(name = "estimator")]
#[command(about = "Estimator CLI - price and schedule web projects", long_about = None)]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the feature catalog
    Features {
        /// Only show one category (frontend, backend, advanced)
        #[arg(long)]
        category: Option<String>,
    },

    /// Estimate cost and timeline for a form
    Estimate {
        /// Form JSON file, or - for stdin
        #[arg(long, short, default_value = "-")]
        input: String,

        /// Output format (json or md)
        #[arg(long, default_value = "json")]
        format: String,

        /// Save the estimate as a quote
        #[arg(long)]
        save: bool,
    },

    /// Validate a form without estimating it
    Validate {
        /// Form JSON file, or - for stdin
        #[arg(long, short, default_value = "-")]
        input: String,
    },

    /// Step through the estimation wizard interactively
    Wizard,

    /// Generate a random form and estimate it
    Sample {
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (json, md, or form for the raw form)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Manage saved quotes
    Quotes {
        #[command(subcommand)]
        action: QuotesAction,
    },
}

#[derive(Subcommand)]
enum QuotesAction {
    /// List saved quotes, newest first
    List,

    /// Show one saved quote
    Show {
        /// Quote ID to show
        #[arg(long)]
        id: String,

        /// Output format (json or md)
        #[arg(long, default_value = "json")]
        format: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EstimatorConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Features { category } => {
            tracing::info!(category = ?category, "Listing features");
            orchestrator::list_features(category.as_deref())?;
        }
        Commands::Estimate {
            input,
            format,
            save,
        } => {
            tracing::info!(input = %input, format = %format, save, "Estimating");
            orchestrator::estimate(&input, &format, save, &config)?;
        }
        Commands::Validate { input } => {
            tracing::info!(input = %input, "Validating form");
            orchestrator::validate(&input)?;
        }
        Commands::Wizard => {
            tracing::info!(quotes_dir = %config.quotes_dir, "Starting wizard");
            orchestrator::wizard(&config)?;
        }
        Commands::Sample { seed, format } => {
            tracing::info!(seed = ?seed, format = %format, "Sampling form");
            orchestrator::sample(seed, &format, &config)?;
        }
        Commands::Quotes { action } => match action {
            QuotesAction::List => {
                tracing::info!(quotes_dir = %config.quotes_dir, "Listing quotes");
                orchestrator::quotes_list(&config)?;
            }
            QuotesAction::Show { id, format } => {
                tracing::info!(id = %id, format = %format, "Showing quote");
                orchestrator::quotes_show(&id, &format, &config)?;
            }
        },
    }

    Ok(())
}
