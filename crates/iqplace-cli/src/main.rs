//! iqplace CLI: take the IQ quiz and get a placement prediction.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "iqplace",
    version,
    about = "IQ quiz with campus placement prediction"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the quiz and request placement predictions interactively
    Quiz {
        /// Question bank TOML (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Questions drawn per category (default: from config, else 2)
        #[arg(long)]
        per_category: Option<usize>,

        /// Seed for reproducible question selection
        #[arg(long)]
        seed: Option<u64>,

        /// Predictor name from the config (default: config's default_predictor)
        #[arg(long)]
        predictor: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for exports (default: config's output_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Export formats: csv, json, html, all (comma-separated)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Validate a question bank TOML file
    Validate {
        /// Path to the bank file
        #[arg(long)]
        bank: PathBuf,

        /// Questions drawn per category when checking category sizes
        #[arg(long, default_value = "2")]
        per_category: usize,
    },

    /// Show statistics for a saved session report
    Summary {
        /// Session report JSON (written by `quiz --format json`)
        #[arg(long)]
        report: PathBuf,
    },

    /// Create starter config and an editable copy of the built-in bank
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("iqplace=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz {
            bank,
            per_category,
            seed,
            predictor,
            config,
            output,
            format,
        } => {
            commands::quiz::execute(commands::quiz::QuizArgs {
                bank,
                per_category,
                seed,
                predictor,
                config,
                output,
                format,
            })
            .await
        }
        Commands::Validate { bank, per_category } => {
            commands::validate::execute(bank, per_category)
        }
        Commands::Summary { report } => commands::summary::execute(report),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
