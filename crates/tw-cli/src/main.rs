//! CLI frontend for the Taleweaver session engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tw",
    about = "Taleweaver: scene extraction, encounters and player choices for tabletop sessions",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find character and creature mentions in a piece of narration
    Extract {
        /// Narrator text
        text: String,

        /// Player-character name to ignore (repeatable)
        #[arg(short, long = "party", value_name = "NAME")]
        party: Vec<String>,

        /// RNG seed for group sizes
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replay a JSON session script and print the report
    Replay {
        /// Script file
        file: PathBuf,

        /// RNG seed for group sizes and combat stats
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TW_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            text,
            party,
            seed,
            json,
        } => commands::extract::run(&text, &party, seed, json),
        Commands::Replay { file, seed, json } => commands::replay::run(&file, seed, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
