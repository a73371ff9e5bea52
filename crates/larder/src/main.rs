// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Larder - match recipe ingredients against a household pantry.
//!
//! This is the binary entry point. Every command prints JSON on stdout.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use larder_core::FeedbackAction;

/// Larder - match recipe ingredients against a household pantry.
#[derive(Parser, Debug)]
#[command(name = "larder", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Match one ingredient against the user's pantry.
    Match {
        #[arg(long)]
        user: String,
        name: String,
        quantity: f64,
        unit: String,
    },
    /// Match a JSON list of ingredients and summarize the result.
    Batch {
        #[arg(long)]
        user: String,
        /// JSON array of `{name, quantity, unit}` objects, or `-` for stdin.
        file: PathBuf,
        /// Confirm-tier matches scoring at least this count as auto-matched.
        #[arg(long)]
        auto_confirm_threshold: Option<f64>,
    },
    /// Record the user's decision on a suggestion.
    Feedback {
        #[arg(long)]
        user: String,
        ingredient: String,
        /// accepted, rejected, or corrected.
        action: FeedbackAction,
        #[arg(long)]
        suggested: Option<String>,
        #[arg(long)]
        actual: Option<String>,
        #[arg(long)]
        confidence: Option<f64>,
    },
    /// Show matching statistics for recent generations.
    Stats {
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Manage pantry contents.
    Pantry {
        #[command(subcommand)]
        action: PantryCommands,
    },
    /// Maintain the suggestion cache.
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PantryCommands {
    /// Add or replace items from a JSON array, or `-` for stdin.
    Import {
        #[arg(long)]
        user: String,
        file: PathBuf,
    },
    /// List active items.
    List {
        #[arg(long)]
        user: String,
    },
    /// Mark an item consumed.
    Consume {
        #[arg(long)]
        user: String,
        item: String,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommands {
    /// Delete stale and expired suggestions.
    Purge,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate configuration and print the effective values.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => larder_config::load_and_validate_path(path),
        None => larder_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            larder_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.log_level);
    larder_matcher::register_metrics();

    match commands::run(&config, cli.command).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("larder: failed to render output: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("larder: {e}");
            std::process::exit(if e.is_infrastructure() { 3 } else { 2 });
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("larder={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
