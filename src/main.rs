//! # Paper Index CLI (`paper-index`)
//!
//! Builds the viewer database from the scanned-document directory and the
//! tracking database named in the config file.
//!
//! ## Usage
//!
//! ```bash
//! paper-index --config ./paper-index.toml build
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `paper-index build` | Scan, merge metadata and write the viewer database (default) |
//! | `paper-index scan` | Same, without writing anything; prints the summary |
//!
//! Without `--config`, `paper-index.toml` is looked up in the current
//! directory, then `~/.config`, then next to the executable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use paper_index::{config, pipeline};

/// Paper Index: build the offline viewer database from scanned documents.
#[derive(Parser)]
#[command(
    name = "paper-index",
    about = "Paper Index: build the offline viewer database from scanned documents",
    version
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output on stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the viewer database from scratch.
    Build,

    /// Scan and classify documents without writing the database.
    Scan {
        /// Print the summary as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "paper_index=debug"
    } else {
        "paper_index=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = config::locate_config(cli.config.as_deref())?;
    println!("Reading config from '{}'", config_path.display());
    let cfg = config::load_config(&config_path)?;

    match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => {
            let summary = pipeline::run_build(&cfg).await?;
            summary.print();
        }
        Commands::Scan { json } => {
            let summary = pipeline::run_scan(&cfg).await?;
            if json {
                println!("{}", summary.to_json()?);
            } else {
                summary.print();
            }
        }
    }

    Ok(())
}
