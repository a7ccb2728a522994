//! objrt command-line tool
//!
//! Loads a JSON class manifest into a fresh runtime and reports on the
//! resulting class graph: class lists, layouts, dispatch tables and classes
//! whose superclass chain cannot be resolved.

mod commands;
mod manifest;
mod output;

use clap::{Parser, Subcommand};
use output::{resolve_color_choice, StyledOutput};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

#[derive(Parser)]
#[command(name = "objrt")]
#[command(about = "Inspect objrt class manifests", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Color output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered class with its link state
    Classes {
        /// Manifest file
        manifest: PathBuf,
    },

    /// Show the layout, methods and dispatch table of one class
    Inspect {
        /// Manifest file
        manifest: PathBuf,
        /// Class name
        class: String,
        /// Inspect the metaclass instead
        #[arg(long)]
        meta: bool,
    },

    /// Fail if any class cannot be linked
    Check {
        /// Manifest file
        manifest: PathBuf,
    },
}

/// Log level from `-v` flags, falling back to `OBJRT_LOG`
fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => std::env::var("OBJRT_LOG")
            .ok()
            .and_then(|value| Level::from_str(&value).ok())
            .unwrap_or(Level::WARN),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let mut out = StyledOutput::new(resolve_color_choice(cli.color.as_deref()));

    let result = match cli.command {
        Commands::Classes { manifest } => commands::classes::execute(&manifest, &mut out),
        Commands::Inspect {
            manifest,
            class,
            meta,
        } => commands::inspect::execute(&manifest, &class, meta, &mut out),
        Commands::Check { manifest } => commands::check::execute(&manifest, &mut out),
    };
    out.flush();

    if let Err(e) = result {
        out.stderr_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
    Ok(())
}
