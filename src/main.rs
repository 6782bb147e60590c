//! Command-line entry point for inspecting ScanR datasets.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser)]
#[command(name = "scanr")]
#[command(author, version, about = "Olympus ScanR dataset inspector")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a dataset and summarize its layout
    Info {
        /// Dataset directory, descriptor file, or any file inside it
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Emit the plate records and series table as JSON
        #[arg(long)]
        json: bool,

        /// Maximum series rows to print in the summary
        #[arg(long, default_value_t = 16, value_name = "N")]
        max_series: usize,
    },

    /// Report whether a path identifies as ScanR data
    Detect {
        /// Candidate path
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Match by filename only, never opening the file
        #[arg(long)]
        name_only: bool,
    },

    /// Extract one plane or region as raw samples
    Extract {
        /// Dataset directory, descriptor file, or any file inside it
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Series index
        #[arg(short, long, default_value_t = 0)]
        series: usize,

        /// Plane index within the series
        #[arg(short, long, default_value_t = 0)]
        plane: usize,

        /// Region as X,Y,WIDTH,HEIGHT (defaults to the full plane)
        #[arg(long, value_name = "X,Y,W,H")]
        region: Option<String>,

        /// Output file for the raw sample bytes
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Info {
            path,
            json,
            max_series,
        } => cli::info::run(path, json, max_series),
        Commands::Detect { path, name_only } => cli::detect::run(path, name_only),
        Commands::Extract {
            path,
            series,
            plane,
            region,
            output,
        } => cli::extract::run(path, series, plane, region, output),
    }
}
