// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use seedfix::process::{augment, split, strip};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Line-oriented repair tools for the exercises SQL seed dumps"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drop stray comments from INSERT blocks and blank lines everywhere
    Strip {
        input: PathBuf,
        output: PathBuf,
    },
    /// Write each INSERT statement to its own runnable part file
    Split {
        input: PathBuf,
        /// Directory receiving the exercises_part_<N>.sql files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Add the muscle_group column derived from section markers
    Augment {
        input: PathBuf,
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Strip { input, output } => strip::strip_file(&input, &output)?,
        Command::Split { input, out_dir } => {
            let written = split::split_file(&input, &out_dir)?;
            info!("split into {} statements", written.len());
        }
        Command::Augment { input, output } => augment::augment_file(&input, &output)?,
    }

    Ok(())
}
