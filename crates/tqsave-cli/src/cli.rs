//! CLI argument definitions for tqsave.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tqsave")]
#[command(about = "Titan Quest character save inspector", version)]
pub struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the decoded record tree
    Dump {
        /// Character file (Player.chr)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Only show records up to this block depth
        #[arg(long, value_name = "N")]
        depth: Option<usize>,
        /// Fail on keys the registry does not know
        #[arg(long)]
        strict: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Show the player summary
    Summary {
        /// Character file (Player.chr)
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a file and report unknown keys
    Check {
        /// Character file (Player.chr)
        file: PathBuf,
    },
}
