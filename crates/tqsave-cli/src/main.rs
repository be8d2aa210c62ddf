mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise warn, or debug with --verbose
    let default_filter = if args.verbose {
        "tqsave=debug,tqsave_core=debug"
    } else {
        "tqsave=warn,tqsave_core=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Dump {
            file,
            json,
            depth,
            strict,
            no_color,
        } => commands::dump::run(&file, json, depth, strict, no_color),
        Command::Summary { file, json } => commands::summary::run(&file, json),
        Command::Check { file } => commands::check::run(&file),
    }
}
