//! dotdeps CLI - dependency closures and binary loading for .NET projects

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use dotdeps::ops::diagnose;
use dotdeps::util::diagnostic;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("dotdeps=debug")
    } else {
        EnvFilter::new("dotdeps=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Frameworks(args) => commands::frameworks::execute(args, color),
        Commands::Deps(args) => commands::deps::execute(args),
        Commands::Load(args) => commands::load::execute(args),
    }
}

/// Print `e`, as a diagnostic when it wraps a lock-file or graph error.
fn report(e: &anyhow::Error, color: bool) {
    match diagnose(e) {
        Some(diag) => {
            eprintln!("error: {}", e);
            diagnostic::emit(&diag, color);
        }
        None => eprintln!("error: {:#}", e),
    }
}
