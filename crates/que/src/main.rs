//! # que
//!
//! Que - reactive templating micro-framework in Rust.
//!
//! The command-line interface mounts a template onto an in-memory document,
//! replays interactions against it and prints the resulting markup. It also
//! exposes the expression pipeline for inspection.

mod commands;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "que")]
#[command(about = "Reactive templates rendered from the command line", long_about = None)]
#[command(version)]
struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount a template, apply steps and print the resulting HTML
    Render(commands::render::RenderArgs),

    /// Show how an expression is tokenized, parsed and compiled
    Inspect(commands::inspect::InspectArgs),

    /// Print the JSON Schema for que.config.json
    Schema,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Schema => {
            println!("{}", que::QUE_CONFIG_SCHEMA);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}
