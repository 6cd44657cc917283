//! Cascade CLI - run WAV files through a cascade effect pipeline.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(author, version, about = "Cascade effect pipeline CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an audio file through an effect chain
    Process(commands::process::ProcessArgs),

    /// List available effects and their arguments
    Effects(commands::effects::EffectsArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for listings
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Effects(args) => commands::effects::run(args),
    }
}
