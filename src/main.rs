//! Pedalboard CLI - offline pipeline renderer
//!
//! Command-line interface for the Pedalboard effects engine.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pedalboard::cli::commands::{self, WaveOptions};
use pedalboard::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    tracing::info!("Pedalboard v{}", env!("CARGO_PKG_VERSION"));

    handle_command(cli.command)
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::File {
            path,
            looping,
            buffers,
            buffer_size,
        } => {
            commands::play_file(&path, looping, buffers, buffer_size)
                .with_context(|| format!("failed to render {}", path.display()))?;
        }
        Commands::Wave {
            waveform,
            frequency,
            cycles,
            sample_rate,
            bit_depth,
            channels,
            drive,
            cutoff,
            buffers,
            buffer_size,
        } => {
            let options = WaveOptions {
                waveform,
                frequency,
                cycles,
                sample_rate,
                bit_depth,
                channels,
                drive,
                cutoff,
                buffer_size,
            };
            commands::play_waveform(&options, buffers)
                .with_context(|| format!("failed to render {} waveform", options.waveform))?;
        }
        Commands::Run { config, buffers } => {
            commands::run_config(&config, buffers)
                .with_context(|| format!("failed to run configuration {}", config.display()))?;
        }
    }
    Ok(())
}
