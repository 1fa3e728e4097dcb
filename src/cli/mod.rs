//! CLI Module
//!
//! Command-line interface for rendering pipelines offline.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::engine::DEFAULT_BUFFER_SIZE;

/// Pedalboard - streaming audio effects engine
#[derive(Parser, Debug)]
#[command(name = "pedalboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a WAV file through an empty chain
    #[command(name = "file")]
    File {
        /// Path to the WAV file
        path: PathBuf,

        /// Wrap to the start at end of data
        #[arg(short = 'l', long = "loop")]
        looping: bool,

        /// Number of buffers to render
        #[arg(short, long, default_value_t = 1000)]
        buffers: u64,

        /// Frames per buffer
        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,
    },

    /// Render an oscillator, optionally through distortion and a low-pass filter
    #[command(name = "wave")]
    Wave {
        /// Waveform: sine, triangle, square or sawtooth
        waveform: String,

        /// Frequency in Hz
        #[arg(short, long, default_value_t = 440.0)]
        frequency: f64,

        /// Periods to play (0 = unbounded)
        #[arg(short, long, default_value_t = 100)]
        cycles: u64,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Output bit depth (16 or 32)
        #[arg(long, default_value_t = 32)]
        bit_depth: u16,

        /// Channel count (1 or 2)
        #[arg(long, default_value_t = 2)]
        channels: usize,

        /// Add a distortion module with this drive in dB
        #[arg(long)]
        drive: Option<f32>,

        /// Add a 12 dB/octave low-pass filter at this cutoff in Hz
        #[arg(long)]
        cutoff: Option<f32>,

        /// Number of buffers to render
        #[arg(short, long, default_value_t = 1000)]
        buffers: u64,

        /// Frames per buffer
        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
        buffer_size: usize,
    },

    /// Render a pipeline described by a JSON configuration
    #[command(name = "run")]
    Run {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Number of buffers to render
        #[arg(short, long, default_value_t = 1000)]
        buffers: u64,
    },
}
