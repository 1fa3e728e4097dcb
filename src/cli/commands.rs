//! CLI Command Implementations
//!
//! Each command builds a pipeline, pulls a fixed number of buffers from it
//! and prints a summary. Nothing is written to disk.

use std::fmt;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::dsp::{Distortion, DriveParams, Effect, Filter, FilterParams, FilterType};
use crate::engine::{linear_to_db, Pipeline, SignalFormat};
use crate::error::Result;
use crate::source::{FileSource, Oscillator, OscillatorConfig, Waveform};

/// Statistics gathered while rendering
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderSummary {
    pub buffers: u64,
    pub silent_buffers: u64,
    /// Index of the first buffer after which every rendered buffer was silent
    pub silent_from: Option<u64>,
    pub peak: f32,
    pub rms: f32,
}

impl RenderSummary {
    pub fn non_silent_buffers(&self) -> u64 {
        self.buffers - self.silent_buffers
    }
}

impl fmt::Display for RenderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buffers rendered: {}", self.buffers)?;
        writeln!(f, "  non-silent:     {}", self.non_silent_buffers())?;
        writeln!(f, "  silent:         {}", self.silent_buffers)?;
        if let Some(index) = self.silent_from {
            writeln!(f, "  silent from:    buffer {}", index)?;
        }
        writeln!(f, "Peak: {:.4} ({:.1} dBFS)", self.peak, linear_to_db(self.peak))?;
        write!(f, "RMS:  {:.4} ({:.1} dBFS)", self.rms, linear_to_db(self.rms))
    }
}

/// Pull `buffers` buffers through `pipeline` and summarize them
///
/// Silence is judged on the converted output, peak and RMS on the float
/// buffers.
pub fn render(pipeline: &mut Pipeline, buffers: u64) -> RenderSummary {
    let mut summary = RenderSummary::default();
    let mut sum_squares = 0.0f64;
    let mut samples = 0u64;

    for index in 0..buffers {
        let output = pipeline.run();
        let buffer = pipeline.last_buffer();

        if output.is_silent() {
            summary.silent_buffers += 1;
            summary.silent_from.get_or_insert(index);
        } else {
            summary.silent_from = None;
        }

        summary.peak = summary.peak.max(buffer.peak());
        for &s in buffer.samples.iter().flatten() {
            sum_squares += (s as f64) * (s as f64);
        }
        samples += (buffer.num_frames() * buffer.num_channels()) as u64;
        summary.buffers += 1;
    }

    if samples > 0 {
        summary.rms = (sum_squares / samples as f64).sqrt() as f32;
    }
    summary
}

fn print_header(title: &str, pipeline: &Pipeline) {
    println!("{}", title);
    println!("Format: {}", pipeline.format());
    if !pipeline.format().is_output_supported() {
        println!("Warning: {}-bit output is not supported, buffers will be silent", pipeline.format().bit_depth());
    }
    for module in pipeline.chain().iter() {
        println!("  -> {}", module.get_params());
    }
    println!("{:-<60}", "");
}

/// Render a WAV file through an empty chain
pub fn play_file(path: &Path, looping: bool, buffers: u64, buffer_size: usize) -> Result<RenderSummary> {
    tracing::info!(path = %path.display(), looping, "rendering file");

    let source = FileSource::open(path, buffer_size, looping)?;
    println!("Loaded {} frames from {}", source.num_frames(), path.display());

    let mut pipeline = Pipeline::new(source);
    print_header("File source", &pipeline);
    let summary = render(&mut pipeline, buffers);
    println!("{}", summary);
    Ok(summary)
}

/// Settings for the `wave` command
#[derive(Debug, Clone, PartialEq)]
pub struct WaveOptions {
    pub waveform: String,
    pub frequency: f64,
    pub cycles: u64,
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub channels: usize,
    pub drive: Option<f32>,
    pub cutoff: Option<f32>,
    pub buffer_size: usize,
}

/// Build the oscillator pipeline described by `options`
pub fn wave_pipeline(options: &WaveOptions) -> Result<Pipeline> {
    let waveform: Waveform = options.waveform.parse()?;
    let format = SignalFormat::new(options.sample_rate, options.bit_depth, options.channels, options.buffer_size)?;

    let mut config = OscillatorConfig::new(waveform, options.frequency);
    if options.cycles > 0 {
        config = config.with_cycles(options.cycles);
    }

    let mut pipeline = Pipeline::new(Oscillator::new(config, format)?);
    if let Some(drive) = options.drive {
        pipeline.add_module(Distortion::new(format, DriveParams::new(drive)))?;
    }
    if let Some(cutoff) = options.cutoff {
        let params = FilterParams::new(FilterType::LowPass, cutoff, 1.14, 12);
        pipeline.add_module(Filter::new(format, params)?)?;
    }
    Ok(pipeline)
}

/// Render an oscillator through the optional drive/filter chain
pub fn play_waveform(options: &WaveOptions, buffers: u64) -> Result<RenderSummary> {
    tracing::info!(waveform = %options.waveform, frequency = options.frequency, "rendering waveform");

    let mut pipeline = wave_pipeline(options)?;
    print_header(&format!("Waveform selected: {}", options.waveform), &pipeline);
    let summary = render(&mut pipeline, buffers);
    println!("{}", summary);
    Ok(summary)
}

/// Render the pipeline described by a configuration file
pub fn run_config(path: &Path, buffers: u64) -> Result<RenderSummary> {
    tracing::info!(path = %path.display(), "rendering configured pipeline");

    let mut pipeline = PipelineConfig::load(path)?.build()?;
    print_header(&format!("Configuration: {}", path.display()), &pipeline);
    let summary = render(&mut pipeline, buffers);
    println!("{}", summary);
    Ok(summary)
}
