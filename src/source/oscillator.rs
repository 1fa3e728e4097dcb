//! Oscillator Source
//!
//! Synthesizes a periodic waveform by stepping through a precomputed
//! single-period lookup table, optionally stopping after a number of cycles.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SignalSource;
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::{PedalboardError, Result};

/// Default lookup table length
pub const DEFAULT_TABLE_SIZE: usize = 1024;

/// Smallest usable lookup table length
const MIN_TABLE_SIZE: usize = 2;

// ============================================================================
// Waveform
// ============================================================================

/// Periodic waveform shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl Waveform {
    /// All waveform shapes
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Sawtooth,
    ];

    /// Get string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Waveform {
    type Err = PedalboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Ok(Waveform::Sine),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            "square" | "sqr" => Ok(Waveform::Square),
            "sawtooth" | "saw" => Ok(Waveform::Sawtooth),
            _ => Err(PedalboardError::UnsupportedWaveform {
                name: s.to_string(),
            }),
        }
    }
}

// ============================================================================
// Wave Table
// ============================================================================

/// One full period of a waveform, normalized to a peak magnitude of 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct WaveTable {
    waveform: Waveform,
    phase: f64,
    samples: Vec<f32>,
}

impl WaveTable {
    /// Compute the table for `waveform` with `table_size` entries
    ///
    /// Entry `i` is evaluated at angle `i * 2π / table_size + phase * 2π`.
    /// The same inputs always produce a bit-identical table.
    pub fn new(waveform: Waveform, table_size: usize, phase: f64) -> Result<Self> {
        if table_size < MIN_TABLE_SIZE {
            return Err(PedalboardError::invalid_parameter(
                "table_size",
                table_size,
                format!("at least {} entries", MIN_TABLE_SIZE),
            ));
        }
        if !phase.is_finite() {
            return Err(PedalboardError::invalid_parameter(
                "phase",
                phase,
                "a finite fraction of a period",
            ));
        }

        let n = table_size as f64;
        let raw: Vec<f64> = (0..table_size)
            .map(|i| {
                let angle = i as f64 * TAU / n + phase * TAU;
                match waveform {
                    Waveform::Sine => angle.sin(),
                    Waveform::Triangle => 2.0 / PI * angle.sin().asin(),
                    Waveform::Square => {
                        // First half of the period is high
                        if (i as f64 / n + phase).rem_euclid(1.0) < 0.5 {
                            1.0
                        } else {
                            -1.0
                        }
                    }
                    Waveform::Sawtooth => 2.0 / PI * (angle / 2.0).tan().atan(),
                }
            })
            .collect();

        let peak = raw.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let scale = if peak > 0.0 { 1.0 / peak } else { 1.0 };
        let samples = raw.iter().map(|v| (v * scale) as f32).collect();

        Ok(Self {
            waveform,
            phase,
            samples,
        })
    }

    /// Waveform shape of this table
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Phase offset as a fraction of a period
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Table entries
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed table
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute entry
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, v| acc.max(v.abs()))
    }

    /// Entry at a position measured in periods (wraps modulo one period)
    #[inline]
    fn lookup(&self, position: f64) -> f32 {
        let n = self.samples.len();
        let index = (position * n as f64) as usize % n;
        self.samples[index]
    }
}

// ============================================================================
// Oscillator
// ============================================================================

fn default_table_size() -> usize {
    DEFAULT_TABLE_SIZE
}

/// Oscillator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorConfig {
    /// Waveform shape
    #[serde(default)]
    pub waveform: Waveform,
    /// Frequency in Hz
    pub frequency: f64,
    /// Phase offset as a fraction of a period
    #[serde(default)]
    pub phase: f64,
    /// Lookup table length
    #[serde(default = "default_table_size")]
    pub table_size: usize,
    /// Number of periods to play; `None` or 0 plays forever
    #[serde(default)]
    pub cycles: Option<u64>,
}

impl OscillatorConfig {
    /// Unbounded oscillator at `frequency` Hz
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
            table_size: DEFAULT_TABLE_SIZE,
            cycles: None,
        }
    }

    /// Stop after `cycles` whole periods
    pub fn with_cycles(mut self, cycles: u64) -> Self {
        self.cycles = Some(cycles);
        self
    }

    /// Start at `phase` periods into the waveform
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Use a lookup table of `table_size` entries
    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }
}

/// Table-lookup waveform source
///
/// An accumulator measured in periods advances by `frequency / sample_rate`
/// per frame. Every whole period it wraps and counts one cycle; once the cycle
/// limit is reached every following sample is silence.
#[derive(Debug, Clone)]
pub struct Oscillator {
    format: SignalFormat,
    config: OscillatorConfig,
    table: WaveTable,
    /// Position within the current period, in [0, 1)
    position: f64,
    /// Period advance per frame
    step: f64,
    cycles_played: u64,
    cycle_limit: Option<u64>,
    finished: bool,
}

impl Oscillator {
    /// Create an oscillator producing buffers of `format`'s shape
    ///
    /// # Errors
    /// * `InvalidParameter` - non-positive or above-Nyquist frequency, a table
    ///   shorter than two entries, or a non-finite phase
    pub fn new(config: OscillatorConfig, format: SignalFormat) -> Result<Self> {
        Self::with_table_hook(config, format, |_| {})
    }

    /// Create an oscillator and hand the computed table to `hook` once
    ///
    /// Used for diagnostics such as plotting; the hook is not retained.
    pub fn with_table_hook(
        config: OscillatorConfig,
        format: SignalFormat,
        hook: impl FnOnce(&WaveTable),
    ) -> Result<Self> {
        if !(config.frequency.is_finite() && config.frequency > 0.0) {
            return Err(PedalboardError::invalid_parameter(
                "frequency",
                config.frequency,
                "a positive frequency in Hz",
            ));
        }
        if config.frequency >= format.nyquist() {
            return Err(PedalboardError::invalid_parameter(
                "frequency",
                config.frequency,
                format!("below the Nyquist frequency ({} Hz)", format.nyquist()),
            ));
        }

        let table = WaveTable::new(config.waveform, config.table_size, config.phase)?;
        hook(&table);

        let cycle_limit = config.cycles.filter(|&c| c > 0);
        let step = config.frequency / format.sample_rate() as f64;

        tracing::debug!(
            waveform = %config.waveform,
            frequency = config.frequency,
            table_size = config.table_size,
            cycles = ?cycle_limit,
            "oscillator created"
        );

        Ok(Self {
            format,
            config,
            table,
            position: 0.0,
            step,
            cycles_played: 0,
            cycle_limit,
            finished: false,
        })
    }

    /// Oscillator settings
    pub fn config(&self) -> &OscillatorConfig {
        &self.config
    }

    /// Precomputed lookup table
    pub fn table(&self) -> &WaveTable {
        &self.table
    }

    /// Whole periods played so far
    pub fn cycles_played(&self) -> u64 {
        self.cycles_played
    }

    /// Whether the cycle limit has been reached
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    fn advance(&mut self) {
        self.position += self.step;
        if self.position >= 1.0 {
            let whole = self.position.floor();
            self.position -= whole;
            self.cycles_played += whole as u64;

            if let Some(limit) = self.cycle_limit {
                if self.cycles_played >= limit {
                    self.finished = true;
                    tracing::info!(cycles = self.cycles_played, "oscillator reached cycle limit");
                }
            }
        }
    }
}

impl SignalSource for Oscillator {
    fn signal_info(&self) -> SignalFormat {
        self.format
    }

    fn read_into(&mut self, buffer: &mut AudioBuffer) {
        if self.finished {
            buffer.clear();
            return;
        }

        let channels = self.format.channels();
        for frame in 0..self.format.buffer_size() {
            let value = if self.finished {
                0.0
            } else {
                let v = self.table.lookup(self.position);
                self.advance();
                v
            };
            for ch in 0..channels {
                buffer.set(ch, frame, value);
            }
        }
    }

    fn reset(&mut self) {
        self.position = 0.0;
        self.cycles_played = 0;
        self.finished = false;
    }
}
