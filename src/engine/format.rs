//! Signal format descriptor
//!
//! A `SignalFormat` describes the shape of the stream flowing through a
//! pipeline. It is `Copy` and never changes once the pipeline exists, so every
//! module keeps its own copy and the pipeline compares them on insertion.

use std::fmt;

use serde::Serialize;

use crate::error::{PedalboardError, Result};

/// Bit depths accepted for a signal
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 32, 64];

/// Default number of frames per `run()` call
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Immutable description of sample rate, bit depth, channel count and buffer size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SignalFormat {
    sample_rate: u32,
    bit_depth: u16,
    channels: usize,
    buffer_size: usize,
}

impl SignalFormat {
    /// Create a new signal format
    ///
    /// # Errors
    /// * `InvalidParameter` - zero sample rate, channel count other than 1 or 2,
    ///   or zero buffer size
    /// * `UnsupportedBitDepth` - bit depth not in {16, 32, 64}
    pub fn new(sample_rate: u32, bit_depth: u16, channels: usize, buffer_size: usize) -> Result<Self> {
        if sample_rate == 0 {
            return Err(PedalboardError::invalid_parameter(
                "sample_rate",
                sample_rate,
                "a positive rate in Hz",
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&bit_depth) {
            return Err(PedalboardError::UnsupportedBitDepth { bit_depth });
        }
        if !(1..=2).contains(&channels) {
            return Err(PedalboardError::invalid_parameter(
                "channels",
                channels,
                "1 (mono) or 2 (stereo)",
            ));
        }
        if buffer_size == 0 {
            return Err(PedalboardError::invalid_parameter(
                "buffer_size",
                buffer_size,
                "at least one frame per buffer",
            ));
        }

        Ok(Self {
            sample_rate,
            bit_depth,
            channels,
            buffer_size,
        })
    }

    /// Stereo 32-bit format at the given rate and buffer size
    pub fn stereo(sample_rate: u32, buffer_size: usize) -> Result<Self> {
        Self::new(sample_rate, 32, 2, buffer_size)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bits per output sample
    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    /// Number of channels (1 or 2)
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Frames per buffer
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Total interleaved samples in one buffer
    pub fn samples_per_buffer(&self) -> usize {
        self.buffer_size * self.channels
    }

    /// Convert a duration in milliseconds to a whole number of frames
    pub fn ms_to_samples(&self, ms: f32) -> usize {
        (self.sample_rate as f64 * ms as f64 / 1000.0).round().max(0.0) as usize
    }

    /// Convert a frame count to seconds
    pub fn frames_to_secs(&self, frames: usize) -> f64 {
        frames as f64 / self.sample_rate as f64
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// Whether the pipeline can convert to this bit depth for the sink
    pub fn is_output_supported(&self) -> bool {
        matches!(self.bit_depth, 16 | 32)
    }

    /// Startup-time check for the output representation
    ///
    /// The real-time path substitutes silence for unsupported depths; callers
    /// use this before entering the playback loop to report the problem.
    pub fn validate_output(&self) -> Result<()> {
        if self.is_output_supported() {
            Ok(())
        } else {
            Err(PedalboardError::UnsupportedBitDepth {
                bit_depth: self.bit_depth,
            })
        }
    }

    /// Same format with a different buffer size
    pub fn with_buffer_size(&self, buffer_size: usize) -> Result<Self> {
        Self::new(self.sample_rate, self.bit_depth, self.channels, buffer_size)
    }
}

impl fmt::Display for SignalFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz / {}-bit / {} ch / {} frames",
            self.sample_rate, self.bit_depth, self.channels, self.buffer_size
        )
    }
}
