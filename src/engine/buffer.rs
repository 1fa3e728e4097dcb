//! Audio Buffer Management
//!
//! The working buffer handed from the source through every module. Samples are
//! 32-bit floats in [-1.0, 1.0] while inside the pipeline.

use crate::error::{PedalboardError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear amplitude multiplier, `10^(db / 20)`
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns `f32::NEG_INFINITY` for zero or negative input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Fixed-size block of audio frames
///
/// Stores audio as non-interleaved 32-bit floating point samples: the outer
/// Vec is channels, the inner Vec is frames. Frame `i` is the set of samples
/// `samples[ch][i]` for every channel.
///
/// # Example
/// ```
/// use pedalboard::engine::AudioBuffer;
///
/// let buffer = AudioBuffer::new(64, 2);
/// assert_eq!(buffer.num_channels(), 2);
/// assert_eq!(buffer.num_frames(), 64);
/// assert!(buffer.is_silent());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Sample data: outer Vec is channels, inner Vec is frames
    pub samples: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Create a silent buffer with the given frame and channel count
    pub fn new(num_frames: usize, num_channels: usize) -> Self {
        Self {
            samples: vec![vec![0.0_f32; num_frames]; num_channels],
        }
    }

    /// Alias of [`AudioBuffer::new`] that reads better at call sites
    pub fn silence(num_frames: usize, num_channels: usize) -> Self {
        Self::new(num_frames, num_channels)
    }

    /// Create a buffer from interleaved sample data (L, R, L, R, ... for stereo)
    ///
    /// # Errors
    /// * `InvalidAudio` - zero channels, or a length that is not a whole number of frames
    pub fn from_interleaved(interleaved: &[f32], num_channels: usize) -> Result<Self> {
        if num_channels == 0 {
            return Err(PedalboardError::InvalidAudio {
                reason: "channel count must be at least 1".to_string(),
            });
        }
        if interleaved.len() % num_channels != 0 {
            return Err(PedalboardError::InvalidAudio {
                reason: format!(
                    "sample count {} is not divisible by channel count {}",
                    interleaved.len(),
                    num_channels
                ),
            });
        }

        let num_frames = interleaved.len() / num_channels;
        let mut buffer = Self::new(num_frames, num_channels);
        for (frame, chunk) in interleaved.chunks_exact(num_channels).enumerate() {
            for (ch, &sample) in chunk.iter().enumerate() {
                buffer.samples[ch][frame] = sample;
            }
        }
        Ok(buffer)
    }

    /// Interleave the buffer into a new Vec
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.num_frames() * self.num_channels());
        for frame in 0..self.num_frames() {
            for channel in &self.samples {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }

    /// Number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// True if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Samples of one channel
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.samples[channel]
    }

    /// Mutable samples of one channel
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.samples[channel]
    }

    /// Get a sample at the given channel and frame
    pub fn get(&self, channel: usize, frame: usize) -> Option<f32> {
        self.samples.get(channel).and_then(|c| c.get(frame)).copied()
    }

    /// Set a sample at the given channel and frame; out-of-range writes are ignored
    pub fn set(&mut self, channel: usize, frame: usize, value: f32) {
        if let Some(sample) = self.samples.get_mut(channel).and_then(|c| c.get_mut(frame)) {
            *sample = value;
        }
    }

    /// Zero every sample without reallocating
    pub fn clear(&mut self) {
        for channel in &mut self.samples {
            channel.fill(0.0);
        }
    }

    /// Copy samples from a buffer of identical shape
    ///
    /// Channels or frames missing from `other` are left untouched.
    pub fn copy_from(&mut self, other: &AudioBuffer) {
        for (dst, src) in self.samples.iter_mut().zip(&other.samples) {
            let n = dst.len().min(src.len());
            dst[..n].copy_from_slice(&src[..n]);
        }
    }

    /// Apply a function to every sample in place
    #[inline]
    pub fn map_in_place(&mut self, mut f: impl FnMut(f32) -> f32) {
        for channel in &mut self.samples {
            for sample in channel.iter_mut() {
                *sample = f(*sample);
            }
        }
    }

    /// True if every sample is exactly zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().flatten().all(|&s| s == 0.0)
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .flatten()
            .map(|s| s.abs())
            .fold(0.0_f32, f32::max)
    }

    /// Linear RMS level across all channels
    pub fn rms(&self) -> f32 {
        let total = self.num_channels() * self.num_frames();
        if total == 0 {
            return 0.0;
        }
        let sum_squares: f64 = self
            .samples
            .iter()
            .flatten()
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        (sum_squares / total as f64).sqrt() as f32
    }

    /// Check buffer contains only finite samples
    pub fn is_finite(&self) -> bool {
        self.samples.iter().flatten().all(|s| s.is_finite())
    }
}
