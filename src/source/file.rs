//! File Source
//!
//! Replays pre-loaded, pre-normalized sample data one buffer at a time,
//! optionally looping back to the start.

use std::path::Path;

use num_traits::{AsPrimitive, Bounded};

use super::SignalSource;
use crate::engine::io::{decode_wav, DecodedAudio, SampleData};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::{PedalboardError, Result};

/// Scale integer samples into [-1, 1] by the type's maximum magnitude
fn normalize_int<T>(samples: &[T]) -> Vec<f32>
where
    T: Copy + Bounded + AsPrimitive<f64>,
{
    let max: f64 = T::max_value().as_();
    samples.iter().map(|&s| (s.as_() / max) as f32).collect()
}

/// Source replaying decoded audio
///
/// Holds the whole file as interleaved f32 frames. A read cursor advances by
/// `buffer_size` frames per call. When the data runs out the source either
/// wraps (looping) or pads with zeros and latches into the ended state.
#[derive(Debug, Clone)]
pub struct FileSource {
    format: SignalFormat,
    /// Interleaved normalized samples
    data: Vec<f32>,
    num_frames: usize,
    cursor: usize,
    looping: bool,
    ended: bool,
}

impl FileSource {
    /// Build a source from decoded samples
    ///
    /// Integer samples are divided by their type's maximum (32767 or
    /// 2^31 - 1); float samples pass through unscaled.
    ///
    /// # Errors
    /// * `EmptyAudio` - no samples
    /// * `InvalidAudio` - sample count not a whole number of frames
    /// * `InvalidParameter` / `UnsupportedBitDepth` - from the resulting format
    pub fn new(decoded: DecodedAudio, buffer_size: usize, looping: bool) -> Result<Self> {
        let bit_depth = decoded.bit_depth();
        let format = SignalFormat::new(decoded.sample_rate, bit_depth, decoded.channels, buffer_size)?;

        if decoded.data.is_empty() {
            return Err(PedalboardError::EmptyAudio);
        }
        if decoded.data.len() % decoded.channels != 0 {
            return Err(PedalboardError::InvalidAudio {
                reason: format!(
                    "sample count {} is not divisible by channel count {}",
                    decoded.data.len(),
                    decoded.channels
                ),
            });
        }

        let data = match decoded.data {
            SampleData::Int16(s) => normalize_int(&s),
            SampleData::Int32(s) => normalize_int(&s),
            SampleData::Float32(s) => s,
            SampleData::Float64(s) => s.into_iter().map(|v| v as f32).collect(),
        };
        let num_frames = data.len() / format.channels();

        tracing::debug!(
            format = %format,
            frames = num_frames,
            looping,
            "file source loaded"
        );

        Ok(Self {
            format,
            data,
            num_frames,
            cursor: 0,
            looping,
            ended: false,
        })
    }

    /// Decode a WAV file and build a source from it
    pub fn open(path: &Path, buffer_size: usize, looping: bool) -> Result<Self> {
        Self::new(decode_wav(path)?, buffer_size, looping)
    }

    /// Total frames of loaded audio
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Current read position in frames
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the source wraps at end of data
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Whether a non-looping source has run out of data
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Rewind to the first frame and clear the ended flag
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.ended = false;
    }

    #[inline]
    fn frame_index(&self, position: usize) -> Option<usize> {
        if position < self.num_frames {
            Some(position)
        } else if self.looping {
            Some(position % self.num_frames)
        } else {
            None
        }
    }
}

impl SignalSource for FileSource {
    fn signal_info(&self) -> SignalFormat {
        self.format
    }

    fn read_into(&mut self, buffer: &mut AudioBuffer) {
        if self.ended {
            buffer.clear();
            return;
        }

        let channels = self.format.channels();
        let buffer_size = self.format.buffer_size();

        for i in 0..buffer_size {
            match self.frame_index(self.cursor + i) {
                Some(frame) => {
                    let base = frame * channels;
                    for ch in 0..channels {
                        buffer.set(ch, i, self.data[base + ch]);
                    }
                }
                None => {
                    for ch in 0..channels {
                        buffer.set(ch, i, 0.0);
                    }
                }
            }
        }

        self.cursor += buffer_size;
        if self.cursor >= self.num_frames {
            if self.looping {
                self.cursor %= self.num_frames;
            } else {
                self.ended = true;
                tracing::info!(frames = self.num_frames, "file source reached end of data");
            }
        }
    }

    fn reset(&mut self) {
        self.rewind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn mono(data: Vec<f32>) -> DecodedAudio {
        DecodedAudio::new(44100, 1, SampleData::Float32(data))
    }

    fn ramp(n: usize) -> Vec<f32> {
        (0..n).map(|i| (i + 1) as f32 / 100.0).collect()
    }

    #[test]
    fn test_normalize_int16() {
        let decoded = DecodedAudio::new(44100, 1, SampleData::Int16(vec![32767, -32767, 0, 16384]));
        let mut source = FileSource::new(decoded, 4, false).unwrap();
        let buffer = source.get_signal();

        assert_abs_diff_eq!(buffer.channel(0)[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(buffer.channel(0)[1], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(buffer.channel(0)[2], 0.0);
        assert_abs_diff_eq!(buffer.channel(0)[3], 0.50002, epsilon = 1e-4);
        assert_eq!(source.signal_info().bit_depth(), 16);
    }

    #[test]
    fn test_normalize_int32() {
        let decoded = DecodedAudio::new(48000, 1, SampleData::Int32(vec![i32::MAX, i32::MIN + 1, 0]));
        let mut source = FileSource::new(decoded, 3, false).unwrap();
        let buffer = source.get_signal();

        assert_abs_diff_eq!(buffer.channel(0)[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(buffer.channel(0)[1], -1.0, epsilon = 1e-6);
        assert_eq!(source.signal_info().sample_rate(), 48000);
    }

    #[test]
    fn test_float64_passthrough() {
        let decoded = DecodedAudio::new(44100, 1, SampleData::Float64(vec![0.5, -0.25]));
        let mut source = FileSource::new(decoded, 2, false).unwrap();
        assert_eq!(source.signal_info().bit_depth(), 64);
        assert_eq!(source.get_signal().channel(0), &[0.5, -0.25]);
    }

    #[test]
    fn test_stereo_deinterleave() {
        let decoded = DecodedAudio::new(44100, 2, SampleData::Float32(vec![0.1, 0.2, 0.3, 0.4]));
        let mut source = FileSource::new(decoded, 2, false).unwrap();
        let buffer = source.get_signal();
        assert_eq!(buffer.channel(0), &[0.1, 0.3]);
        assert_eq!(buffer.channel(1), &[0.2, 0.4]);
    }

    #[test]
    fn test_non_looping_pads_and_ends() {
        let mut source = FileSource::new(mono(ramp(10)), 4, false).unwrap();

        assert_eq!(source.get_signal().channel(0), &[0.01, 0.02, 0.03, 0.04]);
        assert_eq!(source.get_signal().channel(0), &[0.05, 0.06, 0.07, 0.08]);
        assert!(!source.is_ended());

        // Tail zero-padded to the full buffer size
        assert_eq!(source.get_signal().channel(0), &[0.09, 0.10, 0.0, 0.0]);
        assert!(source.is_ended());

        for _ in 0..3 {
            let buffer = source.get_signal();
            assert_eq!(buffer.num_frames(), 4);
            assert!(buffer.is_silent());
        }
    }

    #[test]
    fn test_looping_wraps_to_start() {
        let mut source = FileSource::new(mono(ramp(6)), 4, true).unwrap();

        assert_eq!(source.get_signal().channel(0), &[0.01, 0.02, 0.03, 0.04]);
        assert_eq!(source.get_signal().channel(0), &[0.05, 0.06, 0.01, 0.02]);
        assert_eq!(source.cursor(), 2);
        assert_eq!(source.get_signal().channel(0), &[0.03, 0.04, 0.05, 0.06]);
        assert_eq!(source.cursor(), 0);
        assert!(!source.is_ended());
    }

    #[test]
    fn test_looping_buffer_longer_than_data() {
        let mut source = FileSource::new(mono(ramp(3)), 7, true).unwrap();
        assert_eq!(
            source.get_signal().channel(0),
            &[0.01, 0.02, 0.03, 0.01, 0.02, 0.03, 0.01]
        );
        assert_eq!(source.cursor(), 1);
    }

    #[test]
    fn test_rewind_after_end() {
        let mut source = FileSource::new(mono(ramp(2)), 4, false).unwrap();
        source.get_signal();
        assert!(source.is_ended());

        source.rewind();
        assert!(!source.is_ended());
        assert_eq!(source.get_signal().channel(0), &[0.01, 0.02, 0.0, 0.0]);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            FileSource::new(mono(vec![]), 4, false),
            Err(PedalboardError::EmptyAudio)
        ));

        let odd = DecodedAudio::new(44100, 2, SampleData::Float32(vec![0.0; 3]));
        assert!(FileSource::new(odd, 4, false).is_err());

        let surround = DecodedAudio::new(44100, 6, SampleData::Float32(vec![0.0; 12]));
        assert!(FileSource::new(surround, 4, false).is_err());
    }
}
