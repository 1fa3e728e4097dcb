//! Decoded audio input
//!
//! `DecodedAudio` is the hand-off between a decoder and the file source: the
//! file's own sample rate and channel count plus raw interleaved samples in
//! their stored representation. `decode_wav` fills it from a WAV file using
//! `hound`; all decoding happens here, once, outside the real-time path.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::{PedalboardError, Result};

/// Raw interleaved samples in their stored representation
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    /// 16-bit signed integers
    Int16(Vec<i16>),
    /// 32-bit signed integers
    Int32(Vec<i32>),
    /// 32-bit floats, already in [-1, 1]
    Float32(Vec<f32>),
    /// 64-bit floats, already in [-1, 1]
    Float64(Vec<f64>),
}

impl SampleData {
    /// Bits per stored sample (16, 32 or 64)
    pub fn bit_depth(&self) -> u16 {
        match self {
            SampleData::Int16(_) => 16,
            SampleData::Int32(_) | SampleData::Float32(_) => 32,
            SampleData::Float64(_) => 64,
        }
    }

    /// Number of interleaved samples
    pub fn len(&self) -> usize {
        match self {
            SampleData::Int16(s) => s.len(),
            SampleData::Int32(s) => s.len(),
            SampleData::Float32(s) => s.len(),
            SampleData::Float64(s) => s.len(),
        }
    }

    /// True if there are no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether samples are stored as floats
    pub fn is_float(&self) -> bool {
        matches!(self, SampleData::Float32(_) | SampleData::Float64(_))
    }
}

/// Output of the decoding collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// File sample rate in Hz
    pub sample_rate: u32,
    /// Channel count (1 or 2)
    pub channels: usize,
    /// Interleaved samples
    pub data: SampleData,
}

impl DecodedAudio {
    /// Bundle decoded samples with their stream parameters
    pub fn new(sample_rate: u32, channels: usize, data: SampleData) -> Self {
        Self {
            sample_rate,
            channels,
            data,
        }
    }

    /// Number of whole frames
    pub fn num_frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.data.len() / self.channels
        }
    }

    /// Bits per stored sample
    pub fn bit_depth(&self) -> u16 {
        self.data.bit_depth()
    }
}

/// Decode a WAV file into raw samples
///
/// # Errors
/// * `Io` - if the file does not exist or cannot be opened
/// * `Wav` - if the file is not a valid WAV file
/// * `UnsupportedFormat` - for more than two channels, or bit depths other
///   than 16/32-bit integer and 32-bit float
pub fn decode_wav(path: &Path) -> Result<DecodedAudio> {
    let reader = WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => PedalboardError::Io(io),
        other => PedalboardError::Wav(other),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 || channels > 2 {
        return Err(PedalboardError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    let data = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => {
            SampleData::Int16(reader.into_samples::<i16>().collect::<std::result::Result<_, _>>()?)
        }
        (SampleFormat::Int, 32) => {
            SampleData::Int32(reader.into_samples::<i32>().collect::<std::result::Result<_, _>>()?)
        }
        (SampleFormat::Float, 32) => {
            SampleData::Float32(reader.into_samples::<f32>().collect::<std::result::Result<_, _>>()?)
        }
        (format, bits) => {
            return Err(PedalboardError::UnsupportedFormat {
                format: format!("{}-bit {:?} WAV", bits, format),
            })
        }
    };

    tracing::debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        channels,
        bit_depth = spec.bits_per_sample,
        samples = data.len(),
        "decoded WAV file"
    );

    Ok(DecodedAudio::new(spec.sample_rate, channels, data))
}

// ============================================================================
// Tests
// ============================================================================
