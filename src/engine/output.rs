//! Output sample conversion
//!
//! Converts the pipeline's floating-point buffer into the interleaved
//! representation the sink consumes.

use super::{AudioBuffer, SignalFormat};

/// Full-scale multiplier for 16-bit output
pub const I16_SCALE: f32 = 32767.0;

/// Full-scale multiplier for 32-bit output (2^31 - 1)
pub const I32_SCALE: f64 = 2_147_483_647.0;

/// Interleaved buffer in the sink's sample representation
#[derive(Debug, Clone, PartialEq)]
pub enum OutputBuffer {
    /// Signed 16-bit samples
    Int16(Vec<i16>),
    /// Signed 32-bit samples
    Int32(Vec<i32>),
    /// 32-bit float samples; used for the silent fallback on unsupported depths
    Float32(Vec<f32>),
}

impl OutputBuffer {
    /// Convert a float buffer to the format's output representation
    ///
    /// 16-bit depth scales by 32767 and 32-bit depth by 2^31 - 1, truncating
    /// toward zero. Any other depth yields an all-zero buffer of the correct
    /// shape instead of failing.
    pub fn convert(buffer: &AudioBuffer, format: &SignalFormat) -> Self {
        match format.bit_depth() {
            16 => OutputBuffer::Int16(
                interleaved_samples(buffer, format)
                    .map(|s| (s * I16_SCALE) as i16)
                    .collect(),
            ),
            32 => OutputBuffer::Int32(
                interleaved_samples(buffer, format)
                    .map(|s| (s as f64 * I32_SCALE) as i32)
                    .collect(),
            ),
            _ => Self::silence(format),
        }
    }

    /// Silent buffer of the format's shape in the fallback representation
    pub fn silence(format: &SignalFormat) -> Self {
        OutputBuffer::Float32(vec![0.0; format.samples_per_buffer()])
    }

    /// Number of interleaved samples
    pub fn len(&self) -> usize {
        match self {
            OutputBuffer::Int16(s) => s.len(),
            OutputBuffer::Int32(s) => s.len(),
            OutputBuffer::Float32(s) => s.len(),
        }
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if every sample is zero
    pub fn is_silent(&self) -> bool {
        match self {
            OutputBuffer::Int16(s) => s.iter().all(|&v| v == 0),
            OutputBuffer::Int32(s) => s.iter().all(|&v| v == 0),
            OutputBuffer::Float32(s) => s.iter().all(|&v| v == 0.0),
        }
    }

    /// Raw little-endian bytes, as written to an audio device
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            OutputBuffer::Int16(s) => s.iter().flat_map(|v| v.to_le_bytes()).collect(),
            OutputBuffer::Int32(s) => s.iter().flat_map(|v| v.to_le_bytes()).collect(),
            OutputBuffer::Float32(s) => s.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }
}

/// Interleaved view limited to the format's shape; missing samples read as zero
fn interleaved_samples<'a>(
    buffer: &'a AudioBuffer,
    format: &SignalFormat,
) -> impl Iterator<Item = f32> + 'a {
    let channels = format.channels();
    let frames = format.buffer_size();
    (0..frames).flat_map(move |frame| {
        (0..channels).map(move |ch| buffer.get(ch, frame).unwrap_or(0.0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(bit_depth: u16) -> SignalFormat {
        SignalFormat::new(44100, bit_depth, 2, 4).unwrap()
    }

    fn buffer() -> AudioBuffer {
        AudioBuffer::from_interleaved(&[1.0, -1.0, 0.5, -0.5, 0.0, 0.25, 0.99999, -0.00001], 2)
            .unwrap()
    }

    #[test]
    fn test_convert_16_bit() {
        let out = OutputBuffer::convert(&buffer(), &format(16));
        assert_eq!(
            out,
            OutputBuffer::Int16(vec![32767, -32767, 16383, -16383, 0, 8191, 32766, 0])
        );
    }

    #[test]
    fn test_convert_32_bit() {
        let out = OutputBuffer::convert(&buffer(), &format(32));
        match out {
            OutputBuffer::Int32(s) => {
                assert_eq!(s.len(), 8);
                assert_eq!(s[0], i32::MAX);
                assert_eq!(s[1], -i32::MAX);
                assert_eq!(s[2], 1_073_741_823);
                assert_eq!(s[4], 0);
            }
            other => panic!("expected Int32 output, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_depth_is_silent() {
        let out = OutputBuffer::convert(&buffer(), &format(64));
        assert_eq!(out.len(), 8);
        assert!(out.is_silent());
        assert!(matches!(out, OutputBuffer::Float32(_)));
    }

    #[test]
    fn test_to_le_bytes() {
        let out = OutputBuffer::Int16(vec![1, -1]);
        assert_eq!(out.to_le_bytes(), vec![0x01, 0x00, 0xff, 0xff]);

        let out = OutputBuffer::Int32(vec![0; 3]);
        assert_eq!(out.to_le_bytes().len(), 12);
    }
}
