//! Pull-based pipeline
//!
//! Owns one source and an ordered module chain. Each `run()` pulls exactly one
//! buffer from the source, threads it through the chain in order and converts
//! the result to the output representation. Nothing is buffered ahead.

use super::{AudioBuffer, OutputBuffer, SignalFormat};
use crate::dsp::{Effect, EffectChain, Module};
use crate::error::Result;
use crate::source::{SignalSource, Source};

/// Source plus module chain, driven by the consumer one buffer at a time
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: Source,
    chain: EffectChain,
    format: SignalFormat,
    /// Reused for every `run()`
    work: AudioBuffer,
    buffers_processed: u64,
    warned_unsupported: bool,
}

impl Pipeline {
    /// Create a pipeline with an empty chain
    ///
    /// The pipeline's format is the source's format.
    pub fn new(source: impl Into<Source>) -> Self {
        let source = source.into();
        let format = source.signal_info();
        tracing::debug!(format = %format, "pipeline created");
        Self {
            source,
            chain: EffectChain::new(format),
            format,
            work: AudioBuffer::new(format.buffer_size(), format.channels()),
            buffers_processed: 0,
            warned_unsupported: false,
        }
    }

    /// Create a pipeline and append `modules` in order
    ///
    /// # Errors
    /// * `FormatMismatch` - a module was built for a different format
    pub fn with_modules(source: impl Into<Source>, modules: impl IntoIterator<Item = Module>) -> Result<Self> {
        let mut pipeline = Self::new(source);
        for module in modules {
            pipeline.add_module(module)?;
        }
        Ok(pipeline)
    }

    /// Produce the next float buffer without output conversion
    pub fn run_float(&mut self) -> &AudioBuffer {
        self.source.read_into(&mut self.work);
        self.chain.process(&mut self.work);
        self.buffers_processed += 1;
        &self.work
    }

    /// Produce the next buffer in the output representation
    ///
    /// Unsupported output bit depths yield a silent buffer of the right shape;
    /// the condition is logged once per pipeline.
    pub fn run(&mut self) -> OutputBuffer {
        self.run_float();
        if !self.format.is_output_supported() && !self.warned_unsupported {
            self.warned_unsupported = true;
            tracing::warn!(
                bit_depth = self.format.bit_depth(),
                "unsupported output bit depth, emitting silence"
            );
        }
        OutputBuffer::convert(&self.work, &self.format)
    }

    /// Rewind the source and clear every module's history
    pub fn reset(&mut self) {
        self.source.reset();
        self.chain.reset();
        self.work.clear();
        self.buffers_processed = 0;
        tracing::debug!("pipeline reset");
    }

    /// Append a module at the end of the chain
    pub fn add_module(&mut self, module: impl Into<Module>) -> Result<()> {
        self.chain.push(module.into())
    }

    /// Insert a module at `index` (clamped to the chain length)
    pub fn insert_module(&mut self, module: impl Into<Module>, index: usize) -> Result<()> {
        self.chain.insert(module.into(), index)
    }

    /// Remove a module by ID and hand it back
    pub fn remove_module(&mut self, effect_id: &str) -> Result<Module> {
        self.chain.remove(effect_id)
    }

    pub fn format(&self) -> &SignalFormat {
        &self.format
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut Source {
        &mut self.source
    }

    pub fn chain(&self) -> &EffectChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut EffectChain {
        &mut self.chain
    }

    /// Float buffer produced by the most recent `run()`/`run_float()`
    pub fn last_buffer(&self) -> &AudioBuffer {
        &self.work
    }

    /// Number of `run()`/`run_float()` calls since creation or reset
    pub fn buffers_processed(&self) -> u64 {
        self.buffers_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{Gain, GainParams};
    use crate::engine::io::{DecodedAudio, SampleData};
    use crate::error::PedalboardError;
    use crate::source::FileSource;

    fn file_source(data: Vec<f32>, channels: usize, buffer_size: usize) -> FileSource {
        FileSource::new(DecodedAudio::new(44100, channels, SampleData::Float32(data)), buffer_size, false).unwrap()
    }

    fn int16_source(data: Vec<i16>, buffer_size: usize) -> FileSource {
        FileSource::new(DecodedAudio::new(44100, 1, SampleData::Int16(data)), buffer_size, false).unwrap()
    }

    #[test]
    fn test_empty_chain_converts_source() {
        let mut pipeline = Pipeline::new(int16_source(vec![32767, -32767, 0, 32767], 4));
        assert_eq!(pipeline.format().bit_depth(), 16);

        match pipeline.run() {
            OutputBuffer::Int16(samples) => {
                assert_eq!(samples, vec![32767, -32767, 0, 32767]);
            }
            other => panic!("expected 16-bit output, got {:?}", other),
        }
        assert_eq!(pipeline.buffers_processed(), 1);
    }

    #[test]
    fn test_32_bit_output_interleaved() {
        let mut pipeline = Pipeline::new(file_source(vec![0.5, -0.5, 1.0, 0.0], 2, 2));
        match pipeline.run() {
            OutputBuffer::Int32(samples) => {
                assert_eq!(samples, vec![1_073_741_823, -1_073_741_823, i32::MAX, 0]);
            }
            other => panic!("expected 32-bit output, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_depth_gives_silence() {
        let decoded = DecodedAudio::new(44100, 2, SampleData::Float64(vec![0.5; 8]));
        let mut pipeline = Pipeline::new(FileSource::new(decoded, 4, false).unwrap());
        for _ in 0..3 {
            let out = pipeline.run();
            assert_eq!(out, OutputBuffer::Float32(vec![0.0; 8]));
        }
        assert!(pipeline.warned_unsupported);
        // The float path still carries the signal
        pipeline.reset();
        assert_eq!(pipeline.run_float().channel(0), &[0.5; 4]);
    }

    #[test]
    fn test_modules_applied_in_order() {
        let source = file_source(vec![0.25; 4], 1, 4);
        let format = source.signal_info();
        let mut pipeline = Pipeline::new(source);
        pipeline.add_module(Gain::new(format, GainParams::new(6.0206))).unwrap();
        pipeline.add_module(Gain::new(format, GainParams::new(6.0206))).unwrap();

        let out = pipeline.run_float();
        assert!(out.channel(0).iter().all(|s| (s - 1.0).abs() < 1e-4));
    }

    #[test]
    fn test_module_insert_and_remove() {
        let source = file_source(vec![0.5; 16], 1, 4);
        let format = source.signal_info();
        let mut pipeline = Pipeline::new(source);

        let mut cut = Gain::new(format, GainParams::new(-66.0));
        cut.set_id("cut".to_string());
        pipeline.insert_module(cut, 0).unwrap();
        assert!(pipeline.run_float().peak() < 0.001);

        let removed = pipeline.remove_module("cut").unwrap();
        assert_eq!(removed.effect_type(), "gain");
        assert_eq!(pipeline.run_float().channel(0), &[0.5; 4]);
        assert!(pipeline.remove_module("cut").is_err());
    }

    #[test]
    fn test_rejects_module_for_other_format() {
        let mut pipeline = Pipeline::new(file_source(vec![0.0; 4], 1, 4));
        let other = SignalFormat::new(44100, 32, 1, 8).unwrap();
        let err = pipeline.add_module(Gain::new(other, GainParams::default())).unwrap_err();
        assert!(matches!(err, PedalboardError::FormatMismatch { .. }));
        assert!(pipeline.chain().is_empty());
    }

    #[test]
    fn test_ended_source_yields_full_silent_buffers() {
        let mut pipeline = Pipeline::new(int16_source(vec![1000; 6], 4));
        assert!(!pipeline.run().is_silent());
        assert!(!pipeline.run().is_silent());
        for _ in 0..5 {
            let out = pipeline.run();
            assert_eq!(out.len(), 4);
            assert!(out.is_silent());
        }
    }

    #[test]
    fn test_reset_restarts_source() {
        let mut pipeline = Pipeline::new(int16_source(vec![1000; 4], 4));
        pipeline.run();
        assert!(pipeline.run().is_silent());
        pipeline.reset();
        assert_eq!(pipeline.buffers_processed(), 0);
        assert!(!pipeline.run().is_silent());
    }
}
