//! Pipeline configuration
//!
//! JSON description of a whole pipeline: one source plus an ordered list of
//! modules. Module entries reuse each effect's parameter struct, so
//! deserialised values go through the same clamping as programmatic ones.
//!
//! ```json
//! {
//!   "buffer_size": 64,
//!   "source": { "type": "oscillator", "waveform": "sine", "frequency": 1000.0, "cycles": 100 },
//!   "modules": [
//!     { "type": "distortion", "drive_db": 12.0 },
//!     { "type": "filter", "filter_type": "low_pass", "cutoff": 3000.0, "resonance": 1.14, "slope": 12 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dsp::{
    Delay, DelayParams, Distortion, DriveParams, Filter, FilterParams, Gain, GainParams, Module, Overdrive,
    OverdriveParams, PitchShiftParams, PitchShifter, Saturation,
};
use crate::engine::{Pipeline, SignalFormat, DEFAULT_BUFFER_SIZE};
use crate::error::{PedalboardError, Result};
use crate::source::{FileSource, Oscillator, OscillatorConfig, SignalSource, Source, Waveform, DEFAULT_TABLE_SIZE};

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_sample_rate() -> u32 {
    44100
}

fn default_bit_depth() -> u16 {
    16
}

fn default_channels() -> usize {
    1
}

fn default_table_size() -> usize {
    DEFAULT_TABLE_SIZE
}

/// Where the pipeline's signal comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// WAV file; format taken from the file
    File {
        path: PathBuf,
        #[serde(default, rename = "loop")]
        looping: bool,
    },
    /// Table-lookup oscillator
    Oscillator {
        #[serde(default)]
        waveform: Waveform,
        frequency: f64,
        #[serde(default)]
        phase: f64,
        #[serde(default)]
        cycles: Option<u64>,
        #[serde(default = "default_table_size")]
        table_size: usize,
        #[serde(default = "default_sample_rate")]
        sample_rate: u32,
        #[serde(default = "default_bit_depth")]
        bit_depth: u16,
        #[serde(default = "default_channels")]
        channels: usize,
    },
}

impl SourceConfig {
    /// Build the source with `buffer_size` frames per buffer
    pub fn build(&self, buffer_size: usize) -> Result<Source> {
        match self {
            SourceConfig::File { path, looping } => Ok(FileSource::open(path, buffer_size, *looping)?.into()),
            SourceConfig::Oscillator {
                waveform,
                frequency,
                phase,
                cycles,
                table_size,
                sample_rate,
                bit_depth,
                channels,
            } => {
                let format = SignalFormat::new(*sample_rate, *bit_depth, *channels, buffer_size)?;
                let config = OscillatorConfig {
                    waveform: *waveform,
                    frequency: *frequency,
                    phase: *phase,
                    table_size: *table_size,
                    cycles: *cycles,
                };
                Ok(Oscillator::new(config, format)?.into())
            }
        }
    }
}

/// One entry of the module chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleConfig {
    Gain(GainParams),
    Distortion(DriveParams),
    Overdrive(OverdriveParams),
    Saturation(DriveParams),
    Filter(FilterParams),
    Delay(DelayParams),
    PitchShift(PitchShiftParams),
}

impl ModuleConfig {
    /// Build the module for `format`
    pub fn build(&self, format: SignalFormat) -> Result<Module> {
        let module = match *self {
            ModuleConfig::Gain(p) => Gain::new(format, p).into(),
            ModuleConfig::Distortion(p) => Distortion::new(format, p).into(),
            ModuleConfig::Overdrive(p) => Overdrive::new(format, p).into(),
            ModuleConfig::Saturation(p) => Saturation::new(format, p).into(),
            ModuleConfig::Filter(p) => Filter::new(format, p)?.into(),
            ModuleConfig::Delay(p) => Delay::new(format, p)?.into(),
            ModuleConfig::PitchShift(p) => PitchShifter::new(format, p)?.into(),
        };
        Ok(module)
    }
}

/// Complete pipeline description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Frames per buffer
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    pub source: SourceConfig,
    /// Modules in processing order
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl PipelineConfig {
    pub fn new(source: SourceConfig) -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            source,
            modules: Vec::new(),
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_module(mut self, module: ModuleConfig) -> Self {
        self.modules.push(module);
        self
    }

    /// Parse a configuration from JSON text
    ///
    /// # Errors
    /// * `InvalidConfig` - malformed JSON or unknown source/module type
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PedalboardError::InvalidConfig { reason: e.to_string() })
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), modules = config.modules.len(), "configuration loaded");
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Construct the source, every module and the pipeline
    ///
    /// Modules are built for the source's format, so their formats always
    /// match the pipeline.
    pub fn build(&self) -> Result<Pipeline> {
        if self.buffer_size == 0 {
            return Err(PedalboardError::InvalidConfig {
                reason: "buffer_size must be at least 1".to_string(),
            });
        }
        let source = self.source.build(self.buffer_size)?;
        let format = source.signal_info();
        let modules = self
            .modules
            .iter()
            .map(|m| m.build(format))
            .collect::<Result<Vec<_>>>()?;
        Pipeline::with_modules(source, modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{Effect, FilterType};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const CHAIN_JSON: &str = r#"{
        "buffer_size": 64,
        "source": { "type": "oscillator", "waveform": "sine", "frequency": 1000.0, "cycles": 100 },
        "modules": [
            { "type": "distortion", "drive": 12.0 },
            { "type": "filter", "filter_type": "low_pass", "cutoff": 3000.0, "resonance": 1.14, "slope": 12 },
            { "type": "delay", "delay_ms": 10.0, "feedback": 0.3 },
            { "type": "pitch_shift", "pitch_factor": 1.5 }
        ]
    }"#;

    #[test]
    fn test_parse_chain() {
        let config = PipelineConfig::from_json_str(CHAIN_JSON).unwrap();
        assert_eq!(config.buffer_size, 64);
        assert_eq!(
            config.source,
            SourceConfig::Oscillator {
                waveform: Waveform::Sine,
                frequency: 1000.0,
                phase: 0.0,
                cycles: Some(100),
                table_size: DEFAULT_TABLE_SIZE,
                sample_rate: 44100,
                bit_depth: 16,
                channels: 1,
            }
        );
        assert_eq!(config.modules[0], ModuleConfig::Distortion(DriveParams::new(12.0)));
        assert_eq!(
            config.modules[1],
            ModuleConfig::Filter(FilterParams::new(FilterType::LowPass, 3000.0, 1.14, 12))
        );
        assert_eq!(
            config.modules[3],
            ModuleConfig::PitchShift(PitchShiftParams::new(1.5, true))
        );
    }

    #[test]
    fn test_build_pipeline() {
        let pipeline = PipelineConfig::from_json_str(CHAIN_JSON).unwrap().build().unwrap();
        let types: Vec<&str> = pipeline.chain().iter().map(|m| m.effect_type()).collect();
        assert_eq!(types, vec!["distortion", "filter", "delay", "pitch_shift"]);
        assert_eq!(pipeline.format().sample_rate(), 44100);
        assert_eq!(pipeline.format().buffer_size(), 64);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = PipelineConfig::new(SourceConfig::File {
            path: PathBuf::from("riff.wav"),
            looping: true,
        })
        .with_buffer_size(128)
        .with_module(ModuleConfig::Gain(GainParams::new(-3.0)))
        .with_module(ModuleConfig::Overdrive(OverdriveParams::default()));

        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"loop\": true"));
        assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs() {
        let unknown_module = r#"{"source": {"type": "oscillator", "frequency": 440.0}, "modules": [{"type": "chorus"}]}"#;
        assert!(matches!(
            PipelineConfig::from_json_str(unknown_module),
            Err(PedalboardError::InvalidConfig { .. })
        ));

        let bad_slope = r#"{"source": {"type": "oscillator", "frequency": 440.0},
            "modules": [{"type": "filter", "cutoff": 500.0, "slope": 18}]}"#;
        let config = PipelineConfig::from_json_str(bad_slope).unwrap();
        assert!(matches!(config.build(), Err(PedalboardError::InvalidParameter { .. })));

        let zero_buffer = r#"{"buffer_size": 0, "source": {"type": "oscillator", "frequency": 440.0}}"#;
        let config = PipelineConfig::from_json_str(zero_buffer).unwrap();
        assert!(config.build().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chain.json");
        fs::write(&path, CHAIN_JSON).unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.modules.len(), 4);

        let missing = PipelineConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(PedalboardError::Io(_))));
    }

    #[test]
    fn test_missing_wav_file_source() {
        let config = PipelineConfig::new(SourceConfig::File {
            path: PathBuf::from("/nonexistent/pedalboard/input.wav"),
            looping: false,
        });
        assert!(config.build().is_err());
    }
}
