//! Pedalboard - Streaming Audio Effects Engine
//!
//! A pull-based pipeline producing fixed-size buffers of audio: one signal
//! source (a WAV file or a table-lookup oscillator) feeds an ordered chain of
//! effect modules, and the result is converted to the sink's integer format.
//!
//! # Architecture
//!
//! - `source`: producers of one buffer per call (`FileSource`, `Oscillator`)
//! - `dsp`: effect modules (gain, drive family, biquad filter, delay, pitch shift)
//! - `engine`: signal format, buffers, output conversion and the `Pipeline`
//! - `config`: JSON description of a whole pipeline
//!
//! ```
//! use pedalboard::dsp::{Distortion, DriveParams, Filter, FilterParams, FilterType};
//! use pedalboard::engine::{Pipeline, SignalFormat};
//! use pedalboard::source::{Oscillator, OscillatorConfig, Waveform};
//!
//! let format = SignalFormat::new(44100, 16, 1, 64).unwrap();
//! let osc = Oscillator::new(OscillatorConfig::new(Waveform::Sine, 1000.0).with_cycles(100), format).unwrap();
//!
//! let mut pipeline = Pipeline::new(osc);
//! pipeline.add_module(Distortion::new(format, DriveParams::new(12.0))).unwrap();
//! pipeline
//!     .add_module(Filter::new(format, FilterParams::new(FilterType::LowPass, 3000.0, 1.14, 12)).unwrap())
//!     .unwrap();
//!
//! let output = pipeline.run();
//! assert_eq!(output.len(), 64);
//! ```

pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod source;

pub use error::{PedalboardError, Result};
