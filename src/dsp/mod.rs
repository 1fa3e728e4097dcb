//! DSP Effects Library
//!
//! Buffer-oriented signal processing modules. All effects implement the
//! `Effect` trait and are collected in the closed [`Module`] enum, which the
//! [`EffectChain`] runs in order.

mod chain;
mod delay;
mod distortion;
mod drive;
mod effect;
mod filter;
mod gain;
mod module;
mod overdrive;
mod pitch_shift;
mod resample;
mod saturation;

pub use chain::EffectChain;
pub use delay::{Delay, DelayLine, DelayParams, MAX_DELAY_MS, MIN_DELAY_MS};
pub use distortion::Distortion;
pub use drive::{DriveParams, DriveStage, MAX_DRIVE_DB, MIN_DRIVE_DB};
pub use effect::{Effect, EffectParams};
pub use filter::{BiquadCoeffs, BiquadState, Filter, FilterParams, FilterType, MIN_RESONANCE};
pub use gain::{Gain, GainParams, MAX_GAIN_DB, MIN_GAIN_DB};
pub use module::Module;
pub use overdrive::{Overdrive, OverdriveParams};
pub use pitch_shift::{PitchShiftParams, PitchShifter, DEFAULT_FRAME_SIZE, MAX_PITCH_FACTOR, MIN_PITCH_FACTOR};
pub use resample::Resampler;
pub use saturation::Saturation;
