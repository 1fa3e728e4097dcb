//! Gain Effect
//!
//! Plain volume control with a dB-based interface.

use crate::dsp::effect::{param_bool, param_f32, unknown_param, Effect, EffectParams};
use crate::engine::{db_to_linear, AudioBuffer, SignalFormat};
use crate::error::Result;
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ============================================================================
// Constants
// ============================================================================

/// Minimum gain in dB (-66 dB, roughly the floor of 16-bit output)
pub const MIN_GAIN_DB: f32 = -66.0;

/// Maximum gain in dB (+36 dB)
pub const MAX_GAIN_DB: f32 = 36.0;

// ============================================================================
// Parameters
// ============================================================================

/// Gain parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainParams {
    /// Gain in decibels (-66 to +36 dB)
    #[serde(alias = "gain")]
    pub gain_db: f32,
}

impl Default for GainParams {
    fn default() -> Self {
        Self { gain_db: 0.0 }
    }
}

impl GainParams {
    pub fn new(gain_db: f32) -> Self {
        Self { gain_db }
    }

    /// Apply the valid range; NaN falls back to unity
    pub fn clamped(self) -> Self {
        let gain_db = if self.gain_db.is_nan() {
            0.0
        } else {
            self.gain_db.clamp(MIN_GAIN_DB, MAX_GAIN_DB)
        };
        Self { gain_db }
    }
}

// ============================================================================
// Gain Effect
// ============================================================================

/// Simple gain adjustment effect
///
/// # Parameters
/// - `gain_db`: Gain in decibels (-66 to +36 dB)
///
/// # Example
/// ```
/// use pedalboard::dsp::{Effect, Gain, GainParams};
/// use pedalboard::engine::{AudioBuffer, SignalFormat};
///
/// let format = SignalFormat::new(44100, 16, 1, 4).unwrap();
/// let mut gain = Gain::new(format, GainParams::new(-6.0));
/// let mut buffer = AudioBuffer::from_interleaved(&[0.5, 0.5, 0.5, 0.5], 1).unwrap();
/// gain.process(&mut buffer);
/// assert!((buffer.channel(0)[0] - 0.2506).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct Gain {
    params: EffectParams,
    format: SignalFormat,
    gain: GainParams,
    gain_linear: f32,
}

impl Gain {
    /// Create a new gain effect
    ///
    /// # Arguments
    /// * `format` - Signal format of the pipeline the effect will run in
    /// * `gain` - Gain parameters, clamped to the valid range
    pub fn new(format: SignalFormat, gain: GainParams) -> Self {
        let gain = gain.clamped();
        tracing::debug!(gain_db = gain.gain_db, "gain created");
        Self {
            params: EffectParams::default(),
            format,
            gain,
            gain_linear: db_to_linear(gain.gain_db),
        }
    }

    /// Replace the parameter set
    pub fn set_params(&mut self, gain: GainParams) {
        let gain = gain.clamped();
        self.gain = gain;
        self.gain_linear = db_to_linear(gain.gain_db);
        tracing::debug!(gain_db = gain.gain_db, "gain parameters replaced");
    }

    /// Current parameter set
    pub fn params(&self) -> GainParams {
        self.gain
    }

    /// Get the current gain in decibels
    pub fn gain_db(&self) -> f32 {
        self.gain.gain_db
    }

    /// Get the current linear gain multiplier
    pub fn gain_linear(&self) -> f32 {
        self.gain_linear
    }
}

impl Effect for Gain {
    impl_effect_common!("gain", "Gain");

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.params.enabled {
            return;
        }

        // Unity gain optimization
        if (self.gain_linear - 1.0).abs() < f32::EPSILON {
            return;
        }

        let gain = self.gain_linear;
        buffer.map_in_place(|s| s * gain);
    }

    fn reset(&mut self) {
        // Gain has no internal state to reset
    }

    fn get_params(&self) -> Value {
        json!({
            "id": self.params.id,
            "type": self.effect_type(),
            "enabled": self.params.enabled,
            "gain_db": self.gain.gain_db,
        })
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        match name {
            "gain_db" | "gain" => {
                let gain_db = param_f32(name, value)?;
                self.set_params(GainParams::new(gain_db));
                Ok(())
            }
            "enabled" => {
                self.params.enabled = param_bool(name, value)?;
                Ok(())
            }
            _ => Err(unknown_param(self.effect_type(), name)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
