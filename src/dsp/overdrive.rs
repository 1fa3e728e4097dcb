//! Overdrive Effect
//!
//! Drive stage followed by an asymmetric hard clip. The positive half clips at
//! `threshold`, the negative half at `-threshold * (1 - asymmetry)`.

use crate::dsp::drive::{clamp_drive, DriveStage};
use crate::dsp::effect::{param_bool, param_f32, unknown_param, Effect, EffectParams};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::Result;
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default clip threshold (full scale)
pub const DEFAULT_THRESHOLD: f32 = 1.0;

/// Default asymmetry (negative half clips at half the threshold)
pub const DEFAULT_ASYMMETRY: f32 = 0.5;

/// Overdrive parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverdriveParams {
    /// Pre-clip gain in decibels (-36 to +36 dB)
    #[serde(alias = "drive")]
    pub drive_db: f32,
    /// Positive clip threshold (0.0 to 1.0)
    pub threshold: f32,
    /// 0.0 = symmetric, 1.0 = negative half clipped to zero
    pub asymmetry: f32,
}

impl Default for OverdriveParams {
    fn default() -> Self {
        Self {
            drive_db: 0.0,
            threshold: DEFAULT_THRESHOLD,
            asymmetry: DEFAULT_ASYMMETRY,
        }
    }
}

fn clamp_unit(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl OverdriveParams {
    pub fn new(drive_db: f32, threshold: f32, asymmetry: f32) -> Self {
        Self {
            drive_db,
            threshold,
            asymmetry,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            drive_db: clamp_drive(self.drive_db),
            threshold: clamp_unit(self.threshold, DEFAULT_THRESHOLD),
            asymmetry: clamp_unit(self.asymmetry, DEFAULT_ASYMMETRY),
        }
    }

    /// Lower clip bound, always in [-threshold, 0]
    pub fn negative_threshold(&self) -> f32 {
        -self.threshold * (1.0 - self.asymmetry)
    }
}

/// Asymmetric hard-clipping overdrive
#[derive(Debug, Clone)]
pub struct Overdrive {
    params: EffectParams,
    format: SignalFormat,
    overdrive: OverdriveParams,
    stage: DriveStage,
}

impl Overdrive {
    pub fn new(format: SignalFormat, overdrive: OverdriveParams) -> Self {
        let overdrive = overdrive.clamped();
        tracing::debug!(
            drive_db = overdrive.drive_db,
            threshold = overdrive.threshold,
            asymmetry = overdrive.asymmetry,
            "overdrive created"
        );
        Self {
            params: EffectParams::default(),
            format,
            overdrive,
            stage: DriveStage::new(overdrive.drive_db),
        }
    }

    /// Replace the parameter set
    pub fn set_params(&mut self, overdrive: OverdriveParams) {
        let overdrive = overdrive.clamped();
        self.overdrive = overdrive;
        self.stage = DriveStage::new(overdrive.drive_db);
        tracing::debug!(
            drive_db = overdrive.drive_db,
            threshold = overdrive.threshold,
            asymmetry = overdrive.asymmetry,
            "overdrive parameters replaced"
        );
    }

    pub fn params(&self) -> OverdriveParams {
        self.overdrive
    }
}

impl Effect for Overdrive {
    impl_effect_common!("overdrive", "Overdrive");

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.params.enabled {
            return;
        }
        let upper = self.overdrive.threshold;
        let lower = self.overdrive.negative_threshold();
        self.stage.apply(buffer, |s| s.clamp(lower, upper));
    }

    fn reset(&mut self) {}

    fn get_params(&self) -> Value {
        json!({
            "id": self.params.id,
            "type": self.effect_type(),
            "enabled": self.params.enabled,
            "drive_db": self.overdrive.drive_db,
            "threshold": self.overdrive.threshold,
            "asymmetry": self.overdrive.asymmetry,
        })
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        let mut next = self.overdrive;
        match name {
            "drive_db" | "drive" => next.drive_db = param_f32(name, value)?,
            "threshold" => next.threshold = param_f32(name, value)?,
            "asymmetry" => next.asymmetry = param_f32(name, value)?,
            "enabled" => {
                self.params.enabled = param_bool(name, value)?;
                return Ok(());
            }
            _ => return Err(unknown_param(self.effect_type(), name)),
        }
        self.set_params(next);
        Ok(())
    }
}
