//! Distortion Effect
//!
//! Drive stage followed by a symmetric hard clip at full scale.

use crate::dsp::drive::{DriveParams, DriveStage};
use crate::dsp::effect::{param_bool, param_f32, unknown_param, Effect, EffectParams};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::Result;
use crate::impl_effect_common;
use serde_json::{json, Value};

/// Hard-clipping distortion
///
/// Every sample is multiplied by the drive gain and clipped to [-1, 1].
/// Holds no state between buffers.
#[derive(Debug, Clone)]
pub struct Distortion {
    params: EffectParams,
    format: SignalFormat,
    drive: DriveParams,
    stage: DriveStage,
}

impl Distortion {
    pub fn new(format: SignalFormat, drive: DriveParams) -> Self {
        let drive = drive.clamped();
        tracing::debug!(drive_db = drive.drive_db, "distortion created");
        Self {
            params: EffectParams::default(),
            format,
            drive,
            stage: DriveStage::new(drive.drive_db),
        }
    }

    /// Replace the parameter set
    pub fn set_params(&mut self, drive: DriveParams) {
        let drive = drive.clamped();
        self.drive = drive;
        self.stage = DriveStage::new(drive.drive_db);
        tracing::debug!(drive_db = drive.drive_db, "distortion parameters replaced");
    }

    pub fn params(&self) -> DriveParams {
        self.drive
    }

    pub fn drive_db(&self) -> f32 {
        self.drive.drive_db
    }
}

impl Effect for Distortion {
    impl_effect_common!("distortion", "Distortion");

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.params.enabled {
            return;
        }
        self.stage.apply(buffer, |s| s.clamp(-1.0, 1.0));
    }

    fn reset(&mut self) {}

    fn get_params(&self) -> Value {
        json!({
            "id": self.params.id,
            "type": self.effect_type(),
            "enabled": self.params.enabled,
            "drive_db": self.drive.drive_db,
        })
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        match name {
            "drive_db" | "drive" => {
                let drive_db = param_f32(name, value)?;
                self.set_params(DriveParams::new(drive_db));
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
