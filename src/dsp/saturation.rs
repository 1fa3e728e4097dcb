//! Saturation Effect
//!
//! Drive stage followed by a hyperbolic tangent soft clip.

use crate::dsp::drive::{DriveParams, DriveStage};
use crate::dsp::effect::{param_bool, param_f32, unknown_param, Effect, EffectParams};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::Result;
use crate::impl_effect_common;
use serde_json::{json, Value};

/// Soft saturation
///
/// `y = tanh(gain * x)`. Output is bounded to (-1, 1) and approaches linear for
/// small inputs.
#[derive(Debug, Clone)]
pub struct Saturation {
    params: EffectParams,
    format: SignalFormat,
    drive: DriveParams,
    stage: DriveStage,
}

impl Saturation {
    pub fn new(format: SignalFormat, drive: DriveParams) -> Self {
        let drive = drive.clamped();
        tracing::debug!(drive_db = drive.drive_db, "saturation created");
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
        tracing::debug!(drive_db = drive.drive_db, "saturation parameters replaced");
    }

    pub fn params(&self) -> DriveParams {
        self.drive
    }

    pub fn drive_db(&self) -> f32 {
        self.drive.drive_db
    }
}

impl Effect for Saturation {
    impl_effect_common!("saturation", "Saturation");

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.params.enabled {
            return;
        }
        self.stage.apply(buffer, f32::tanh);
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn format() -> SignalFormat {
        SignalFormat::new(44100, 16, 1, 4).unwrap()
    }

    #[test]
    fn test_saturation_is_tanh_of_driven_input() {
        let mut sat = Saturation::new(format(), DriveParams::new(6.0));
        let input = [0.1f32, 0.5, -0.8, 0.0];
        let mut buffer = AudioBuffer::from_interleaved(&input, 1).unwrap();
        sat.process(&mut buffer);

        let gain = 10.0f32.powf(6.0 / 20.0);
        for (out, x) in buffer.channel(0).iter().zip(input) {
            assert_abs_diff_eq!(*out, (x * gain).tanh(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_saturation_output_bounded() {
        let mut sat = Saturation::new(format(), DriveParams::new(36.0));
        let mut buffer = AudioBuffer::from_interleaved(&[1.0, -1.0, 0.9, -0.9], 1).unwrap();
        sat.process(&mut buffer);
        assert!(buffer.channel(0).iter().all(|s| s.abs() <= 1.0));
        assert!(buffer.channel(0)[0] > 0.999);
    }

    #[test]
    fn test_saturation_disabled() {
        let mut sat = Saturation::new(format(), DriveParams::new(24.0));
        sat.set_enabled(false);
        let mut buffer = AudioBuffer::from_interleaved(&[0.5, 0.5, 0.5, 0.5], 1).unwrap();
        sat.process(&mut buffer);
        assert_eq!(buffer.channel(0)[0], 0.5);
    }
}
