//! Drive stage
//!
//! Gain staging shared by the drive family (distortion, overdrive,
//! saturation). Each of those effects boosts or cuts the signal here first and
//! then applies its own memoryless waveshaper.

use crate::engine::{db_to_linear, AudioBuffer};
use serde::{Deserialize, Serialize};

/// Minimum drive in dB
pub const MIN_DRIVE_DB: f32 = -36.0;

/// Maximum drive in dB
pub const MAX_DRIVE_DB: f32 = 36.0;

/// Drive parameters used by distortion and saturation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveParams {
    /// Pre-shaper gain in decibels (-36 to +36 dB)
    #[serde(alias = "drive")]
    pub drive_db: f32,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self { drive_db: 0.0 }
    }
}

impl DriveParams {
    pub fn new(drive_db: f32) -> Self {
        Self { drive_db }
    }

    pub fn clamped(self) -> Self {
        Self {
            drive_db: clamp_drive(self.drive_db),
        }
    }
}

/// Clamp a drive amount to [-36, 36] dB; NaN becomes 0 dB
#[inline]
pub(crate) fn clamp_drive(drive_db: f32) -> f32 {
    if drive_db.is_nan() {
        0.0
    } else {
        drive_db.clamp(MIN_DRIVE_DB, MAX_DRIVE_DB)
    }
}

/// Pre-shaper gain with the linear factor cached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveStage {
    drive_db: f32,
    linear: f32,
}

impl DriveStage {
    /// Build a stage, clamping `drive_db` to the drive range
    pub fn new(drive_db: f32) -> Self {
        let drive_db = clamp_drive(drive_db);
        Self {
            drive_db,
            linear: db_to_linear(drive_db),
        }
    }

    pub fn drive_db(&self) -> f32 {
        self.drive_db
    }

    pub fn linear(&self) -> f32 {
        self.linear
    }

    /// Apply the gain, then `shape`, to every sample
    #[inline]
    pub fn apply(&self, buffer: &mut AudioBuffer, shape: impl Fn(f32) -> f32) {
        let gain = self.linear;
        buffer.map_in_place(|s| shape(s * gain));
    }
}

impl Default for DriveStage {
    fn default() -> Self {
        Self::new(0.0)
    }
}
