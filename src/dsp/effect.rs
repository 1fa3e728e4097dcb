//! Effect trait definition
//!
//! Base trait for all DSP modules in the chain.

use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::{PedalboardError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters common to all effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectParams {
    /// Unique identifier for this effect instance
    pub id: String,
    /// Whether the effect is enabled
    pub enabled: bool,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            enabled: true,
        }
    }
}

/// Base trait for all DSP effects
///
/// Effects process one buffer in place per call. Any history a
/// recurrence needs across calls lives inside the effect; nothing keeps a
/// reference to the buffer after `process` returns.
pub trait Effect: Send {
    /// Process audio buffer in-place
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Reset effect state
    ///
    /// Clears internal history (filter state, delay lines, pitch queues)
    /// without touching parameters.
    fn reset(&mut self);

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;

    /// Get human-readable display name
    fn display_name(&self) -> &str;

    /// Get the unique instance ID
    fn id(&self) -> &str;

    /// Set the unique instance ID
    fn set_id(&mut self, id: String);

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Enable or disable the effect
    fn set_enabled(&mut self, enabled: bool);

    /// Signal format the effect was built for
    fn format(&self) -> &SignalFormat;

    /// Get all parameters as JSON (for UI/config)
    fn get_params(&self) -> Value;

    /// Set a single parameter by name
    fn set_param(&mut self, name: &str, value: &Value) -> Result<()>;
}

/// Read a numeric parameter value
pub(crate) fn param_f32(name: &str, value: &Value) -> Result<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| PedalboardError::invalid_parameter(name, value, "a number"))
}

/// Read a non-negative integer parameter value
pub(crate) fn param_usize(name: &str, value: &Value) -> Result<usize> {
    value
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| PedalboardError::invalid_parameter(name, value, "a non-negative integer"))
}

/// Read a boolean parameter value
pub(crate) fn param_bool(name: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| PedalboardError::invalid_parameter(name, value, "a boolean"))
}

/// Read a string parameter value
pub(crate) fn param_str<'a>(name: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| PedalboardError::invalid_parameter(name, value, "a string"))
}

/// Error for a parameter name the effect does not know
pub(crate) fn unknown_param(effect_type: &str, name: &str) -> PedalboardError {
    PedalboardError::invalid_parameter(
        name,
        "<unknown>",
        format!("a parameter of the {} effect", effect_type),
    )
}

/// Helper macro to implement common Effect trait methods
///
/// Expects the implementing type to have `params: EffectParams` and
/// `format: SignalFormat` fields.
#[macro_export]
macro_rules! impl_effect_common {
    ($effect_type:expr, $display_name:expr) => {
        fn effect_type(&self) -> &'static str {
            $effect_type
        }

        fn display_name(&self) -> &str {
            $display_name
        }

        fn id(&self) -> &str {
            &self.params.id
        }

        fn set_id(&mut self, id: String) {
            self.params.id = id;
        }

        fn is_enabled(&self) -> bool {
            self.params.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.params.enabled = enabled;
        }

        fn format(&self) -> &$crate::engine::SignalFormat {
            &self.format
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_effect_params_unique_ids() {
        let a = EffectParams::default();
        let b = EffectParams::default();
        assert!(a.enabled);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_param_readers() {
        assert_eq!(param_f32("gain", &json!(-6.5)).unwrap(), -6.5);
        assert!(param_f32("gain", &json!("loud")).is_err());
        assert_eq!(param_usize("frame_size", &json!(512)).unwrap(), 512);
        assert!(param_usize("frame_size", &json!(-1)).is_err());
        assert!(param_bool("warp", &json!(true)).unwrap());
        assert_eq!(param_str("filter_type", &json!("low_pass")).unwrap(), "low_pass");
    }
}
