//! Effect Chain management
//!
//! Modules are processed in chain order (index 0 first); each consumes the
//! previous module's output. Order is whatever the caller sets.

use super::{Effect, Module};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::{PedalboardError, Result};

/// Ordered list of modules sharing one signal format
#[derive(Debug, Clone)]
pub struct EffectChain {
    effects: Vec<Module>,
    format: SignalFormat,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new(format: SignalFormat) -> Self {
        Self {
            effects: Vec::new(),
            format,
        }
    }

    /// Format every module in the chain was built for
    pub fn format(&self) -> &SignalFormat {
        &self.format
    }

    /// Reset all effects
    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }

    fn check_format(&self, effect: &Module) -> Result<()> {
        if effect.format() != &self.format {
            return Err(PedalboardError::FormatMismatch {
                expected: self.format.to_string(),
                actual: effect.format().to_string(),
            });
        }
        Ok(())
    }

    /// Append an effect at the end of the chain
    ///
    /// # Errors
    /// * `FormatMismatch` - the effect was built for a different format
    pub fn push(&mut self, effect: Module) -> Result<()> {
        self.check_format(&effect)?;
        tracing::debug!(effect_type = effect.effect_type(), id = effect.id(), "module appended");
        self.effects.push(effect);
        Ok(())
    }

    /// Insert an effect at a specific index (clamped to the chain length)
    pub fn insert(&mut self, effect: Module, index: usize) -> Result<()> {
        self.check_format(&effect)?;
        let index = index.min(self.effects.len());
        tracing::debug!(effect_type = effect.effect_type(), id = effect.id(), index, "module inserted");
        self.effects.insert(index, effect);
        Ok(())
    }

    fn position(&self, effect_id: &str) -> Result<usize> {
        self.effects
            .iter()
            .position(|e| e.id() == effect_id)
            .ok_or_else(|| PedalboardError::EffectNotFound {
                effect_id: effect_id.to_string(),
            })
    }

    /// Remove an effect by ID
    pub fn remove(&mut self, effect_id: &str) -> Result<Module> {
        let index = self.position(effect_id)?;
        let effect = self.effects.remove(index);
        tracing::debug!(effect_type = effect.effect_type(), id = effect_id, "module removed");
        Ok(effect)
    }

    /// Get a reference to an effect by ID
    pub fn get(&self, effect_id: &str) -> Option<&Module> {
        self.effects.iter().find(|e| e.id() == effect_id)
    }

    /// Get a mutable reference to an effect by ID
    pub fn get_mut(&mut self, effect_id: &str) -> Option<&mut Module> {
        self.effects.iter_mut().find(|e| e.id() == effect_id)
    }

    /// Move an effect to a new position
    pub fn move_effect(&mut self, effect_id: &str, new_index: usize) -> Result<()> {
        let current_index = self.position(effect_id)?;
        let effect = self.effects.remove(current_index);
        let new_index = new_index.min(self.effects.len());
        self.effects.insert(new_index, effect);
        Ok(())
    }

    /// Process the entire chain
    #[inline]
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        for effect in &mut self.effects {
            effect.process(buffer);
        }
    }

    /// Get the number of effects in the chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Iterate over effects
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.effects.iter()
    }

    /// IDs in processing order
    pub fn ids(&self) -> Vec<String> {
        self.effects.iter().map(|e| e.id().to_string()).collect()
    }

    /// Serialize chain state to JSON
    pub fn to_json(&self) -> serde_json::Value {
        let effects: Vec<serde_json::Value> = self.effects.iter().map(|e| e.get_params()).collect();
        serde_json::json!({
            "effects": effects,
            "sample_rate": self.format.sample_rate(),
            "channels": self.format.channels(),
            "buffer_size": self.format.buffer_size(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{Distortion, DriveParams, Gain, GainParams};
    use pretty_assertions::assert_eq;

    fn format() -> SignalFormat {
        SignalFormat::new(44100, 16, 1, 4).unwrap()
    }

    fn gain(db: f32, id: &str) -> Module {
        let mut g = Gain::new(format(), GainParams::new(db));
        g.set_id(id.to_string());
        g.into()
    }

    #[test]
    fn test_chain_new() {
        let chain = EffectChain::new(format());
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_chain_order_and_moves() {
        let mut chain = EffectChain::new(format());
        chain.push(gain(0.0, "a")).unwrap();
        chain.push(gain(0.0, "b")).unwrap();
        chain.insert(gain(0.0, "c"), 0).unwrap();
        chain.insert(gain(0.0, "d"), 99).unwrap();
        assert_eq!(chain.ids(), vec!["c", "a", "b", "d"]);

        chain.move_effect("d", 1).unwrap();
        assert_eq!(chain.ids(), vec!["c", "d", "a", "b"]);

        let removed = chain.remove("a").unwrap();
        assert_eq!(removed.id(), "a");
        assert_eq!(chain.ids(), vec!["c", "d", "b"]);
    }

    #[test]
    fn test_chain_missing_id() {
        let mut chain = EffectChain::new(format());
        assert!(matches!(chain.remove("nope"), Err(PedalboardError::EffectNotFound { .. })));
        assert!(chain.move_effect("nope", 0).is_err());
        assert!(chain.get("nope").is_none());
    }

    #[test]
    fn test_chain_rejects_other_format() {
        let mut chain = EffectChain::new(format());
        let other = SignalFormat::new(48000, 16, 1, 4).unwrap();
        let result = chain.push(Gain::new(other, GainParams::default()).into());
        assert!(matches!(result, Err(PedalboardError::FormatMismatch { .. })));
        assert!(chain.is_empty());
    }

    #[test]
    fn test_chain_processes_in_order() {
        // Clip before gain: 0.8 -> (+12 dB, clip) 1.0 -> (-6 dB) ~0.501
        let mut chain = EffectChain::new(format());
        chain.push(Distortion::new(format(), DriveParams::new(12.0)).into()).unwrap();
        chain.push(gain(-6.0, "post")).unwrap();

        let mut buffer = AudioBuffer::from_interleaved(&[0.8, 0.8, 0.8, 0.8], 1).unwrap();
        chain.process(&mut buffer);
        assert!((buffer.channel(0)[0] - 0.501).abs() < 1e-3);

        // Reverse order: 0.8 * 0.501 * 3.98 ~ 1.6 -> clipped to 1.0
        chain.move_effect("post", 0).unwrap();
        let mut buffer = AudioBuffer::from_interleaved(&[0.8, 0.8, 0.8, 0.8], 1).unwrap();
        chain.process(&mut buffer);
        assert_eq!(buffer.channel(0)[0], 1.0);
    }

    #[test]
    fn test_chain_get_mut_and_json() {
        let mut chain = EffectChain::new(format());
        chain.push(gain(0.0, "g")).unwrap();
        chain
            .get_mut("g")
            .unwrap()
            .set_param("gain_db", &serde_json::json!(-3.0))
            .unwrap();

        let json = chain.to_json();
        assert_eq!(json["effects"][0]["gain_db"], -3.0);
        assert_eq!(json["sample_rate"], 44100);
    }
}
