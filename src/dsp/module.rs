//! Closed set of effect modules
//!
//! The pipeline stores `Module` values rather than boxed trait objects so the
//! per-buffer call is a plain match.

use serde_json::Value;

use crate::dsp::{Delay, Distortion, Effect, Filter, Gain, Overdrive, PitchShifter, Saturation};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::Result;

/// Every module kind a chain can hold
#[derive(Debug, Clone)]
pub enum Module {
    Gain(Gain),
    Distortion(Distortion),
    Overdrive(Overdrive),
    Saturation(Saturation),
    Filter(Filter),
    Delay(Delay),
    PitchShift(PitchShifter),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Module::Gain($m) => $body,
            Module::Distortion($m) => $body,
            Module::Overdrive($m) => $body,
            Module::Saturation($m) => $body,
            Module::Filter($m) => $body,
            Module::Delay($m) => $body,
            Module::PitchShift($m) => $body,
        }
    };
}

impl Effect for Module {
    #[inline]
    fn process(&mut self, buffer: &mut AudioBuffer) {
        dispatch!(self, m => m.process(buffer))
    }

    fn reset(&mut self) {
        dispatch!(self, m => m.reset())
    }

    fn effect_type(&self) -> &'static str {
        dispatch!(self, m => m.effect_type())
    }

    fn display_name(&self) -> &str {
        dispatch!(self, m => m.display_name())
    }

    fn id(&self) -> &str {
        dispatch!(self, m => m.id())
    }

    fn set_id(&mut self, id: String) {
        dispatch!(self, m => m.set_id(id))
    }

    fn is_enabled(&self) -> bool {
        dispatch!(self, m => m.is_enabled())
    }

    fn set_enabled(&mut self, enabled: bool) {
        dispatch!(self, m => m.set_enabled(enabled))
    }

    fn format(&self) -> &SignalFormat {
        dispatch!(self, m => m.format())
    }

    fn get_params(&self) -> Value {
        dispatch!(self, m => m.get_params())
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        dispatch!(self, m => m.set_param(name, value))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Module {
                fn from(effect: $ty) -> Self {
                    Module::$variant(effect)
                }
            }
        )*
    };
}

impl_from!(
    Gain(Gain),
    Distortion(Distortion),
    Overdrive(Overdrive),
    Saturation(Saturation),
    Filter(Filter),
    Delay(Delay),
    PitchShift(PitchShifter),
);
