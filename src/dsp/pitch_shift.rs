//! Pitch Shifter Effect
//!
//! Frame-based pitch shifting by resampling. Input is accumulated per channel
//! into frames of `frame_size` samples; each full frame is resampled to
//! `round(frame_size / pitch_factor)` samples and queued for output. Output
//! starts after `frame_size - 1` samples of silence.

use std::collections::VecDeque;

use crate::dsp::effect::{param_bool, param_f32, param_usize, unknown_param, Effect, EffectParams};
use crate::dsp::resample::Resampler;
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::Result;
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ============================================================================
// Constants
// ============================================================================

/// Lowest pitch factor (one octave down)
pub const MIN_PITCH_FACTOR: f32 = 0.5;

/// Highest pitch factor (one octave up)
pub const MAX_PITCH_FACTOR: f32 = 2.0;

/// Default frame size in samples
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Smallest accepted frame size
pub const MIN_FRAME_SIZE: usize = 16;

/// Largest accepted frame size
pub const MAX_FRAME_SIZE: usize = 1 << 16;

/// Output queue bound, in frames
const QUEUE_FRAMES: usize = 4;

// ============================================================================
// Parameters
// ============================================================================

/// Pitch shifter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchShiftParams {
    /// <1 lowers pitch, >1 raises it (0.5 to 2.0)
    pub pitch_factor: f32,
    /// Pad or truncate each resampled frame back to `frame_size`
    pub warp: bool,
    /// Samples per analysis frame
    pub frame_size: usize,
}

impl Default for PitchShiftParams {
    fn default() -> Self {
        Self {
            pitch_factor: 1.0,
            warp: true,
            frame_size: DEFAULT_FRAME_SIZE,
        }
    }
}

impl PitchShiftParams {
    pub fn new(pitch_factor: f32, warp: bool) -> Self {
        Self {
            pitch_factor,
            warp,
            ..Self::default()
        }
    }

    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn clamped(self) -> Self {
        let pitch_factor = if self.pitch_factor.is_nan() {
            1.0
        } else {
            self.pitch_factor.clamp(MIN_PITCH_FACTOR, MAX_PITCH_FACTOR)
        };
        Self {
            pitch_factor,
            warp: self.warp,
            frame_size: self.frame_size.clamp(MIN_FRAME_SIZE, MAX_FRAME_SIZE),
        }
    }

    /// Length of a frame after resampling, before warp
    pub fn resampled_len(&self) -> usize {
        ((self.frame_size as f64 / self.pitch_factor as f64).round() as usize).max(1)
    }

    /// Samples queued per completed frame
    pub fn emitted_len(&self) -> usize {
        if self.warp {
            self.frame_size
        } else {
            self.resampled_len()
        }
    }
}

// ============================================================================
// Channel State
// ============================================================================

#[derive(Debug, Clone)]
struct ChannelState {
    input: Vec<f32>,
    queue: VecDeque<f32>,
}

impl ChannelState {
    fn new(frame_size: usize) -> Self {
        Self {
            input: Vec::with_capacity(frame_size),
            queue: VecDeque::with_capacity(frame_size * QUEUE_FRAMES),
        }
    }

    fn clear(&mut self) {
        self.input.clear();
        self.queue.clear();
    }
}

/// Queue one resampled frame, dropping the oldest samples past `capacity`
///
/// Returns true if anything was dropped.
fn enqueue_frame(queue: &mut VecDeque<f32>, resampled: &[f32], emitted_len: usize, capacity: usize) -> bool {
    let mut dropped = false;
    for i in 0..emitted_len {
        if queue.len() >= capacity {
            queue.pop_front();
            dropped = true;
        }
        queue.push_back(resampled.get(i).copied().unwrap_or(0.0));
    }
    dropped
}

// ============================================================================
// Pitch Shifter Effect
// ============================================================================

/// Resampling pitch shifter
///
/// With `warp` on, each frame keeps its duration and only pitch changes (with
/// the usual block artifacts). With `warp` off, frames change length, so
/// timing changes along with pitch.
#[derive(Debug, Clone)]
pub struct PitchShifter {
    params: EffectParams,
    format: SignalFormat,
    pitch: PitchShiftParams,
    resampler: Resampler,
    channels: Vec<ChannelState>,
    /// Resampled frame, `resampled_len` samples
    frame_out: Vec<f32>,
    overflow_logged: bool,
}

impl PitchShifter {
    pub fn new(format: SignalFormat, pitch: PitchShiftParams) -> Result<Self> {
        let pitch = pitch.clamped();
        let resampler = Resampler::new(pitch.frame_size, pitch.resampled_len())?;

        tracing::debug!(
            pitch_factor = pitch.pitch_factor,
            warp = pitch.warp,
            frame_size = pitch.frame_size,
            "pitch shifter created"
        );

        Ok(Self {
            params: EffectParams::default(),
            format,
            pitch,
            frame_out: vec![0.0; resampler.output_len()],
            resampler,
            channels: (0..format.channels())
                .map(|_| ChannelState::new(pitch.frame_size))
                .collect(),
            overflow_logged: false,
        })
    }

    /// Replace the parameter set
    ///
    /// A new frame size discards accumulated input and queued output; a new
    /// pitch factor only replans the resampler.
    pub fn set_params(&mut self, pitch: PitchShiftParams) -> Result<()> {
        let pitch = pitch.clamped();
        if pitch.resampled_len() != self.resampler.output_len() || pitch.frame_size != self.pitch.frame_size {
            let resampler = Resampler::new(pitch.frame_size, pitch.resampled_len())?;
            self.frame_out = vec![0.0; resampler.output_len()];
            self.resampler = resampler;
        }
        if pitch.frame_size != self.pitch.frame_size {
            self.channels = (0..self.format.channels())
                .map(|_| ChannelState::new(pitch.frame_size))
                .collect();
        }
        self.pitch = pitch;
        self.overflow_logged = false;

        tracing::debug!(
            pitch_factor = pitch.pitch_factor,
            warp = pitch.warp,
            frame_size = pitch.frame_size,
            "pitch shifter parameters replaced"
        );
        Ok(())
    }

    pub fn params(&self) -> PitchShiftParams {
        self.pitch
    }

    /// Samples of silence before the first shifted sample
    pub fn latency(&self) -> usize {
        self.pitch.frame_size - 1
    }

    /// Samples waiting in a channel's output queue
    pub fn queued(&self, channel: usize) -> usize {
        self.channels.get(channel).map_or(0, |c| c.queue.len())
    }
}

impl Effect for PitchShifter {
    impl_effect_common!("pitch_shift", "Pitch Shifter");

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.params.enabled {
            return;
        }

        let frame_size = self.pitch.frame_size;
        let emitted_len = self.pitch.emitted_len();
        let capacity = frame_size * QUEUE_FRAMES;
        let channels = buffer.num_channels().min(self.channels.len());
        let mut dropped = false;

        for frame in 0..buffer.num_frames() {
            for ch in 0..channels {
                let state = &mut self.channels[ch];
                state.input.push(buffer.samples[ch][frame]);

                if state.input.len() == frame_size {
                    self.resampler.process(&state.input, &mut self.frame_out);
                    dropped |= enqueue_frame(&mut state.queue, &self.frame_out, emitted_len, capacity);
                    state.input.clear();
                }

                buffer.samples[ch][frame] = state.queue.pop_front().unwrap_or(0.0);
            }
        }

        if dropped && !self.overflow_logged {
            self.overflow_logged = true;
            tracing::debug!(capacity, "pitch shifter output queue full, dropping oldest samples");
        }
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.clear();
        }
        self.overflow_logged = false;
    }

    fn get_params(&self) -> Value {
        json!({
            "id": self.params.id,
            "type": self.effect_type(),
            "enabled": self.params.enabled,
            "pitch_factor": self.pitch.pitch_factor,
            "warp": self.pitch.warp,
            "frame_size": self.pitch.frame_size,
        })
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        let mut next = self.pitch;
        match name {
            "pitch_factor" | "pitch" => next.pitch_factor = param_f32(name, value)?,
            "warp" => next.warp = param_bool(name, value)?,
            "frame_size" => next.frame_size = param_usize(name, value)?,
            "enabled" => {
                self.params.enabled = param_bool(name, value)?;
                return Ok(());
            }
            _ => return Err(unknown_param(self.effect_type(), name)),
        }
        self.set_params(next)
    }
}

// ============================================================================
// Tests
// ============================================================================
