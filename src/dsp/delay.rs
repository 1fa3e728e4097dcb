//! Delay Effect
//!
//! Feedback delay: each output frame is the input plus the output from
//! `delay_samples` frames earlier, scaled by `feedback`.

use crate::dsp::effect::{param_bool, param_f32, unknown_param, Effect, EffectParams};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::{PedalboardError, Result};
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Shortest delay time in milliseconds
pub const MIN_DELAY_MS: f32 = 1.0;

/// Longest delay time in milliseconds
pub const MAX_DELAY_MS: f32 = 60_000.0;

/// Delay parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayParams {
    /// Delay time in milliseconds (at least 1 ms)
    #[serde(alias = "delay")]
    pub delay_ms: f32,
    /// Amount of delayed output fed back in (0.0 to 1.0)
    ///
    /// 0.0 gives no echo at all; 1.0 repeats forever.
    pub feedback: f32,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            delay_ms: 250.0,
            feedback: 0.5,
        }
    }
}

impl DelayParams {
    pub fn new(delay_ms: f32, feedback: f32) -> Self {
        Self { delay_ms, feedback }
    }

    pub fn clamped(self) -> Self {
        let delay_ms = if self.delay_ms.is_nan() {
            MIN_DELAY_MS
        } else {
            self.delay_ms.max(MIN_DELAY_MS)
        };
        let feedback = if self.feedback.is_nan() {
            0.0
        } else {
            self.feedback.clamp(0.0, 1.0)
        };
        Self { delay_ms, feedback }
    }

    /// Delay length in frames, never shorter than one buffer
    pub fn delay_samples(&self, format: &SignalFormat) -> usize {
        format.ms_to_samples(self.delay_ms).max(format.buffer_size())
    }

    fn validate(&self) -> Result<()> {
        if !self.delay_ms.is_finite() || self.delay_ms > MAX_DELAY_MS {
            return Err(PedalboardError::invalid_parameter(
                "delay_ms",
                self.delay_ms,
                format!("at most {} milliseconds", MAX_DELAY_MS),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Delay Line
// ============================================================================

/// Interleaved ring of past output frames
///
/// Slots not yet written hold zeros, so reading the slot at `write_pos` yields
/// the frame exactly `len` frames back, or silence during warm-up.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayLine {
    len: usize,
    channels: usize,
    history: Vec<f32>,
    write_pos: usize,
    /// Frames written so far, saturating at `len`
    filled: usize,
}

impl DelayLine {
    pub fn new(len: usize, channels: usize) -> Self {
        let len = len.max(1);
        Self {
            len,
            channels,
            history: vec![0.0; len * channels],
            write_pos: 0,
            filled: 0,
        }
    }

    /// Length in frames
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Frames of history currently held
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Sample from `len` frames ago on `channel`
    #[inline]
    pub fn read(&self, channel: usize) -> f32 {
        self.history[self.write_pos * self.channels + channel]
    }

    /// Store a sample at the current position on `channel`
    #[inline]
    pub fn write(&mut self, channel: usize, value: f32) {
        self.history[self.write_pos * self.channels + channel] = value;
    }

    /// Move to the next frame
    #[inline]
    pub fn advance(&mut self) {
        self.write_pos = (self.write_pos + 1) % self.len;
        if self.filled < self.len {
            self.filled += 1;
        }
    }

    /// Build a line of `new_len` frames holding the most recent history
    ///
    /// Keeps the last `min(filled, new_len)` frames in order, oldest first
    /// from slot 0, with the write position just after the newest frame.
    pub fn resized(&self, new_len: usize) -> Self {
        let mut next = DelayLine::new(new_len, self.channels);
        let kept = self.filled.min(next.len);

        // Oldest kept frame sits `kept` slots behind the write position
        let start = (self.write_pos + self.len - kept) % self.len;
        for i in 0..kept {
            let src = ((start + i) % self.len) * self.channels;
            let dst = i * self.channels;
            next.history[dst..dst + self.channels].copy_from_slice(&self.history[src..src + self.channels]);
        }
        next.filled = kept;
        next.write_pos = kept % next.len;
        next
    }

    pub fn clear(&mut self) {
        self.history.fill(0.0);
        self.write_pos = 0;
        self.filled = 0;
    }
}

// ============================================================================
// Delay Effect
// ============================================================================

/// Feedback delay
///
/// `y[n] = x[n] + feedback * y[n - D]` per channel, with
/// `D = max(round(sample_rate * delay_ms / 1000), buffer_size)`.
#[derive(Debug, Clone)]
pub struct Delay {
    params: EffectParams,
    format: SignalFormat,
    delay: DelayParams,
    line: DelayLine,
}

impl Delay {
    /// Create a delay
    ///
    /// # Errors
    /// * `InvalidParameter` - non-finite delay time
    pub fn new(format: SignalFormat, delay: DelayParams) -> Result<Self> {
        let delay = delay.clamped();
        delay.validate()?;
        let samples = delay.delay_samples(&format);

        tracing::debug!(
            delay_ms = delay.delay_ms,
            delay_samples = samples,
            feedback = delay.feedback,
            "delay created"
        );

        Ok(Self {
            params: EffectParams::default(),
            format,
            delay,
            line: DelayLine::new(samples, format.channels()),
        })
    }

    /// Replace the parameter set
    ///
    /// A changed delay length swaps in a freshly built line carrying the most
    /// recent history; the old line is never resized in place.
    pub fn set_params(&mut self, delay: DelayParams) -> Result<()> {
        let delay = delay.clamped();
        delay.validate()?;
        let samples = delay.delay_samples(&self.format);

        if samples != self.line.len() {
            let line = self.line.resized(samples);
            self.line = line;
        }
        self.delay = delay;

        tracing::debug!(
            delay_ms = delay.delay_ms,
            delay_samples = samples,
            feedback = delay.feedback,
            "delay parameters replaced"
        );
        Ok(())
    }

    pub fn params(&self) -> DelayParams {
        self.delay
    }

    /// Current delay length in frames
    pub fn delay_samples(&self) -> usize {
        self.line.len()
    }

    pub fn line(&self) -> &DelayLine {
        &self.line
    }
}

impl Effect for Delay {
    impl_effect_common!("delay", "Delay");

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.params.enabled {
            return;
        }

        let feedback = self.delay.feedback;
        let channels = buffer.num_channels().min(self.format.channels());
        for frame in 0..buffer.num_frames() {
            for ch in 0..channels {
                let delayed = self.line.read(ch);
                let sample = &mut buffer.samples[ch][frame];
                *sample += delayed * feedback;
                self.line.write(ch, *sample);
            }
            self.line.advance();
        }
    }

    fn reset(&mut self) {
        self.line.clear();
    }

    fn get_params(&self) -> Value {
        json!({
            "id": self.params.id,
            "type": self.effect_type(),
            "enabled": self.params.enabled,
            "delay_ms": self.delay.delay_ms,
            "feedback": self.delay.feedback,
            "delay_samples": self.line.len(),
        })
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        let mut next = self.delay;
        match name {
            "delay_ms" | "delay" => next.delay_ms = param_f32(name, value)?,
            "feedback" => next.feedback = param_f32(name, value)?,
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
