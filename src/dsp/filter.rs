//! Biquad Filter Effect
//!
//! Resonant low-pass, high-pass, band-pass and shelving filters built from
//! one or two cascaded second-order sections.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::dsp::effect::{param_bool, param_f32, param_str, param_usize, unknown_param, Effect, EffectParams};
use crate::engine::{AudioBuffer, SignalFormat};
use crate::error::{PedalboardError, Result};
use crate::impl_effect_common;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ============================================================================
// Constants
// ============================================================================

/// Lowest resonance accepted; smaller values are raised to this
pub const MIN_RESONANCE: f32 = 1.0;

/// Shelf gain range in dB
pub const MAX_SHELF_GAIN_DB: f32 = 24.0;

/// Slope of a single biquad stage in dB/octave
pub const SLOPE_12_DB: u32 = 12;

/// Slope of two cascaded stages in dB/octave
pub const SLOPE_24_DB: u32 = 24;

// ============================================================================
// Filter Type
// ============================================================================

/// Filter response shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Remove above cutoff
    #[default]
    LowPass,
    /// Remove below cutoff
    HighPass,
    /// Keep a band around cutoff
    BandPass,
    /// Boost/cut below cutoff
    LowShelf,
    /// Boost/cut above cutoff
    HighShelf,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::LowPass => "low_pass",
            FilterType::HighPass => "high_pass",
            FilterType::BandPass => "band_pass",
            FilterType::LowShelf => "low_shelf",
            FilterType::HighShelf => "high_shelf",
        }
    }

    /// Whether the type uses `gain_db`
    pub fn is_shelf(&self) -> bool {
        matches!(self, FilterType::LowShelf | FilterType::HighShelf)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = PedalboardError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "low_pass" | "lowpass" | "lp" => Ok(FilterType::LowPass),
            "high_pass" | "highpass" | "hp" => Ok(FilterType::HighPass),
            "band_pass" | "bandpass" | "bp" => Ok(FilterType::BandPass),
            "low_shelf" | "lowshelf" => Ok(FilterType::LowShelf),
            "high_shelf" | "highshelf" => Ok(FilterType::HighShelf),
            _ => Err(PedalboardError::UnsupportedFilterType { name: s.to_string() }),
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Filter parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Cutoff (or shelf corner) frequency in Hz, must lie in (0, Nyquist)
    pub cutoff: f32,
    /// Resonance Q, raised to at least 1.0
    #[serde(alias = "q")]
    pub resonance: f32,
    pub filter_type: FilterType,
    /// 12 or 24 dB/octave
    pub slope: u32,
    /// Shelf gain in dB (shelving types only)
    #[serde(alias = "gain")]
    pub gain_db: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            cutoff: 1000.0,
            resonance: MIN_RESONANCE,
            filter_type: FilterType::LowPass,
            slope: SLOPE_12_DB,
            gain_db: 0.0,
        }
    }
}

impl FilterParams {
    pub fn new(filter_type: FilterType, cutoff: f32, resonance: f32, slope: u32) -> Self {
        Self {
            cutoff,
            resonance,
            filter_type,
            slope,
            gain_db: 0.0,
        }
    }

    pub fn with_gain_db(mut self, gain_db: f32) -> Self {
        self.gain_db = gain_db;
        self
    }

    /// Raise resonance to the minimum and bound the shelf gain
    pub fn clamped(self) -> Self {
        let resonance = if self.resonance.is_nan() {
            MIN_RESONANCE
        } else {
            self.resonance.max(MIN_RESONANCE)
        };
        let gain_db = if self.gain_db.is_nan() {
            0.0
        } else {
            self.gain_db.clamp(-MAX_SHELF_GAIN_DB, MAX_SHELF_GAIN_DB)
        };
        Self {
            resonance,
            gain_db,
            ..self
        }
    }

    /// Check slope and cutoff against the signal format
    ///
    /// # Errors
    /// * `InvalidParameter` - slope not 12/24, or cutoff outside (0, Nyquist)
    pub fn validate(&self, format: &SignalFormat) -> Result<()> {
        if self.slope != SLOPE_12_DB && self.slope != SLOPE_24_DB {
            return Err(PedalboardError::invalid_parameter("slope", self.slope, "12 or 24"));
        }
        let nyquist = format.nyquist();
        let cutoff = self.cutoff as f64;
        if !cutoff.is_finite() || cutoff <= 0.0 || cutoff >= nyquist {
            return Err(PedalboardError::invalid_parameter(
                "cutoff",
                self.cutoff,
                format!("a frequency between 0 and {} Hz", nyquist),
            ));
        }
        Ok(())
    }

    /// Number of cascaded biquad stages
    pub fn stages(&self) -> usize {
        if self.slope == SLOPE_24_DB {
            2
        } else {
            1
        }
    }
}

// ============================================================================
// Biquad
// ============================================================================

/// Biquad filter coefficients
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (a0 + a1*z^-1 + a2*z^-2)
/// Normalized: all coefficients divided by a0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiquadCoeffs {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoeffs {
    /// Calculate coefficients using the Audio EQ Cookbook formulas
    ///
    /// `params` is expected to be clamped and validated.
    pub fn calculate(params: &FilterParams, sample_rate: f64) -> Self {
        let q = params.resonance as f64;
        let w0 = 2.0 * PI * params.cutoff as f64 / sample_rate;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * q);

        // Shelf amplitude and slope term
        let a = 10.0_f64.powf(params.gain_db as f64 / 40.0);
        let s = params.slope as f64 / 24.0;
        let beta = a.sqrt() * ((a + 1.0 / a) * (1.0 / s - 1.0) + 2.0).sqrt();

        let (b0, b1, b2, a0, a1, a2) = match params.filter_type {
            FilterType::LowPass => (
                (1.0 - cos_w0) / 2.0,
                1.0 - cos_w0,
                (1.0 - cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            FilterType::HighPass => (
                (1.0 + cos_w0) / 2.0,
                -(1.0 + cos_w0),
                (1.0 + cos_w0) / 2.0,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            FilterType::BandPass => (
                alpha,
                0.0,
                -alpha,
                1.0 + alpha,
                -2.0 * cos_w0,
                1.0 - alpha,
            ),
            FilterType::LowShelf => (
                a * ((a + 1.0) - (a - 1.0) * cos_w0 + beta * sin_w0),
                2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                a * ((a + 1.0) - (a - 1.0) * cos_w0 - beta * sin_w0),
                (a + 1.0) + (a - 1.0) * cos_w0 + beta * sin_w0,
                -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                (a + 1.0) + (a - 1.0) * cos_w0 - beta * sin_w0,
            ),
            FilterType::HighShelf => (
                a * ((a + 1.0) + (a - 1.0) * cos_w0 + beta * sin_w0),
                -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                a * ((a + 1.0) + (a - 1.0) * cos_w0 - beta * sin_w0),
                (a + 1.0) - (a - 1.0) * cos_w0 + beta * sin_w0,
                2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                (a + 1.0) - (a - 1.0) * cos_w0 - beta * sin_w0,
            ),
        };

        BiquadCoeffs {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Magnitude of the frequency response at `frequency` Hz
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * frequency / sample_rate;
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        ((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im)).sqrt()
    }
}

/// Biquad filter state for one channel of one stage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiquadState {
    x1: f64, // x[n-1]
    x2: f64, // x[n-2]
    y1: f64, // y[n-1]
    y2: f64, // y[n-2]
}

impl BiquadState {
    /// Process a single sample (direct form I)
    #[inline]
    pub fn process(&mut self, input: f64, coeffs: &BiquadCoeffs) -> f64 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Filter Effect
// ============================================================================

/// Biquad filter with 12 or 24 dB/octave slope
///
/// At 24 dB/octave the second stage filters the first stage's output with the
/// same coefficients. The final output is clipped to [-1, 1].
#[derive(Debug, Clone)]
pub struct Filter {
    params: EffectParams,
    format: SignalFormat,
    filter: FilterParams,
    coeffs: BiquadCoeffs,
    /// Per channel, per stage
    state: Vec<[BiquadState; 2]>,
}

impl Filter {
    /// Create a filter
    ///
    /// # Errors
    /// * `InvalidParameter` - slope not 12/24, or cutoff outside (0, Nyquist)
    pub fn new(format: SignalFormat, filter: FilterParams) -> Result<Self> {
        let filter = filter.clamped();
        filter.validate(&format)?;
        let coeffs = BiquadCoeffs::calculate(&filter, format.sample_rate() as f64);

        tracing::debug!(
            filter_type = %filter.filter_type,
            cutoff = filter.cutoff,
            resonance = filter.resonance,
            slope = filter.slope,
            "filter created"
        );

        Ok(Self {
            params: EffectParams::default(),
            format,
            filter,
            coeffs,
            state: vec![[BiquadState::default(); 2]; format.channels()],
        })
    }

    /// Replace the parameter set
    ///
    /// History is kept when the stage count is unchanged so a cutoff sweep
    /// stays continuous; changing the slope starts from a clean state.
    /// On error the filter is left untouched.
    pub fn set_params(&mut self, filter: FilterParams) -> Result<()> {
        let filter = filter.clamped();
        filter.validate(&self.format)?;
        let coeffs = BiquadCoeffs::calculate(&filter, self.format.sample_rate() as f64);

        if filter.stages() != self.filter.stages() {
            self.reset();
        }
        self.filter = filter;
        self.coeffs = coeffs;

        tracing::debug!(
            filter_type = %filter.filter_type,
            cutoff = filter.cutoff,
            resonance = filter.resonance,
            slope = filter.slope,
            "filter parameters replaced"
        );
        Ok(())
    }

    pub fn params(&self) -> FilterParams {
        self.filter
    }

    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.coeffs
    }

    /// Magnitude response of the whole cascade at `frequency` Hz
    pub fn magnitude_response(&self, frequency: f64) -> f64 {
        let stage = self.coeffs.magnitude_at(frequency, self.format.sample_rate() as f64);
        stage.powi(self.filter.stages() as i32)
    }
}

impl Effect for Filter {
    impl_effect_common!("filter", "Filter");

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if !self.params.enabled {
            return;
        }

        let stages = self.filter.stages();
        let coeffs = self.coeffs;
        for (ch, state) in self.state.iter_mut().enumerate().take(buffer.num_channels()) {
            for sample in buffer.channel_mut(ch).iter_mut() {
                let mut y = *sample as f64;
                for stage in state.iter_mut().take(stages) {
                    y = stage.process(y, &coeffs);
                }
                *sample = y.clamp(-1.0, 1.0) as f32;
            }
        }
    }

    fn reset(&mut self) {
        for state in &mut self.state {
            for stage in state.iter_mut() {
                stage.reset();
            }
        }
    }

    fn get_params(&self) -> Value {
        json!({
            "id": self.params.id,
            "type": self.effect_type(),
            "enabled": self.params.enabled,
            "filter_type": self.filter.filter_type.as_str(),
            "cutoff": self.filter.cutoff,
            "resonance": self.filter.resonance,
            "slope": self.filter.slope,
            "gain_db": self.filter.gain_db,
        })
    }

    fn set_param(&mut self, name: &str, value: &Value) -> Result<()> {
        let mut next = self.filter;
        match name {
            "cutoff" => next.cutoff = param_f32(name, value)?,
            "resonance" | "q" => next.resonance = param_f32(name, value)?,
            "filter_type" => next.filter_type = param_str(name, value)?.parse()?,
            "slope" => {
                next.slope = u32::try_from(param_usize(name, value)?)
                    .map_err(|_| PedalboardError::invalid_parameter(name, value, "12 or 24"))?
            }
            "gain_db" | "gain" => next.gain_db = param_f32(name, value)?,
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    const SR: u32 = 44100;

    fn format(channels: usize, buffer_size: usize) -> SignalFormat {
        SignalFormat::new(SR, 16, channels, buffer_size).unwrap()
    }

    fn sine(freq: f32, frames: usize, amplitude: f32) -> AudioBuffer {
        let samples: Vec<f32> = (0..frames)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin())
            .collect();
        AudioBuffer::from_interleaved(&samples, 1).unwrap()
    }

    /// RMS of the second half, after the transient has settled
    fn settled_rms(buffer: &AudioBuffer) -> f32 {
        let data = &buffer.channel(0)[buffer.num_frames() / 2..];
        (data.iter().map(|s| s * s).sum::<f32>() / data.len() as f32).sqrt()
    }

    #[test_case("low_pass", FilterType::LowPass)]
    #[test_case("HighPass", FilterType::HighPass)]
    #[test_case("band-pass", FilterType::BandPass)]
    #[test_case("low shelf", FilterType::LowShelf)]
    #[test_case("high_shelf", FilterType::HighShelf)]
    fn test_filter_type_parse(name: &str, expected: FilterType) {
        assert_eq!(name.parse::<FilterType>().unwrap(), expected);
    }

    #[test]
    fn test_filter_type_parse_unknown() {
        let err = "notch".parse::<FilterType>().unwrap_err();
        assert!(matches!(err, PedalboardError::UnsupportedFilterType { .. }));
    }

    #[test]
    fn test_resonance_clamped_to_one() {
        let filter = Filter::new(format(1, 64), FilterParams::new(FilterType::LowPass, 1000.0, 0.3, 12)).unwrap();
        assert_eq!(filter.params().resonance, 1.0);
    }

    #[test_case(0 ; "zero")]
    #[test_case(6 ; "six")]
    #[test_case(18 ; "eighteen")]
    #[test_case(48 ; "forty eight")]
    fn test_invalid_slope(slope: u32) {
        let result = Filter::new(format(1, 64), FilterParams::new(FilterType::LowPass, 1000.0, 1.0, slope));
        assert!(matches!(result, Err(PedalboardError::InvalidParameter { .. })));
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-100.0 ; "negative")]
    #[test_case(22050.0 ; "nyquist")]
    #[test_case(f32::NAN ; "nan")]
    fn test_invalid_cutoff(cutoff: f32) {
        let result = Filter::new(format(1, 64), FilterParams::new(FilterType::LowPass, cutoff, 1.0, 12));
        assert!(result.is_err());
    }

    #[test]
    fn test_lowpass_coefficients_dc_gain() {
        let params = FilterParams::new(FilterType::LowPass, 3000.0, 1.0, 12);
        let c = BiquadCoeffs::calculate(&params, SR as f64);
        // H(1) = sum(b) / (1 + sum(a)) = 1 for a low-pass
        let dc = (c.b0 + c.b1 + c.b2) / (1.0 + c.a1 + c.a2);
        assert_abs_diff_eq!(dc, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.b0, c.b2, epsilon = 1e-12);
    }

    #[test]
    fn test_bandpass_coefficients() {
        let params = FilterParams::new(FilterType::BandPass, 1000.0, 2.0, 12);
        let c = BiquadCoeffs::calculate(&params, SR as f64);
        assert_eq!(c.b1, 0.0);
        assert_abs_diff_eq!(c.b0, -c.b2, epsilon = 1e-12);
        // Unity peak at centre frequency
        assert_abs_diff_eq!(c.magnitude_at(1000.0, SR as f64), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_shelf_gains() {
        let fmt = format(1, 64);
        let low = Filter::new(fmt, FilterParams::new(FilterType::LowShelf, 500.0, 1.0, 24).with_gain_db(6.0)).unwrap();
        let low_stage = low.coeffs().magnitude_at(20.0, SR as f64);
        assert_abs_diff_eq!(20.0 * low_stage.log10(), 6.0, epsilon = 0.2);
        assert_abs_diff_eq!(low.coeffs().magnitude_at(15000.0, SR as f64), 1.0, epsilon = 0.02);

        let high = Filter::new(fmt, FilterParams::new(FilterType::HighShelf, 2000.0, 1.0, 24).with_gain_db(-6.0)).unwrap();
        let high_stage = high.coeffs().magnitude_at(20000.0, SR as f64);
        assert_abs_diff_eq!(20.0 * high_stage.log10(), -6.0, epsilon = 0.2);
        assert_abs_diff_eq!(high.coeffs().magnitude_at(20.0, SR as f64), 1.0, epsilon = 0.02);
    }

    #[test]
    fn test_lowpass_passband_and_stopband() {
        let fmt = format(1, 8820);
        let params = FilterParams::new(FilterType::LowPass, 1000.0, 1.0, 12);

        let mut filter = Filter::new(fmt, params).unwrap();
        let mut low = sine(100.0, 8820, 0.5);
        let input_rms = settled_rms(&low);
        filter.process(&mut low);
        assert_abs_diff_eq!(settled_rms(&low), input_rms, epsilon = input_rms * 0.05);

        let mut filter = Filter::new(fmt, params).unwrap();
        let mut high = sine(10000.0, 8820, 0.5);
        filter.process(&mut high);
        assert!(settled_rms(&high) < input_rms * 0.05);
    }

    #[test]
    fn test_24db_is_steeper_than_12db() {
        let fmt = format(1, 64);
        let f12 = Filter::new(fmt, FilterParams::new(FilterType::LowPass, 1000.0, 1.0, 12)).unwrap();
        let f24 = Filter::new(fmt, FilterParams::new(FilterType::LowPass, 1000.0, 1.0, 24)).unwrap();

        let m12 = f12.magnitude_response(8000.0);
        let m24 = f24.magnitude_response(8000.0);
        assert_abs_diff_eq!(m24, m12 * m12, epsilon = 1e-12);
        assert!(m24 < m12);
    }

    #[test]
    fn test_24db_cascades_stage_output() {
        let fmt = format(1, 256);
        let params = FilterParams::new(FilterType::LowPass, 2000.0, 1.0, 24);
        let mut filter = Filter::new(fmt, params).unwrap();
        let mut buffer = sine(500.0, 256, 0.4);
        let input = buffer.clone();
        filter.process(&mut buffer);

        // Reference cascade built from two independent sections
        let coeffs = BiquadCoeffs::calculate(&params, SR as f64);
        let (mut s1, mut s2) = (BiquadState::default(), BiquadState::default());
        for (out, x) in buffer.channel(0).iter().zip(input.channel(0)) {
            let y = s2.process(s1.process(*x as f64, &coeffs), &coeffs);
            assert_abs_diff_eq!(*out, y as f32, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_state_carries_across_buffers() {
        let params = FilterParams::new(FilterType::LowPass, 800.0, 1.0, 12);
        let whole = sine(300.0, 128, 0.5);

        let mut one_shot = Filter::new(format(1, 128), params).unwrap();
        let mut expected = whole.clone();
        one_shot.process(&mut expected);

        let mut split = Filter::new(format(1, 64), params).unwrap();
        let mut first = AudioBuffer::from_interleaved(&whole.channel(0)[..64], 1).unwrap();
        let mut second = AudioBuffer::from_interleaved(&whole.channel(0)[64..], 1).unwrap();
        split.process(&mut first);
        split.process(&mut second);

        assert_eq!(first.channel(0), &expected.channel(0)[..64]);
        assert_eq!(second.channel(0), &expected.channel(0)[64..]);
    }

    #[test]
    fn test_channels_filtered_independently() {
        let mut filter = Filter::new(format(2, 4), FilterParams::default()).unwrap();
        let mut buffer = AudioBuffer::from_interleaved(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 2).unwrap();
        filter.process(&mut buffer);
        assert!(buffer.channel(0)[0] > 0.0);
        assert!(buffer.channel(1).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_output_clipped() {
        let params = FilterParams::new(FilterType::BandPass, 1000.0, 1.0, 12);
        let mut filter = Filter::new(format(1, 4), params).unwrap();
        let mut buffer = AudioBuffer::from_interleaved(&[50.0, 50.0, -50.0, -50.0], 1).unwrap();
        filter.process(&mut buffer);
        assert!(buffer.channel(0).iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn test_set_param_validates_without_mutation() {
        let mut filter = Filter::new(format(1, 64), FilterParams::default()).unwrap();
        filter.set_param("cutoff", &json!(2500.0)).unwrap();
        filter.set_param("filter_type", &json!("high_pass")).unwrap();
        assert_eq!(filter.params().cutoff, 2500.0);
        assert_eq!(filter.params().filter_type, FilterType::HighPass);

        assert!(filter.set_param("cutoff", &json!(30000.0)).is_err());
        assert!(filter.set_param("slope", &json!(36)).is_err());
        // 2^32 + 12 must not wrap around to a valid slope
        assert!(filter.set_param("slope", &json!(4_294_967_308u64)).is_err());
        assert!(filter.set_param("filter_type", &json!("comb")).is_err());
        assert_eq!(filter.params().cutoff, 2500.0);
        assert_eq!(filter.params().slope, 12);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut filter = Filter::new(format(1, 4), FilterParams::default()).unwrap();
        let mut impulse = AudioBuffer::from_interleaved(&[1.0, 0.0, 0.0, 0.0], 1).unwrap();
        filter.process(&mut impulse);

        filter.reset();
        let mut silence = AudioBuffer::new(4, 1);
        filter.process(&mut silence);
        assert!(silence.is_silent());
    }
}
