//! FFT resampling
//!
//! Band-limited change of length for one block of samples: forward FFT, copy
//! (or zero-extend) the spectrum to the new length, inverse FFT. The block is
//! treated as one period of a periodic signal.

use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{PedalboardError, Result};

/// Planned resampler from `input_len` to `output_len` samples
///
/// FFT plans and work buffers are allocated once here; `process` does not
/// allocate.
pub struct Resampler {
    input_len: usize,
    output_len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    spectrum: Vec<Complex<f64>>,
    resampled: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl Resampler {
    /// Plan a resampler
    ///
    /// # Errors
    /// * `InvalidParameter` - either length is zero
    pub fn new(input_len: usize, output_len: usize) -> Result<Self> {
        if input_len == 0 {
            return Err(PedalboardError::invalid_parameter("input_len", input_len, "> 0"));
        }
        if output_len == 0 {
            return Err(PedalboardError::invalid_parameter("output_len", output_len, "> 0"));
        }

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(input_len);
        let inverse = planner.plan_fft_inverse(output_len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            input_len,
            output_len,
            forward,
            inverse,
            spectrum: vec![Complex::default(); input_len],
            resampled: vec![Complex::default(); output_len],
            scratch: vec![Complex::default(); scratch_len],
        })
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn output_len(&self) -> usize {
        self.output_len
    }

    /// Resample `input` into `output`
    ///
    /// Reads up to `input_len` samples (missing ones count as zero) and writes
    /// up to `output_len` samples.
    pub fn process(&mut self, input: &[f32], output: &mut [f32]) {
        for (i, bin) in self.spectrum.iter_mut().enumerate() {
            *bin = Complex::new(input.get(i).copied().unwrap_or(0.0) as f64, 0.0);
        }
        self.forward.process_with_scratch(&mut self.spectrum, &mut self.scratch);

        self.fill_resampled_spectrum();
        self.inverse.process_with_scratch(&mut self.resampled, &mut self.scratch);

        let scale = 1.0 / self.input_len as f64;
        for (out, bin) in output.iter_mut().zip(&self.resampled) {
            *out = (bin.re * scale) as f32;
        }
    }

    /// Map the input spectrum onto `output_len` bins
    ///
    /// Positive and negative frequencies up to the shorter length's Nyquist
    /// are copied; for an even shorter length the Nyquist bin is folded
    /// (down) or split (up) so the result stays real.
    fn fill_resampled_spectrum(&mut self) {
        let (n_in, n_out) = (self.input_len, self.output_len);
        let x = &self.spectrum;
        let y = &mut self.resampled;

        if n_in == n_out {
            y.copy_from_slice(x);
            return;
        }

        y.fill(Complex::default());
        let n = n_in.min(n_out);
        let half = (n + 1) / 2;

        y[0] = x[0];
        for k in 1..half {
            y[k] = x[k];
            y[n_out - k] = x[n_in - k];
        }

        if n % 2 == 0 {
            let nyq = n / 2;
            if n_out < n_in {
                y[nyq] = x[nyq] + x[n_in - nyq];
            } else {
                let split = x[nyq] * 0.5;
                y[nyq] = split;
                y[n_out - nyq] = split;
            }
        }
    }
}

impl fmt::Debug for Resampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resampler")
            .field("input_len", &self.input_len)
            .field("output_len", &self.output_len)
            .finish()
    }
}

impl Clone for Resampler {
    fn clone(&self) -> Self {
        Self {
            input_len: self.input_len,
            output_len: self.output_len,
            forward: Arc::clone(&self.forward),
            inverse: Arc::clone(&self.inverse),
            spectrum: self.spectrum.clone(),
            resampled: self.resampled.clone(),
            scratch: self.scratch.clone(),
        }
    }
}
