//! FFT-based frequency band rejection
//!
//! Signals are moved into the frequency domain with a real FFT along one axis,
//! the bins outside the requested band are zeroed and the result is brought
//! back with the inverse real FFT at the original length.

use ndarray::{Array, ArrayView, ArrayView1, Dimension};
use rustfft::{num_complex::Complex, FftPlanner};
use std::cell::RefCell;

use crate::error::{EcgError, Result};
use crate::types::resolve_axis;

// Thread-local FFT planner so repeated lanes of the same length reuse plans
thread_local! {
    static FFT_PLANNER: RefCell<FftPlanner<f64>> = RefCell::new(FftPlanner::new());
}

/// Frequencies of the `n / 2 + 1` bins returned by [`rfft`] for a signal of
/// length `n` sampled every `d` seconds.
pub fn rfftfreq(n: usize, d: f64) -> Vec<f64> {
    let val = 1.0 / (n as f64 * d);
    (0..=n / 2).map(|k| k as f64 * val).collect()
}

/// Forward FFT of a real sequence, keeping the non-negative frequency half.
pub fn rfft(samples: ArrayView1<'_, f64>) -> Vec<Complex<f64>> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = samples.iter().map(|&x| Complex::new(x, 0.0)).collect();
    FFT_PLANNER.with(|planner| {
        let fft = planner.borrow_mut().plan_fft_forward(n);
        fft.process(&mut buffer);
    });

    buffer.truncate(n / 2 + 1);
    buffer
}

/// Inverse of [`rfft`], producing exactly `n` real samples.
///
/// The spectrum is treated as Hermitian: missing bins are zero, and the
/// imaginary parts of the DC bin and (for even `n`) the Nyquist bin are
/// dropped.
pub fn irfft(spectrum: &[Complex<f64>], n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let half = n / 2;
    let bin = |k: usize| spectrum.get(k).copied().unwrap_or_default();

    let mut buffer: Vec<Complex<f64>> = (0..n)
        .map(|k| {
            if k <= half {
                bin(k)
            } else {
                bin(n - k).conj()
            }
        })
        .collect();
    buffer[0].im = 0.0;
    if n.is_multiple_of(2) {
        buffer[half].im = 0.0;
    }

    FFT_PLANNER.with(|planner| {
        let fft = planner.borrow_mut().plan_fft_inverse(n);
        fft.process(&mut buffer);
    });

    let scale = 1.0 / n as f64;
    buffer.iter().map(|c| c.re * scale).collect()
}

/// Bins rejected by [`band_pass`]: at or below `low`, or at or above `high`.
pub fn rejection_mask(freqs: &[f64], low: Option<f64>, high: Option<f64>) -> Vec<bool> {
    freqs
        .iter()
        .map(|&f| low.is_some_and(|low| f <= low) || high.is_some_and(|high| f >= high))
        .collect()
}

/// Reject frequencies outside `(low, high)` along `axis`.
///
/// Setting only `low` acts as a high-pass filter, only `high` as a low-pass
/// filter, and neither leaves the signal unchanged up to FFT round-off.
pub fn band_pass<D: Dimension>(
    signal: ArrayView<'_, f64, D>,
    sampling_freq: f64,
    low: Option<f64>,
    high: Option<f64>,
    axis: isize,
) -> Result<Array<f64, D>> {
    if !sampling_freq.is_finite() || sampling_freq <= 0.0 {
        return Err(EcgError::InvalidArgument(
            "Sampling rate must be a positive float".to_string(),
        ));
    }

    let axis = resolve_axis(axis, signal.ndim())?;
    let n = signal.len_of(axis);
    if n == 0 {
        return Err(EcgError::InvalidArgument(format!(
            "cannot filter along empty axis {}",
            axis.index()
        )));
    }

    if let (Some(low), Some(high)) = (low, high) {
        if low >= high {
            log::warn!(
                "Band-pass low cutoff ({} Hz) is not below high cutoff ({} Hz); every bin will be rejected",
                low,
                high
            );
        }
    }

    let freqs = rfftfreq(n, 1.0 / sampling_freq);
    let mask = rejection_mask(&freqs, low, high);
    log::debug!(
        "Band-pass on shape {:?} along axis {}: rejecting {} of {} bins",
        signal.shape(),
        axis.index(),
        mask.iter().filter(|&&m| m).count(),
        mask.len()
    );

    let mut output = Array::zeros(signal.raw_dim());
    for (mut out_lane, lane) in output.lanes_mut(axis).into_iter().zip(signal.lanes(axis)) {
        let mut spectrum = rfft(lane);
        for (bin, &rejected) in spectrum.iter_mut().zip(&mask) {
            if rejected {
                *bin = Complex::new(0.0, 0.0);
            }
        }
        let filtered = irfft(&spectrum, n);
        for (out, value) in out_lane.iter_mut().zip(filtered) {
            *out = value;
        }
    }

    Ok(output)
}
