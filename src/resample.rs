//! Linear-interpolation resampling along the sample axis.

use ndarray::{Array2, ArrayView2};

use crate::error::{EcgError, Result};

/// Evenly spaced sample positions over `[0, n_samples - 1]`, both ends included.
///
/// The last position is pinned to `n_samples - 1` so accumulated rounding in
/// the step never lands it past the final sample.
pub fn interpolation_positions(n_samples: usize, new_length: usize) -> Vec<f64> {
    let stop = n_samples.saturating_sub(1) as f64;
    match new_length {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = stop / (new_length - 1) as f64;
            let mut positions: Vec<f64> = (0..new_length).map(|i| i as f64 * step).collect();
            positions[new_length - 1] = stop;
            positions
        }
    }
}

/// Resample every channel of a [channels × samples] signal to `new_length`
/// samples using piecewise-linear interpolation.
///
/// The right neighbour of the final output sample is clamped to its left
/// neighbour, so that sample always reproduces the last input column exactly.
pub fn resample(signal: ArrayView2<'_, f64>, new_length: usize) -> Result<Array2<f64>> {
    if new_length == 0 {
        return Err(EcgError::InvalidArgument(
            "new length must be positive".to_string(),
        ));
    }

    let (n_channels, n_samples) = signal.dim();
    if n_samples < 2 {
        return Err(EcgError::InvalidArgument(format!(
            "resampling requires at least 2 samples, got {}",
            n_samples
        )));
    }

    let positions = interpolation_positions(n_samples, new_length);
    let x_left: Vec<usize> = positions.iter().map(|&p| p as usize).collect();
    let mut x_right: Vec<usize> = x_left.iter().map(|&x| x + 1).collect();
    x_right[new_length - 1] = x_left[new_length - 1];

    log::debug!(
        "Resampling {} channels from {} to {} samples",
        n_channels,
        n_samples,
        new_length
    );

    Ok(Array2::from_shape_fn((n_channels, new_length), |(ch, i)| {
        let alpha = positions[i] - x_left[i] as f64;
        let y_left = signal[[ch, x_left[i]]];
        let y_right = signal[[ch, x_right[i]]];
        y_left + (y_right - y_left) * alpha
    }))
}
