//! Kernel convolution along an arbitrary axis
//!
//! Every 1-D lane along the chosen axis is padded by half the kernel length
//! with a pluggable [`PadStrategy`], convolved with "same" alignment, then
//! trimmed back to its original length. The output has the input's shape.

use ndarray::{Array, Array1, ArrayD, ArrayView, ArrayView1, Dimension, Ix1};

use crate::error::{EcgError, Result};
use crate::padding::{PadOptions, PadStrategy};
use crate::types::resolve_axis;

/// One-dimensional convolution kernel
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel(Array1<f64>);

impl Kernel {
    /// Normalize an arbitrary-rank array into a kernel.
    ///
    /// A 0-d scalar becomes a length-1 kernel; anything that is not 1-D after
    /// that, or is empty, is rejected.
    pub fn new(values: ArrayD<f64>) -> Result<Self> {
        let values = if values.ndim() == 0 {
            values.into_shape_with_order(vec![1]).map_err(|e| {
                EcgError::InvalidArgument(format!("cannot ravel scalar kernel: {}", e))
            })?
        } else {
            values
        };

        let kernel = values.into_dimensionality::<Ix1>().map_err(|_| {
            EcgError::InvalidArgument("Kernel must be 1-D array".to_string())
        })?;

        if kernel.is_empty() {
            return Err(EcgError::InvalidArgument("Kernel must not be empty".to_string()));
        }

        Ok(Self(kernel))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    /// Number of samples added to each side of a lane before convolving.
    pub fn half_width(&self) -> usize {
        self.0.len() / 2
    }

    /// Moving-average kernel of the given length.
    pub fn boxcar(length: usize) -> Result<Self> {
        if length == 0 {
            return Err(EcgError::InvalidArgument(
                "boxcar length must be positive".to_string(),
            ));
        }
        Ok(Self(Array1::from_elem(length, 1.0 / length as f64)))
    }
}

impl TryFrom<Vec<f64>> for Kernel {
    type Error = EcgError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(Array1::from(values).into_dyn())
    }
}

impl From<f64> for Kernel {
    fn from(value: f64) -> Self {
        Self(Array1::from_elem(1, value))
    }
}

/// Discrete convolution of `a` with `v`, keeping the centre `max(len(a), len(v))`
/// samples of the full result.
///
/// For even-length kernels the extra sample is taken from the left, matching
/// the usual "same" convention.
pub fn convolve_same(a: ArrayView1<'_, f64>, v: ArrayView1<'_, f64>) -> Array1<f64> {
    let (n, m) = (a.len(), v.len());
    if n == 0 || m == 0 {
        return Array1::zeros(0);
    }

    let out_len = n.max(m);
    let start = (n.min(m) - 1) / 2;

    Array1::from_shape_fn(out_len, |i| {
        // full[k] = sum_j a[k - j] * v[j]
        let k = start + i;
        let j_lo = k.saturating_sub(n - 1);
        let j_hi = k.min(m - 1);
        (j_lo..=j_hi).map(|j| a[k - j] * v[j]).sum()
    })
}

/// Convolve a single lane: pad, convolve with "same" alignment, trim the padding.
pub fn convolve_lane(
    lane: ArrayView1<'_, f64>,
    kernel: &Kernel,
    padding: &dyn PadStrategy,
    options: &PadOptions,
) -> Result<Array1<f64>> {
    let pad = kernel.half_width();
    let padded = padding.pad(lane, pad, options)?;
    let conv = convolve_same(padded.view(), kernel.view());

    if pad == 0 {
        return Ok(conv);
    }
    let end = conv.len() - pad;
    Ok(conv.slice_move(ndarray::s![pad..end]))
}

/// Convolve every lane of `signal` along `axis` with `kernel`.
///
/// `axis` may be negative to count from the last axis. The output has the same
/// shape as the input for any kernel length and padding strategy.
pub fn convolve<D: Dimension>(
    signal: ArrayView<'_, f64, D>,
    kernel: &Kernel,
    padding: &dyn PadStrategy,
    axis: isize,
    options: &PadOptions,
) -> Result<Array<f64, D>> {
    let axis = resolve_axis(axis, signal.ndim())?;
    if signal.len_of(axis) == 0 {
        return Err(EcgError::InvalidArgument(format!(
            "cannot convolve along empty axis {}",
            axis.index()
        )));
    }

    log::debug!(
        "Convolving shape {:?} along axis {} with kernel of length {}",
        signal.shape(),
        axis.index(),
        kernel.len()
    );

    let mut output = Array::zeros(signal.raw_dim());
    for (mut out_lane, lane) in output.lanes_mut(axis).into_iter().zip(signal.lanes(axis)) {
        let conv = convolve_lane(lane, kernel, padding, options)?;
        out_lane.assign(&conv);
    }

    Ok(output)
}
