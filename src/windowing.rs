//! Signal windowing
//!
//! Cuts a [channels × samples] signal into fixed-length windows, either at a
//! fixed stride or at random offsets. Windows may overlap, so every segment is
//! copied into a freshly allocated [segments × channels × length] batch.

use ndarray::{s, Array3, ArrayView2};
use rand::Rng;

use crate::error::{EcgError, Result};
use crate::types::SegmentBatch;

/// Segment a signal along the sample axis with the given window length and step.
///
/// Produces `(n_samples - length) / step + 1` segments, segment `i` covering
/// samples `[i * step, i * step + length)`.
pub fn segment<T: Clone>(signal: ArrayView2<'_, T>, length: usize, step: usize) -> Result<SegmentBatch<T>> {
    if length == 0 {
        return Err(EcgError::InvalidArgument(
            "segment length must be positive".to_string(),
        ));
    }
    if step == 0 {
        return Err(EcgError::InvalidArgument(
            "segment step must be positive".to_string(),
        ));
    }

    let (n_channels, n_samples) = signal.dim();
    if n_samples < length {
        return Err(EcgError::InvalidArgument(format!(
            "segment length ({}) exceeds signal length ({})",
            length, n_samples
        )));
    }

    let offsets = segment_offsets(n_samples, length, step);
    let n_segments = offsets.len();
    log::debug!(
        "Segmenting {}x{} signal into {} windows (length {}, step {})",
        n_channels,
        n_samples,
        n_segments,
        length,
        step
    );

    Ok(gather_windows(signal, length, &offsets))
}

/// Segment a signal `n_segments` times at uniformly random start offsets.
///
/// Each offset is drawn independently from `[0, n_samples - length]` using the
/// supplied random source, so callers seed it for reproducible output.
pub fn random_segment<T, R>(
    signal: ArrayView2<'_, T>,
    length: usize,
    n_segments: usize,
    rng: &mut R,
) -> Result<SegmentBatch<T>>
where
    T: Clone,
    R: Rng,
{
    if length == 0 {
        return Err(EcgError::InvalidArgument(
            "segment length must be positive".to_string(),
        ));
    }
    if n_segments == 0 {
        return Err(EcgError::InvalidArgument(
            "number of segments must be positive".to_string(),
        ));
    }

    let n_samples = signal.ncols();
    if n_samples < length {
        return Err(EcgError::OutOfRange(format!(
            "segment length ({}) exceeds signal length ({})",
            length, n_samples
        )));
    }

    let max_offset = n_samples - length;
    let offsets: Vec<usize> = (0..n_segments)
        .map(|_| rng.random_range(0..=max_offset))
        .collect();

    log::debug!(
        "Drew {} random windows of length {} from {} samples",
        n_segments,
        length,
        n_samples
    );

    Ok(gather_windows(signal, length, &offsets))
}

fn gather_windows<T: Clone>(signal: ArrayView2<'_, T>, length: usize, offsets: &[usize]) -> Array3<T> {
    let n_channels = signal.nrows();
    Array3::from_shape_fn((offsets.len(), n_channels, length), |(i, ch, t)| {
        signal[[ch, offsets[i] + t]].clone()
    })
}

/// Start offset of every window [`segment`] would produce.
pub fn segment_offsets(n_samples: usize, length: usize, step: usize) -> Vec<usize> {
    if length == 0 || step == 0 || n_samples < length {
        return Vec::new();
    }
    (0..=(n_samples - length) / step).map(|i| i * step).collect()
}

/// Locate the offset at which `window` appears in `signal`, if any.
pub fn find_window<T: PartialEq>(signal: ArrayView2<'_, T>, window: ArrayView2<'_, T>) -> Option<usize> {
    let length = window.ncols();
    if window.nrows() != signal.nrows() || length > signal.ncols() {
        return None;
    }
    (0..=signal.ncols() - length).find(|&offset| signal.slice(s![.., offset..offset + length]) == window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Axis};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ramp(n_channels: usize, n_samples: usize) -> Array2<f64> {
        Array2::from_shape_fn((n_channels, n_samples), |(ch, t)| (ch * 1000 + t) as f64)
    }

    #[test]
    fn test_segment_count_and_contents() {
        let signal = ramp(2, 10);
        let batch = segment(signal.view(), 4, 3).unwrap();

        // (10 - 4) / 3 + 1 = 3
        assert_eq!(batch.dim(), (3, 2, 4));
        for (i, window) in batch.axis_iter(Axis(0)).enumerate() {
            assert_eq!(window, signal.slice(s![.., i * 3..i * 3 + 4]));
        }
    }

    #[test]
    fn test_segment_exact_fit() {
        let signal = ramp(1, 5);
        let batch = segment(signal.view(), 5, 2).unwrap();
        assert_eq!(batch.dim(), (1, 1, 5));
        assert_eq!(batch.index_axis(Axis(0), 0), signal);
    }

    #[test]
    fn test_segment_preserves_element_type() {
        let signal = array![[1i32, 2, 3, 4], [5, 6, 7, 8]];
        let batch: Array3<i32> = segment(signal.view(), 2, 2).unwrap();
        assert_eq!(batch, array![[[1, 2], [5, 6]], [[3, 4], [7, 8]]]);
    }

    #[test]
    fn test_segment_invalid_arguments() {
        let signal = ramp(1, 5);
        assert!(matches!(
            segment(signal.view(), 0, 1),
            Err(EcgError::InvalidArgument(_))
        ));
        assert!(matches!(
            segment(signal.view(), 2, 0),
            Err(EcgError::InvalidArgument(_))
        ));
        assert!(matches!(
            segment(signal.view(), 6, 1),
            Err(EcgError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_random_segment_windows_are_contiguous() {
        let signal = ramp(3, 50);
        let mut rng = StdRng::seed_from_u64(7);
        let batch = random_segment(signal.view(), 8, 20, &mut rng).unwrap();

        assert_eq!(batch.dim(), (20, 3, 8));
        for window in batch.axis_iter(Axis(0)) {
            let offset = find_window(signal.view(), window).expect("window not found in signal");
            assert!(offset <= 50 - 8);
        }
    }

    #[test]
    fn test_random_segment_is_reproducible_with_seed() {
        let signal = ramp(2, 100);
        let a = random_segment(signal.view(), 10, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = random_segment(signal.view(), 10, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_segment_full_length_window() {
        let signal = ramp(2, 6);
        let mut rng = StdRng::seed_from_u64(1);
        let batch = random_segment(signal.view(), 6, 3, &mut rng).unwrap();
        for window in batch.axis_iter(Axis(0)) {
            assert_eq!(window, signal);
        }
    }

    #[test]
    fn test_random_segment_too_long() {
        let signal = ramp(1, 5);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            random_segment(signal.view(), 6, 1, &mut rng),
            Err(EcgError::OutOfRange(_))
        ));
        assert!(matches!(
            random_segment(signal.view(), 2, 0, &mut rng),
            Err(EcgError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_segment_offsets() {
        assert_eq!(segment_offsets(10, 4, 3), vec![0, 3, 6]);
        assert!(segment_offsets(3, 4, 1).is_empty());
    }
}
