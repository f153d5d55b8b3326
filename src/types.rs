use ndarray::{Array2, Array3, Axis};

use crate::error::{EcgError, Result};

/// Multi-channel signal laid out as [channels × samples]
pub type Signal = Array2<f64>;

/// Segmented signal laid out as [segments × channels × window_length]
pub type SegmentBatch<T = f64> = Array3<T>;

/// Axis of the sample dimension in a [`Signal`]
pub const TIME_AXIS: Axis = Axis(1);

/// Axis of the channel dimension in a [`Signal`]
pub const CHANNEL_AXIS: Axis = Axis(0);

/// Resolve a possibly negative axis index against an array rank.
///
/// `-1` refers to the last axis, `-ndim` to the first.
pub fn resolve_axis(axis: isize, ndim: usize) -> Result<Axis> {
    let resolved = if axis < 0 {
        ndim as isize + axis
    } else {
        axis
    };

    if resolved < 0 || resolved as usize >= ndim {
        return Err(EcgError::InvalidArgument(format!(
            "axis {} is out of bounds for array of dimension {}",
            axis, ndim
        )));
    }

    Ok(Axis(resolved as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_axis() {
        assert_eq!(resolve_axis(0, 2).unwrap(), Axis(0));
        assert_eq!(resolve_axis(-1, 2).unwrap(), Axis(1));
        assert_eq!(resolve_axis(-3, 3).unwrap(), Axis(0));
        assert!(resolve_axis(2, 2).is_err());
        assert!(resolve_axis(-3, 2).is_err());
    }
}
