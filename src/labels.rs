use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{EcgError, Result};

/// Index of the largest value in `row`, first occurrence on ties.
///
/// A NaN compares greater than everything, so the first NaN wins.
pub fn argmax(row: ArrayView1<'_, f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &value) in row.iter().enumerate() {
        if value.is_nan() {
            return Some(i);
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// One-hot encode the position of the maximum of every row.
pub fn argmax_labels(predictions: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let mut labels = Array2::zeros(predictions.raw_dim());
    for (i, row) in predictions.rows().into_iter().enumerate() {
        let pos = argmax(row).ok_or_else(|| {
            EcgError::InvalidArgument("cannot take arg-max of an empty row".to_string())
        })?;
        labels[[i, pos]] = 1.0;
    }
    Ok(labels)
}
