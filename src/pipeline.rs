//! Annotation pipeline steps
//!
//! Each step receives an [`EcgRecord`] (signal, annotations, metadata, index),
//! reads the signal or a named layer and writes its result back into the
//! record's annotations. Metadata and index are carried along untouched.

use ndarray::{concatenate, Array2, Array3, ArrayView2, Axis};
use serde_json::{Map, Value};

use crate::annotations::{conv_key, gradient_key, Annotations, Layer, HMM_PREDICT_KEY};
use crate::convolution::{convolve_same, Kernel};
use crate::error::{BoxError, EcgError, Result};
use crate::types::{Signal, CHANNEL_AXIS, TIME_AXIS};

/// A signal together with everything the pipeline derives from it
#[derive(Debug, Clone)]
pub struct EcgRecord {
    /// Raw signal [channels × samples]
    pub signal: Signal,
    pub annotations: Annotations,
    /// Record metadata supplied by the loader, passed through as-is
    pub meta: Map<String, Value>,
    /// Record identifier within its batch
    pub index: String,
}

impl EcgRecord {
    pub fn new(index: impl Into<String>, signal: Signal) -> Self {
        Self {
            signal,
            annotations: Annotations::new(),
            meta: Map::new(),
            index: index.into(),
        }
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }

    pub fn n_channels(&self) -> usize {
        self.signal.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.signal.ncols()
    }

    /// Borrow the raw signal or a named annotation layer.
    pub fn layer(&self, layer: &Layer) -> Result<ArrayView2<'_, f64>> {
        match layer {
            Layer::Signal => Ok(self.signal.view()),
            Layer::Annotation(name) => self
                .annotations
                .view(name)
                .ok_or_else(|| EcgError::MissingLayer(name.clone())),
        }
    }
}

/// External classifier producing one label per time step.
///
/// Implementations receive observations laid out as [samples × channels].
pub trait SequenceModel {
    fn predict(&self, observations: ArrayView2<'_, f64>) -> std::result::Result<Vec<usize>, BoxError>;
}

impl<F> SequenceModel for F
where
    F: Fn(ArrayView2<'_, f64>) -> std::result::Result<Vec<usize>, BoxError>,
{
    fn predict(&self, observations: ArrayView2<'_, f64>) -> std::result::Result<Vec<usize>, BoxError> {
        self(observations)
    }
}

/// First derivative along the sample axis using central differences in the
/// interior and one-sided differences at both ends.
pub fn time_gradient(data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let n = data.len_of(TIME_AXIS);
    if n < 2 {
        return Err(EcgError::InvalidArgument(format!(
            "gradient requires at least 2 samples, got {}",
            n
        )));
    }

    Ok(Array2::from_shape_fn(data.raw_dim(), |(ch, t)| {
        if t == 0 {
            data[[ch, 1]] - data[[ch, 0]]
        } else if t == n - 1 {
            data[[ch, n - 1]] - data[[ch, n - 2]]
        } else {
            (data[[ch, t + 1]] - data[[ch, t - 1]]) / 2.0
        }
    }))
}

/// Apply [`time_gradient`] `order` times.
pub fn nth_time_gradient(data: ArrayView2<'_, f64>, order: usize) -> Result<Array2<f64>> {
    if order == 0 {
        return Err(EcgError::InvalidArgument(
            "gradient order must be positive".to_string(),
        ));
    }

    let mut grad = time_gradient(data)?;
    for _ in 1..order {
        grad = time_gradient(grad.view())?;
    }
    Ok(grad)
}

/// Compute the `order`-th derivative of the signal and store it as `grad_<order>`.
pub fn gradient(record: &mut EcgRecord, order: usize) -> Result<()> {
    let grad = nth_time_gradient(record.signal.view(), order)?;
    record.annotations.insert(gradient_key(order), grad);
    Ok(())
}

/// Square a layer elementwise, convolve every channel with `kernel` and store
/// the result as `<layer>_conv`.
pub fn layer_convolve(record: &mut EcgRecord, layer: &Layer, kernel: &Kernel) -> Result<()> {
    let data = record.layer(layer)?;
    let n_samples = data.len_of(TIME_AXIS);
    if kernel.len() > n_samples {
        return Err(EcgError::InvalidArgument(format!(
            "kernel length ({}) exceeds layer '{}' length ({})",
            kernel.len(),
            layer.name(),
            n_samples
        )));
    }

    let squared = data.mapv(|x| x * x);
    let mut result = Array2::zeros(squared.raw_dim());
    for (mut out_row, row) in result.rows_mut().into_iter().zip(squared.rows()) {
        out_row.assign(&convolve_same(row, kernel.view()));
    }

    record.annotations.insert(conv_key(layer.name()), result);
    Ok(())
}

/// Stack the selected layers along the channel axis into a single-item batch
/// of shape [1 × total_channels × samples].
pub fn merge_layers(record: &EcgRecord, layers: &[Layer]) -> Result<Array3<f64>> {
    if layers.is_empty() {
        return Err(EcgError::InvalidArgument(
            "at least one layer is required to merge".to_string(),
        ));
    }

    let views = layers
        .iter()
        .map(|layer| record.layer(layer))
        .collect::<Result<Vec<_>>>()?;

    let n_samples = views[0].len_of(TIME_AXIS);
    if let Some((layer, view)) = layers
        .iter()
        .zip(&views)
        .find(|(_, view)| view.len_of(TIME_AXIS) != n_samples)
    {
        return Err(EcgError::ShapeMismatch(format!(
            "layer '{}' has {} samples, expected {}",
            layer.name(),
            view.len_of(TIME_AXIS),
            n_samples
        )));
    }

    let merged = concatenate(CHANNEL_AXIS, &views)
        .map_err(|e| EcgError::ShapeMismatch(e.to_string()))?;
    Ok(merged.insert_axis(Axis(0)))
}

/// Run `model` on the time-major signal and store its labels as a single row
/// under `hmm_predict`. Model failures are returned unchanged.
pub fn hmm_predict<M: SequenceModel + ?Sized>(record: &mut EcgRecord, model: &M) -> Result<()> {
    let labels = model.predict(record.signal.t()).map_err(EcgError::Model)?;
    let row = Array2::from_shape_fn((1, labels.len()), |(_, i)| labels[i] as f64);

    record.annotations.insert(HMM_PREDICT_KEY, row);
    Ok(())
}
