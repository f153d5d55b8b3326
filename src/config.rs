//! Declarative transform pipelines
//!
//! A [`PipelineConfig`] lists the transforms to run on a signal in order. It
//! is usually loaded from JSON:
//!
//! ```json
//! {
//!   "sampling_rate": 360.0,
//!   "seed": 7,
//!   "steps": [
//!     { "op": "band_pass", "low": 0.5, "high": 40.0 },
//!     { "op": "convolve", "kernel": [0.25, 0.5, 0.25], "padding": "edge" },
//!     { "op": "segment", "length": 720, "step": 360 }
//!   ]
//! }
//! ```

use ndarray::{Array2, ArrayD, ArrayView2, Axis, Ix2, Ix3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::convolution::{convolve, Kernel};
use crate::error::{EcgError, Result};
use crate::padding::{PadOptions, PaddingMode};
use crate::pipeline::nth_time_gradient;
use crate::resample::resample;
use crate::spectral::band_pass;
use crate::windowing::{random_segment, segment};

/// A single transform in a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepConfig {
    /// Fixed-stride windows; turns a 2-D signal into a 3-D segment batch
    Segment { length: usize, step: usize },
    /// Random-offset windows; turns a 2-D signal into a 3-D segment batch
    RandomSegment { length: usize, n_segments: usize },
    /// Linear resampling of a signal, or of every segment in a batch
    Resample { new_length: usize },
    Convolve {
        kernel: Vec<f64>,
        #[serde(default)]
        padding: PaddingMode,
        #[serde(default = "default_axis")]
        axis: isize,
        #[serde(default)]
        options: PadOptions,
    },
    BandPass {
        #[serde(default)]
        low: Option<f64>,
        #[serde(default)]
        high: Option<f64>,
        #[serde(default = "default_axis")]
        axis: isize,
    },
    /// Repeated time derivative of a signal, or of every segment in a batch
    Gradient {
        #[serde(default = "default_gradient_order")]
        order: usize,
    },
}

fn default_axis() -> isize {
    -1
}
fn default_gradient_order() -> usize {
    1
}
fn default_sampling_rate() -> f64 {
    360.0
}

impl StepConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Segment { .. } => "segment",
            Self::RandomSegment { .. } => "random_segment",
            Self::Resample { .. } => "resample",
            Self::Convolve { .. } => "convolve",
            Self::BandPass { .. } => "band_pass",
            Self::Gradient { .. } => "gradient",
        }
    }

    /// Names of every supported operation with a short description.
    pub fn catalog() -> &'static [(&'static str, &'static str)] {
        &[
            ("segment", "fixed-stride windows of a [channels x samples] signal"),
            ("random_segment", "windows at random offsets of a [channels x samples] signal"),
            ("resample", "linear interpolation to a new number of samples"),
            ("convolve", "padded same-length kernel convolution along an axis"),
            ("band_pass", "FFT rejection of frequencies outside (low, high)"),
            ("gradient", "repeated central-difference time derivative"),
        ]
    }
}

/// Configuration of a transform pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sampling rate of the input signal (Hz)
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,

    /// Seed for random segmentation; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampling_rate: default_sampling_rate(),
            seed: None,
            steps: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded pipeline config from {}", path.as_ref().display());
        Self::from_json(&content)
    }

    /// Check settings that can be verified without data.
    pub fn validate(&self) -> Result<()> {
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(EcgError::InvalidArgument(format!(
                "sampling_rate must be positive, got {}",
                self.sampling_rate
            )));
        }

        for (i, step) in self.steps.iter().enumerate() {
            if let StepConfig::Convolve { kernel, .. } = step {
                if kernel.is_empty() {
                    return Err(EcgError::InvalidArgument(format!(
                        "step {} ({}): kernel must not be empty",
                        i,
                        step.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Run every step in order on `data`.
    pub fn run(&self, data: ArrayD<f64>) -> Result<ArrayD<f64>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        self.steps.iter().enumerate().try_fold(data, |data, (i, step)| {
            log::info!("Step {}: {} on shape {:?}", i, step.name(), data.shape());
            self.apply_step(data, step, &mut rng)
        })
    }

    fn apply_step(&self, data: ArrayD<f64>, step: &StepConfig, rng: &mut StdRng) -> Result<ArrayD<f64>> {
        match step {
            StepConfig::Segment { length, step: stride } => {
                let signal = as_signal(data, "segment")?;
                Ok(segment(signal.view(), *length, *stride)?.into_dyn())
            }
            StepConfig::RandomSegment { length, n_segments } => {
                let signal = as_signal(data, "random_segment")?;
                Ok(random_segment(signal.view(), *length, *n_segments, rng)?.into_dyn())
            }
            StepConfig::Resample { new_length } => {
                map_signals(data, "resample", |signal| resample(signal, *new_length))
            }
            StepConfig::Convolve {
                kernel,
                padding,
                axis,
                options,
            } => {
                let kernel = Kernel::try_from(kernel.clone())?;
                convolve(data.view(), &kernel, padding, *axis, options)
            }
            StepConfig::BandPass { low, high, axis } => {
                band_pass(data.view(), self.sampling_rate, *low, *high, *axis)
            }
            StepConfig::Gradient { order } => {
                map_signals(data, "gradient", |signal| nth_time_gradient(signal, *order))
            }
        }
    }
}

fn as_signal(data: ArrayD<f64>, op: &str) -> Result<Array2<f64>> {
    let ndim = data.ndim();
    data.into_dimensionality::<Ix2>().map_err(|_| {
        EcgError::ShapeMismatch(format!(
            "{} expects a 2-D [channels x samples] signal, got {} dimensions",
            op, ndim
        ))
    })
}

/// Apply a signal transform to a 2-D signal or to every segment of a 3-D batch.
fn map_signals<F>(data: ArrayD<f64>, op: &str, f: F) -> Result<ArrayD<f64>>
where
    F: Fn(ArrayView2<'_, f64>) -> Result<Array2<f64>>,
{
    match data.ndim() {
        2 => Ok(f(as_signal(data, op)?.view())?.into_dyn()),
        3 => {
            let batch = data
                .into_dimensionality::<Ix3>()
                .map_err(|e| EcgError::ShapeMismatch(e.to_string()))?;
            let segments = batch
                .axis_iter(Axis(0))
                .map(&f)
                .collect::<Result<Vec<_>>>()?;
            let views: Vec<_> = segments.iter().map(|s| s.view()).collect();
            let stacked = ndarray::stack(Axis(0), &views)
                .map_err(|e| EcgError::ShapeMismatch(e.to_string()))?;
            Ok(stacked.into_dyn())
        }
        n => Err(EcgError::ShapeMismatch(format!(
            "{} expects a 2-D signal or 3-D segment batch, got {} dimensions",
            op, n
        ))),
    }
}
