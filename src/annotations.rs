//! Named layers attached to a signal
//!
//! Pipeline steps write their results into an [`Annotations`] store under a
//! fixed key schema:
//!
//! | Key | Written by |
//! |---|---|
//! | `grad_<order>` | [`crate::pipeline::gradient`] |
//! | `<layer>_conv` | [`crate::pipeline::layer_convolve`] |
//! | `hmm_predict` | [`crate::pipeline::hmm_predict`] |

use ndarray::{Array2, ArrayView2};
use std::collections::BTreeMap;

/// Name that selects the raw signal instead of an annotation layer
pub const SIGNAL_LAYER: &str = "signal";

/// Key of the sequence model output
pub const HMM_PREDICT_KEY: &str = "hmm_predict";

pub fn gradient_key(order: usize) -> String {
    format!("grad_{}", order)
}

pub fn conv_key(layer: &str) -> String {
    format!("{}_conv", layer)
}

/// Source of data for a pipeline step: the raw signal or a named annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    Signal,
    Annotation(String),
}

impl Layer {
    pub fn from_name(name: &str) -> Self {
        if name == SIGNAL_LAYER {
            Self::Signal
        } else {
            Self::Annotation(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Signal => SIGNAL_LAYER,
            Self::Annotation(name) => name,
        }
    }
}

impl From<&str> for Layer {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// String-keyed store of 2-D layers derived from a signal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    layers: BTreeMap<String, Array2<f64>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous layer with that key.
    pub fn insert(&mut self, key: impl Into<String>, value: Array2<f64>) {
        let key = key.into();
        log::debug!("Storing annotation '{}' with shape {:?}", key, value.dim());
        self.layers.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Array2<f64>> {
        self.layers.get(key)
    }

    pub fn view(&self, key: &str) -> Option<ArrayView2<'_, f64>> {
        self.layers.get(key).map(|layer| layer.view())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.layers.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array2<f64>)> {
        self.layers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
