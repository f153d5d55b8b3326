//! Boundary padding strategies used by the convolution engine.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{EcgError, Result};

/// Extra settings forwarded to a padding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadOptions {
    /// Fill values `(before, after)` used by [`PaddingMode::Constant`]
    pub constant_values: (f64, f64),
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            constant_values: (0.0, 0.0),
        }
    }
}

impl PadOptions {
    pub fn constant(value: f64) -> Self {
        Self {
            constant_values: (value, value),
        }
    }
}

/// Extends a 1-D lane by `width` samples on both sides.
///
/// The returned array has length `lane.len() + 2 * width` and holds the
/// original lane unchanged in its middle.
pub trait PadStrategy: Send + Sync {
    fn pad(&self, lane: ArrayView1<'_, f64>, width: usize, options: &PadOptions) -> Result<Array1<f64>>;
}

/// Built-in padding strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingMode {
    /// Repeat the first and last samples
    #[default]
    Edge,
    /// Fill with `PadOptions::constant_values`
    Constant,
    /// Mirror around the edge sample, excluding it: `c b | a b c | b a`
    Reflect,
    /// Mirror around the edge, including it: `b a | a b c | c b`
    Symmetric,
    /// Continue periodically: `b c | a b c | a b`
    Wrap,
}

impl FromStr for PaddingMode {
    type Err = EcgError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| EcgError::InvalidArgument(format!("unknown padding mode '{}'", s)))
    }
}

impl PaddingMode {
    pub const ALL: [Self; 5] = [
        Self::Edge,
        Self::Constant,
        Self::Reflect,
        Self::Symmetric,
        Self::Wrap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Edge => "edge",
            Self::Constant => "constant",
            Self::Reflect => "reflect",
            Self::Symmetric => "symmetric",
            Self::Wrap => "wrap",
        }
    }

    /// Map a position outside `[0, n)` back onto the lane.
    fn source_index(&self, pos: isize, n: usize) -> usize {
        let n = n as isize;
        let idx = match self {
            Self::Edge | Self::Constant => pos.clamp(0, n - 1),
            Self::Reflect => {
                if n == 1 {
                    0
                } else {
                    let period = 2 * (n - 1);
                    let m = pos.rem_euclid(period);
                    if m >= n {
                        period - m
                    } else {
                        m
                    }
                }
            }
            Self::Symmetric => {
                let period = 2 * n;
                let m = pos.rem_euclid(period);
                if m >= n {
                    period - 1 - m
                } else {
                    m
                }
            }
            Self::Wrap => pos.rem_euclid(n),
        };
        idx as usize
    }
}

impl PadStrategy for PaddingMode {
    fn pad(&self, lane: ArrayView1<'_, f64>, width: usize, options: &PadOptions) -> Result<Array1<f64>> {
        let n = lane.len();
        if width == 0 {
            return Ok(lane.to_owned());
        }

        if n == 0 {
            if *self == Self::Constant {
                let (before, after) = options.constant_values;
                return Ok(Array1::from_shape_fn(2 * width, |i| {
                    if i < width {
                        before
                    } else {
                        after
                    }
                }));
            }
            return Err(EcgError::InvalidArgument(format!(
                "cannot apply '{}' padding to an empty lane",
                self.name()
            )));
        }

        let (before, after) = options.constant_values;
        Ok(Array1::from_shape_fn(n + 2 * width, |i| {
            let pos = i as isize - width as isize;
            if pos >= 0 && (pos as usize) < n {
                lane[pos as usize]
            } else if *self == Self::Constant {
                if pos < 0 {
                    before
                } else {
                    after
                }
            } else {
                lane[self.source_index(pos, n)]
            }
        }))
    }
}
