use ecg_batch::Signal;
use ndarray::{Array2, ArrayD};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum SignalFile {
    Record {
        signal: Vec<Vec<f64>>,
        #[serde(default)]
        sampling_rate: Option<f64>,
    },
    Bare(Vec<Vec<f64>>),
}

/// Signal read from disk, with the sampling rate if the file declares one
pub struct LoadedSignal {
    pub signal: Signal,
    pub sampling_rate: Option<f64>,
}

pub fn load_signal(path: &str) -> Result<LoadedSignal, String> {
    if !Path::new(path).exists() {
        return Err(format!("File not found: {}", path));
    }
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    parse_signal(&content).map_err(|e| format!("Invalid signal file '{}': {}", path, e))
}

pub fn parse_signal(content: &str) -> Result<LoadedSignal, String> {
    let file: SignalFile = serde_json::from_str(content)
        .map_err(|e| format!("expected a [channels x samples] array: {}", e))?;

    let (rows, sampling_rate) = match file {
        SignalFile::Record {
            signal,
            sampling_rate,
        } => (signal, sampling_rate),
        SignalFile::Bare(rows) => (rows, None),
    };

    Ok(LoadedSignal {
        signal: rows_to_signal(rows)?,
        sampling_rate,
    })
}

fn rows_to_signal(rows: Vec<Vec<f64>>) -> Result<Signal, String> {
    let n_channels = rows.len();
    let n_samples = rows.first().map_or(0, Vec::len);
    if n_channels == 0 || n_samples == 0 {
        return Err("signal has no samples".to_string());
    }
    if let Some((ch, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n_samples) {
        return Err(format!(
            "channel {} has {} samples, expected {}",
            ch,
            row.len(),
            n_samples
        ));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_channels, n_samples), flat).map_err(|e| e.to_string())
}

/// Row-major array with its shape, as written by `run`
#[derive(Serialize)]
pub struct ArrayOutput {
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl From<&ArrayD<f64>> for ArrayOutput {
    fn from(array: &ArrayD<f64>) -> Self {
        Self {
            shape: array.shape().to_vec(),
            data: array.iter().copied().collect(),
        }
    }
}
