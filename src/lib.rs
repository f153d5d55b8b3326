pub mod annotations;
pub mod batch;
pub mod config;
pub mod convolution;
pub mod error;
pub mod labels;
pub mod padding;
pub mod pipeline;
pub mod profiling;
pub mod resample;
pub mod spectral;
pub mod types;
pub mod windowing;

pub use annotations::{Annotations, Layer};
pub use batch::EcgBatch;
pub use config::{PipelineConfig, StepConfig};
pub use convolution::{convolve, Kernel};
pub use error::{BoxError, EcgError, Result};
pub use labels::argmax_labels;
pub use padding::{PadOptions, PadStrategy, PaddingMode};
pub use pipeline::{gradient, hmm_predict, layer_convolve, merge_layers, EcgRecord, SequenceModel};
pub use resample::resample;
pub use spectral::band_pass;
pub use types::{SegmentBatch, Signal};
pub use windowing::{random_segment, segment};
