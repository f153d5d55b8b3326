use thiserror::Error;

/// Error returned by an external collaborator such as a sequence model.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum EcgError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Layer not found: {0}")]
    MissingLayer(String),

    #[error(transparent)]
    Model(BoxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EcgError>;
