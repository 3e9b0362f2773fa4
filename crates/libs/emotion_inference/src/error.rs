use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("camera device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    InferenceFailed(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),
}

pub type Result<T> = std::result::Result<T, InferenceError>;

impl From<ort::Error> for InferenceError {
    fn from(err: ort::Error) -> Self {
        Self::InferenceFailed(err.to_string())
    }
}
