use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Decoder init error: {0}")]
    DecoderInit(String),
    #[error("Camera permission denied")]
    PermissionDenied,
    #[error("Camera not supported on this platform")]
    CameraUnsupported,
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for ScanError {
    fn from(error: reqwest::Error) -> Self {
        ScanError::Http(error.to_string())
    }
}

impl Serialize for ScanError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
