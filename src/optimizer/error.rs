//! Error types for the image optimizer.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptimizeError {
    /// The asset root is gone; the only failure that stops a run.
    #[error("Asset directory not found: {0}")]
    MissingRoot(PathBuf),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type OptimizeResult<T> = Result<T, OptimizeError>;

impl OptimizeError {
    pub fn decode<T: Into<String>>(msg: T) -> Self { Self::Decode(msg.into()) }
    pub fn encode<T: Into<String>>(msg: T) -> Self { Self::Encode(msg.into()) }
    pub fn format<T: Into<String>>(msg: T) -> Self { Self::Format(msg.into()) }
    pub fn processing<T: Into<String>>(msg: T) -> Self { Self::Processing(msg.into()) }
}

impl From<io::Error> for OptimizeError {
    fn from(err: io::Error) -> Self { Self::Io(err.to_string()) }
}
