use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JumpsafeError {
    #[error("Could not load video {path}: {reason}")]
    VideoLoad { path: PathBuf, reason: String },

    #[error("No video track found in {path}")]
    NoVideoTrack { path: PathBuf },

    #[error("Frame extraction failed at {timestamp_secs:.3}s: {reason}")]
    FrameExtraction { timestamp_secs: f64, reason: String },

    #[error("Invalid server URL {url}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON encode error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, JumpsafeError>;
