//! Error handling

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{EXIT_CONFIG_ERROR, IMAGE_API_ENV};

/// Errors that stop a run before any image is requested.
#[derive(Debug, Error)]
pub enum StoryboardError {
    /// No API key and we're not in dry-run mode
    #[error("Missing {} in environment or {}", IMAGE_API_ENV, .0.display())]
    MissingApiKey(PathBuf),
    /// An `--only` item didn't look like `scene.shot`
    #[error("Invalid --only item '{0}'. Use scene.shot format, e.g. 5.4,5.5")]
    InvalidFilter(String),
    /// The output directory couldn't be created
    #[error("Failed to create {}: {source}", .path.display())]
    CreateOutputDir {
        /// Directory we tried to create
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// The endpoint base plus model didn't make a valid URL
    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),
    /// Writing progress output failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl StoryboardError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        EXIT_CONFIG_ERROR
    }
}

/// Errors from a single image request.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Connecting, sending or reading the body failed
    #[error("Network error: {0}")]
    Network(#[from] ureq::Error),
    /// The API answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },
    /// The success body wasn't JSON we could read
    #[error("Failed to parse API response: {source}; body: {snapshot}")]
    InvalidJson {
        /// Parser error
        source: serde_json::Error,
        /// Start of the response body
        snapshot: String,
    },
    /// No inline image part anywhere in the response
    #[error("No image payload found in API response: {0}")]
    NoImage(String),
    /// The inline data wasn't valid base64
    #[error("Failed to base64-decode image: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Why one shot didn't end up on disk.
#[derive(Debug, Error)]
pub enum ShotError {
    /// The image request failed
    #[error(transparent)]
    Image(#[from] ImageError),
    /// We got an image but couldn't save it
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// File we tried to write
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}
