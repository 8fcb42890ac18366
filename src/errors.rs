/*!
 * Error types for the datxlate application.
 *
 * This module contains custom error types for the different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Keywords that mark a backend failure as network-related and worth retrying
const NETWORK_KEYWORDS: &[&str] = &[
    "network",
    "connection",
    "timeout",
    "timed out",
    "ssl",
    "tls",
    "handshake",
    "interrupt",
];

/// Errors that can occur when calling a translation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Error when making a request fails
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a backend response fails
    #[error("Failed to parse backend response: {0}")]
    ParseError(String),

    /// Error returned by the backend itself
    #[error("Backend responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the backend
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete in time
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The request was interrupted before a response arrived
    #[error("Request interrupted: {0}")]
    Interrupted(String),
}

impl BackendError {
    /// Whether this failure looks transient, judged from its description.
    ///
    /// Classification is purely textual so that errors bubbling up from any
    /// backend (including wrapped transport errors) are treated the same way.
    pub fn is_network_related(&self) -> bool {
        let description = self.to_string().to_lowercase();
        NETWORK_KEYWORDS
            .iter()
            .any(|keyword| description.contains(keyword))
    }
}

/// Errors that can occur while reading or writing data files
#[derive(Error, Debug)]
pub enum FileError {
    /// No supported encoding could decode the file
    #[error("Unable to decode {path:?} with any of: {tried}")]
    Unreadable {
        /// File that failed to decode
        path: PathBuf,
        /// Encodings that were attempted, comma separated
        tried: String,
    },

    /// Underlying I/O failure
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Source error
        #[source]
        source: std::io::Error,
    },

    /// An update referenced a line the file does not have
    #[error("Line {line_num} is out of range (file has {line_count} lines)")]
    LineOutOfRange {
        /// Offending zero-based line index
        line_num: usize,
        /// Number of lines in the file
        line_count: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Error from a translation backend
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Discovery found nothing to process
    #[error("No matching input files found in {0:?}")]
    NoInputFiles(PathBuf),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
