//! Error types for the head pose puppet library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark frame is too short for the configured topology
    #[error("Landmark {index} missing from frame of {len} landmarks")]
    MissingLandmark {
        /// Requested landmark index
        index: usize,
        /// Number of landmarks in the frame
        len: usize,
    },

    /// Landmark carries a NaN or infinite coordinate
    #[error("Landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark {
        /// Offending landmark index
        index: usize,
    },

    /// Landmark lies outside normalized image space
    #[error("Landmark {index} at ({x}, {y}) is outside normalized image space")]
    OutOfBoundsLandmark {
        /// Offending landmark index
        index: usize,
        /// Horizontal coordinate
        x: f64,
        /// Vertical coordinate
        y: f64,
    },

    /// Recorded landmark frame could not be parsed
    #[error("Frame format error on line {line}: {message}")]
    FrameFormat {
        /// 1-based line number in the recording
        line: usize,
        /// Parser or validation message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
