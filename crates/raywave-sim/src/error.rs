//! Simulator error types

use std::io;
use thiserror::Error;

use raywave_core::RayError;

/// Result type for simulator operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while loading scenes or running queries
#[derive(Error, Debug)]
pub enum SimError {
    /// Failure reported by the ray engine
    #[error(transparent)]
    Ray(#[from] RayError),

    /// Scene file could not be read or written
    #[error("Scene file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Scene file is not valid JSON for a scene description
    #[error("Malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    /// Transmitter index outside the scene
    #[error("No transmitter at index {0}")]
    UnknownTransmitter(usize),

    /// Receiver index outside the scene
    #[error("No receiver at index {0}")]
    UnknownReceiver(usize),

    /// Wall index in a forced ordering outside the scene
    #[error("No wall at index {0}")]
    UnknownWall(usize),

    /// Scale factor must be finite and positive
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f64),
}
