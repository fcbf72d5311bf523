//! Core types shared by the ray engine
//!
//! Complex path coefficients, physical constants and the error type used by
//! every fallible engine operation.
//!
//! ## Path Coefficients
//!
//! A propagated ray is summarised by a complex coefficient that carries both
//! the amplitude decay and the carrier phase at a given path length:
//!
//! ```text
//!   h(d) = alpha / d * exp(-j * 2*pi * f * d / c)
//!
//!   alpha : product of wall reflection coefficients along the path
//!   d     : unfolded path length from the transmitter
//! ```
//!
//! Received power follows as `Pref * |h|^2`, so coefficients from several
//! rays can be summed before squaring to model multipath interference.

use num_complex::Complex64;

use crate::geometry::{Point, Vector};

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// Propagation speed used for wavelength and phase computations (m/s)
pub const SPEED_OF_LIGHT: f64 = 3.0e8;

/// Result type for ray engine operations
pub type RayResult<T> = Result<T, RayError>;

/// Errors that can occur while building scenes or tracing rays
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RayError {
    /// Wall built from two identical endpoints; its normal is undefined
    #[error("Wall endpoints coincide at ({0}, {1})")]
    DegenerateWall(f64, f64),

    /// Ray constructed from a zero-length direction vector
    #[error("Ray direction must be a non-zero vector")]
    ZeroDirection,

    /// Transmitter frequency is not a positive finite number
    #[error("Invalid frequency: {0} Hz. Must be positive")]
    InvalidFrequency(f64),

    /// Transmitter power is negative or not finite
    #[error("Invalid transmit power: {0} W. Must be non-negative")]
    InvalidPower(f64),

    /// Free propagation found no boundary edge ahead of the ray, which
    /// happens only for rays starting on or outside the boundary
    #[error(
        "No scene boundary found from ({}, {}) towards ({}, {})",
        origin.x, origin.y, direction.x, direction.y
    )]
    BoundaryExhausted { origin: Point, direction: Vector },

    /// Multi-ray sum over rays whose transmitters differ in power or frequency
    #[error("Rays summed at one point must share transmitter power and frequency")]
    MixedTransmitters,

    /// Wall references a material name missing from the registry
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
}
