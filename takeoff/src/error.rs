//! Error types shared across the crate.

use thiserror::Error as ThisError;

/// Failures surfaced by the takeoff core.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Calibration inputs must both be positive and finite.
    #[error("invalid calibration: pixel distance {pixel} and real distance {real} must both be positive")]
    InvalidCalibration { pixel: f64, real: f64 },
    /// A shape was built from fewer points than its type requires.
    #[error("invalid {kind} shape: expected at least {expected} points, got {got}")]
    InvalidShape {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    /// Flat coordinate lists must hold complete x/y pairs.
    #[error("flat coordinate list has odd length {0}")]
    OddCoordinateList(usize),
    /// No measurement with the requested id exists.
    #[error("measurement {0} not found")]
    NotFound(u64),
    /// Underlying persistence failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
