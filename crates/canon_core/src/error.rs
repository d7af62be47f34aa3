use thiserror::Error;

/// Errors raised before any stepping takes place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("unknown integration method: {0:?}")]
    UnknownMethod(String),

    #[error("dimension mismatch: {what} has length {actual}, system dimension is {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("system has zero dimension")]
    ZeroDimension,

    #[error("step size must be finite")]
    InvalidStepSize,

    #[error("initial time must be finite")]
    InvalidInitialTime,

    #[error("malformed trajectory: {0}")]
    MalformedTrajectory(String),
}
