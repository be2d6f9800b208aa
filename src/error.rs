//! Error types.
//!
//! - `DistributionError` is the calculator's own taxonomy. Its two kinds need
//!   different remediation (fix the mass field vs. add measurements), so they
//!   are never merged.
//! - `AppError` is the process-level error carried up to `main`, with the exit
//!   code the binary should return.

use thiserror::Error;

/// Failure of a single analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// Initial mass missing/non-numeric/non-positive, or otherwise malformed input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Not enough distinct, positive diameters for the chosen interpolation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl DistributionError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DistributionError> for AppError {
    fn from(err: DistributionError) -> Self {
        let exit_code = match err {
            DistributionError::InvalidInput(_) => 2,
            DistributionError::InsufficientData(_) => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_errors_map_to_distinct_exit_codes() {
        let invalid: AppError = DistributionError::invalid("mass").into();
        let short: AppError = DistributionError::insufficient("points").into();
        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(short.exit_code(), 3);
        assert_eq!(invalid.to_string(), "Invalid input: mass");
    }
}
