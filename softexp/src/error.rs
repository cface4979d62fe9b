//! Error types for fit constants and input sweeps.

use thiserror::Error;

/// Errors raised while validating configuration. Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Fit constant `{name}` must be finite, got {value}")]
    NonFiniteConstant { name: &'static str, value: f64 },

    #[error("Fit constant `ln2` must be positive, got {0}")]
    NonPositiveLn2(f64),

    #[error("Invalid sweep [{start}, {end}) step {step}: {reason}")]
    InvalidSweep {
        start: f64,
        end: f64,
        step: f64,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
