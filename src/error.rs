//! Crate-wide error type.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by scenario construction, stepping, and export.
#[derive(Debug, Error)]
pub enum SimError {
    /// The scenario failed validation; every violated constraint is listed.
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    /// A per-step input fell outside its physical domain.
    #[error("input out of range: {field} = {value}")]
    InputOutOfRange {
        /// Name of the offending input field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn join_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
