//! Error taxonomy for the analytics core
//!
//! Every failure is local and synchronous. Nothing here is retryable: the
//! computations run over in-memory data and either succeed or reject their
//! input outright.

use thiserror::Error;

/// Errors raised by the statistics, importance, prediction and projection layers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A statistic was requested over an empty series or table
    #[error("empty input: {context}")]
    EmptyInput { context: &'static str },

    /// Paired series have different lengths
    #[error("series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// A value lies outside its declared domain
    #[error("{field} = {value} is outside the declared range [{min}, {max}]")]
    InvalidRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A field name does not exist on a market record
    #[error("unknown feature: {name}")]
    UnknownFeature { name: String },

    /// Two records share the same country identifier
    #[error("duplicate country in dataset: {country}")]
    DuplicateCountry { country: String },
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
