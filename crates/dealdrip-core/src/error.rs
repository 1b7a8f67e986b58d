//! Error types for the dealdrip-core library.
//!
//! Price extraction itself never fails: noisy input simply produces no
//! value. These errors cover building rules and bounds from user input and
//! loading configuration.

use thiserror::Error;

/// Main error type for the dealdrip library.
#[derive(Error, Debug)]
pub enum DealdripError {
    /// Pattern rule construction error.
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// Invalid price bounds.
    #[error("bounds error: {0}")]
    Bounds(#[from] BoundsError),

    /// Configuration (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while building a pattern rule.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The rule key (symbol, code, JSON key, attribute name) is empty.
    #[error("empty {0} in pattern rule")]
    EmptyKey(&'static str),

    /// A context rule was given no keywords.
    #[error("context rule needs at least one keyword")]
    NoKeywords,

    /// The generated expression did not compile.
    #[error("invalid pattern for {key:?}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while constructing a [`PriceBounds`](crate::price::PriceBounds).
#[derive(Error, Debug, PartialEq)]
pub enum BoundsError {
    /// A bound is NaN or infinite.
    #[error("bounds must be finite numbers")]
    NotFinite,

    /// A bound is below zero.
    #[error("bounds must not be negative (got {0})")]
    Negative(f64),

    /// The lower bound exceeds the upper bound.
    #[error("lower bound {low} is greater than upper bound {high}")]
    Inverted { low: f64, high: f64 },
}

/// Result type for the dealdrip library.
pub type Result<T> = std::result::Result<T, DealdripError>;
