//! Core library for dealdrip price extraction.
//!
//! This crate provides:
//! - Price normalization (comma/period disambiguation, plausibility bounds)
//! - An ordered pattern rule table locating price candidates in page text
//! - Caller-side selection policies for picking one price among candidates
//! - JSON-LD structured data lookup
//! - Configuration models shared with the CLI

pub mod error;
pub mod models;
pub mod price;

pub use error::{BoundsError, DealdripError, Result, RuleError};
pub use models::config::{DealdripConfig, OutputFormat};
pub use price::{
    extract_prices, extract_structured_price, normalize_price, select_price, FieldExtractor,
    PatternRule, PriceBounds, PriceCandidate, PriceExtractor, RawCandidate, RuleCategory,
    RuleSet, SelectionPolicy,
};
