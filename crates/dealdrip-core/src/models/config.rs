//! Configuration structures for price extraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{DealdripError, Result};
use crate::price::{
    PatternRule, PriceBounds, PriceExtractor, RuleSet, SelectionPolicy, DEFAULT_RULES,
};

/// Main configuration for dealdrip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealdripConfig {
    /// Price extraction configuration.
    pub extraction: ExtractionConfig,

    /// Additions to the default rule table.
    pub rules: RulesConfig,

    /// Report output configuration.
    pub output: OutputConfig,
}

/// Price extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lowest plausible price for the catalog.
    pub bound_low: f64,

    /// Highest plausible price for the catalog.
    pub bound_high: f64,

    /// How one price is chosen among the candidates.
    pub policy: SelectionPolicy,

    /// Look for JSON-LD structured data before running the rules.
    pub use_structured_data: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            bound_low: PriceBounds::RETAIL.low,
            bound_high: PriceBounds::RETAIL.high,
            policy: SelectionPolicy::FirstMatch,
            use_structured_data: true,
        }
    }
}

/// Extra rules, each inserted next to the default rules of its category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub extra_json_keys: Vec<String>,
    pub extra_attributes: Vec<String>,
    pub extra_currency_codes: Vec<String>,
}

/// Report output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format used when none is given on the command line.
    pub format: OutputFormat,
}

/// Format of an extraction report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output
    #[default]
    Json,
    /// CSV output, one row per candidate
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Json, Self::Csv, Self::Text];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "text",
        }
    }

    /// File extension for reports written to disk.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown output format {:?} (expected one of: json, csv, text)", s))
    }
}

impl DealdripConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Configured bound, validated.
    pub fn bounds(&self) -> Result<PriceBounds> {
        Ok(PriceBounds::new(
            self.extraction.bound_low,
            self.extraction.bound_high,
        )?)
    }

    /// Default rules plus the configured extras.
    pub fn rule_set(&self) -> Result<RuleSet> {
        let mut rules = DEFAULT_RULES.clone();

        for code in &self.rules.extra_currency_codes {
            rules.insert(PatternRule::currency_code(code)?);
        }
        for key in &self.rules.extra_json_keys {
            rules.insert(PatternRule::json_key(key)?);
        }
        for name in &self.rules.extra_attributes {
            rules.insert(PatternRule::attribute(name)?);
        }

        Ok(rules)
    }

    /// Build an extractor from this configuration.
    pub fn extractor(&self) -> Result<PriceExtractor> {
        Ok(PriceExtractor::new()
            .with_rules(self.rule_set()?)
            .with_bounds(self.bounds()?))
    }

    /// Check the configuration without building anything long-lived.
    pub fn validate(&self) -> Result<()> {
        self.extractor().map(|_| ()).map_err(|e| match e {
            DealdripError::Bounds(b) => DealdripError::Config(format!("extraction bounds: {}", b)),
            DealdripError::Rule(r) => DealdripError::Config(format!("rules: {}", r)),
            other => other,
        })
    }
}
