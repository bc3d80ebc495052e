//! Error types for docgate-core

use thiserror::Error;

use crate::engine::Denial;

/// Errors decoding docgate records
#[derive(Error, Debug)]
pub enum DocgateError {
    #[error("Invalid principal record: {0}")]
    Principal(#[from] serde_json::Error),
}

/// Errors raised when parsing taxonomy values from their string form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown subscription tier: {0}")]
    UnknownTier(String),

    #[error("unknown permission: {0}")]
    UnknownPermission(String),

    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("unknown limit: {0}")]
    UnknownLimit(String),
}

/// Errors related to named access rules and policy files
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("clock_skew_seconds {seconds} exceeds the maximum of {max}")]
    ClockSkewTooLarge { seconds: u64, max: u64 },

    #[error("No access rule named '{0}'")]
    UnknownRule(String),

    #[error("Rule '{rule}' denied access: {denial}")]
    Denied { rule: String, denial: Denial },
}
