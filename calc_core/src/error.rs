//! Crate-wide error type
//!
//! Generalizes the shape of `config::ConfigError` from a single-purpose
//! TOML-loading error into the six abstract error kinds the damage-calculator
//! contract distinguishes (parse errors, missing lookups, incomplete
//! builders, domain violations, evaluation errors, and I/O failures).

use thiserror::Error;

/// Errors surfaced by `calc_core`.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed input syntax: request JSON, formula expression, or on-disk definition.
    #[error("parse error: {0}")]
    Parse(String),

    /// A requested cache entry, ability name, or stat qualifier lookup was absent.
    #[error("missing key: {0}")]
    MissingKey(String),

    /// A builder's `get_product` was called before all required fields were set.
    #[error("builder incomplete: missing {0}")]
    BuilderIncomplete(String),

    /// A value violates a domain invariant (slot/main-stat mismatch, duplicate stat, etc).
    #[error("domain violation: {0}")]
    DomainViolation(String),

    /// A relative stat was evaluated without a bound lookup grid, or RPN evaluation
    /// left a stack of the wrong size.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The on-disk definition did not deserialize into valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
