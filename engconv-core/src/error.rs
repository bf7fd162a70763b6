//! Structured conversion errors
//!
//! Every failure is detected before any arithmetic happens. Errors carry
//! enough context (the offending name and the valid alternatives) for a
//! front-end to show an actionable message.

use serde::Serialize;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, ConvError>;

/// Error type for registry lookups and conversions
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvError {
    /// Category name is not registered
    #[error("Unknown category: '{category}'")]
    UnknownCategory {
        category: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        valid: Vec<String>,
    },

    /// Unit is not a member of the given category
    #[error("Unknown unit '{unit}' for category '{category}'")]
    UnknownUnit {
        category: String,
        unit: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        valid: Vec<String>,
    },

    /// Value is not acceptable for the category
    #[error("Invalid input {value} for category '{category}': {reason}")]
    InvalidInput {
        category: String,
        value: f64,
        reason: String,
    },

    /// Broken invariant in the built-in unit table
    #[error("Internal error: {details}")]
    Internal { details: String },
}

impl ConvError {
    // ========== Constructors ==========

    pub fn unknown_category(category: impl Into<String>) -> Self {
        ConvError::UnknownCategory { category: category.into(), valid: Vec::new() }
    }

    pub fn unknown_unit(category: impl Into<String>, unit: impl Into<String>) -> Self {
        ConvError::UnknownUnit { category: category.into(), unit: unit.into(), valid: Vec::new() }
    }

    pub fn negative_not_allowed(category: impl Into<String>, value: f64) -> Self {
        ConvError::InvalidInput {
            category: category.into(),
            value,
            reason: "negative values are not allowed".to_string(),
        }
    }

    pub fn not_finite(category: impl Into<String>, value: f64) -> Self {
        ConvError::InvalidInput {
            category: category.into(),
            value,
            reason: "value must be a finite number".to_string(),
        }
    }

    pub fn internal(details: impl Into<String>) -> Self {
        ConvError::Internal { details: details.into() }
    }

    /// Builder: attach the list of valid names for lookup failures
    pub fn with_valid<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match &mut self {
            ConvError::UnknownCategory { valid, .. } | ConvError::UnknownUnit { valid, .. } => {
                *valid = names.into_iter().map(Into::into).collect();
            }
            _ => {}
        }
        self
    }

    // ========== Inspection ==========

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConvError::UnknownCategory { .. } => codes::UNKNOWN_CATEGORY,
            ConvError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            ConvError::InvalidInput { .. } => codes::INVALID_INPUT,
            ConvError::Internal { .. } => codes::INTERNAL,
        }
    }

    /// Hint for fixing the request, if there is one
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ConvError::UnknownCategory { valid, .. } if !valid.is_empty() => {
                Some(format!("Valid categories: {}", valid.join(", ")))
            }
            ConvError::UnknownUnit { valid, .. } if !valid.is_empty() => {
                Some(format!("Valid units: {}", valid.join(", ")))
            }
            ConvError::InvalidInput { value, .. } if value.is_finite() && *value < 0.0 => {
                Some("Use a value greater than or equal to zero".to_string())
            }
            _ => None,
        }
    }

    /// Flatten into a report suitable for display or serialization
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            suggestion: self.suggestion(),
        }
    }
}

/// Flat error payload for front-ends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}
