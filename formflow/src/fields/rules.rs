//! Declarative validation rules.
//!
//! Rules are checked against a single field value and yield a
//! [`FieldError`] or nothing. They never panic and never touch state;
//! committing errors to the store is the caller's job.

use super::value::FieldValue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum accepted image size in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5_242_880;

/// A validation failure for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The field the error belongs to.
    pub field: String,
    /// The user-facing message rendered inline under the input.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A single validation rule.
#[derive(Clone)]
pub enum Rule {
    /// The field must have a non-missing value.
    Required {
        /// Message shown when the value is missing.
        message: String,
    },
    /// Text length must be at least this many characters.
    MinLength {
        /// Minimum length.
        min: usize,
        /// Message shown on failure.
        message: String,
    },
    /// Text length must be at most this many characters.
    MaxLength {
        /// Maximum length.
        max: usize,
        /// Message shown on failure.
        message: String,
    },
    /// Text must match the pattern. Non-text values are ignored.
    Pattern {
        /// The compiled pattern.
        regex: Arc<Regex>,
        /// Message shown on failure.
        message: String,
    },
    /// Numeric value must fall within the inclusive range.
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
        /// Message shown on failure.
        message: String,
    },
    /// Choice must be one of the declared options.
    OneOf {
        /// The allowed options.
        options: Vec<String>,
        /// Message shown on failure.
        message: String,
    },
    /// Image file size must not exceed the limit.
    MaxFileSize {
        /// Maximum size in bytes.
        max_bytes: u64,
        /// Message shown on failure.
        message: String,
    },
}

impl Rule {
    /// Creates a required rule with the conventional message.
    #[must_use]
    pub fn required(field_label: &str) -> Self {
        Self::Required {
            message: format!("{field_label} is required."),
        }
    }

    /// Creates a pattern rule.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is not a valid regular expression. Rule
    /// patterns are authored constants, so an invalid pattern is a
    /// programming error caught by the flow's own tests.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        Self::Pattern {
            regex: Arc::new(Regex::new(pattern).expect("invalid rule pattern")),
            message: message.into(),
        }
    }

    /// Creates the contact-number rule: 11 digits starting with "09".
    #[must_use]
    pub fn contact_number() -> Self {
        Self::pattern(
            r"^09\d{9}$",
            "Enter a valid contact number (11 digits starting with 09).",
        )
    }

    /// Creates an image size rule with the default 5 MiB limit.
    #[must_use]
    pub fn max_image_size() -> Self {
        Self::MaxFileSize {
            max_bytes: MAX_IMAGE_BYTES,
            message: "Image must be smaller than 5 MB.".to_string(),
        }
    }

    /// Checks the rule against a value.
    ///
    /// Rules other than `Required` pass on missing values; requiredness
    /// is its own concern.
    #[must_use]
    pub fn check(&self, field: &str, value: &FieldValue) -> Option<FieldError> {
        match self {
            Self::Required { message } => {
                value.is_missing().then(|| FieldError::new(field, message))
            }
            Self::MinLength { min, message } => value.as_str().and_then(|s| {
                (!value.is_missing() && s.chars().count() < *min)
                    .then(|| FieldError::new(field, message))
            }),
            Self::MaxLength { max, message } => value.as_str().and_then(|s| {
                (s.chars().count() > *max).then(|| FieldError::new(field, message))
            }),
            Self::Pattern { regex, message } => value.as_str().and_then(|s| {
                (!value.is_missing() && !regex.is_match(s))
                    .then(|| FieldError::new(field, message))
            }),
            Self::Range { min, max, message } => value.as_number().and_then(|n| {
                (n < *min || n > *max).then(|| FieldError::new(field, message))
            }),
            Self::OneOf { options, message } => value.as_str().and_then(|s| {
                (!value.is_missing() && !options.iter().any(|o| o == s))
                    .then(|| FieldError::new(field, message))
            }),
            Self::MaxFileSize { max_bytes, message } => value.as_image().and_then(|img| {
                (img.file_size > *max_bytes).then(|| FieldError::new(field, message))
            }),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { .. } => f.write_str("Rule::Required"),
            Self::MinLength { min, .. } => write!(f, "Rule::MinLength({min})"),
            Self::MaxLength { max, .. } => write!(f, "Rule::MaxLength({max})"),
            Self::Pattern { regex, .. } => write!(f, "Rule::Pattern({})", regex.as_str()),
            Self::Range { min, max, .. } => write!(f, "Rule::Range({min}..={max})"),
            Self::OneOf { options, .. } => write!(f, "Rule::OneOf({})", options.len()),
            Self::MaxFileSize { max_bytes, .. } => write!(f, "Rule::MaxFileSize({max_bytes})"),
        }
    }
}
