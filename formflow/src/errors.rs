//! Error types for the formflow engine.
//!
//! Field-level validation failures are deliberately not represented
//! here: they are data ([`crate::fields::FieldError`]) returned from the
//! field store and rendered inline, never raised through `Result`.

use thiserror::Error;

/// The main error type for formflow operations.
#[derive(Debug, Error)]
pub enum FormflowError {
    /// A flow definition failed validation at build time.
    #[error("{0}")]
    FlowValidation(#[from] FlowValidationError),

    /// A submission was attempted or completed with an error.
    #[error("{0}")]
    Submission(#[from] SubmitError),

    /// A required ambient value (signed-in identity, token) was absent.
    ///
    /// Treated as an unrecoverable precondition violation, not a
    /// handled failure.
    #[error("Missing ambient context: {0}")]
    MissingContext(String),

    /// The owning scope was disposed before a continuation ran.
    #[error("Flow disposed: {0}")]
    Disposed(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error raised when a flow definition fails validation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct FlowValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl FlowValidationError {
    /// Creates a new flow validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}

/// Errors produced by the terminal submission path.
///
/// The user-facing message for each variant comes from the configured
/// [`crate::submit::SubmitMessages`]; the variants carry the mapped text
/// so the renderer can show it without consulting configuration again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The backend rejected the payload (HTTP 400).
    #[error("{message}")]
    InvalidData {
        /// User-facing message.
        message: String,
    },

    /// The session token was missing or rejected (HTTP 401).
    #[error("{message}")]
    Unauthorized {
        /// User-facing message.
        message: String,
    },

    /// The signed-in identity may not perform this mutation (HTTP 403).
    #[error("{message}")]
    Forbidden {
        /// User-facing message.
        message: String,
    },

    /// The backend could not be reached (HTTP 404 in the observed API).
    #[error("{message}")]
    ServerUnreachable {
        /// User-facing message.
        message: String,
    },

    /// The auxiliary upload failed before the primary call was issued.
    #[error("{message}")]
    Upload {
        /// User-facing message.
        message: String,
    },

    /// Any other failure, including unexpected status codes.
    #[error("{message}")]
    Unexpected {
        /// User-facing message.
        message: String,
    },
}

impl SubmitError {
    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidData { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::ServerUnreachable { message }
            | Self::Upload { message }
            | Self::Unexpected { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_validation_error_display() {
        let err = FlowValidationError::new("duplicate stage name")
            .with_stages(vec!["contact".to_string()]);

        assert_eq!(err.to_string(), "duplicate stage name");
        assert_eq!(err.stages, vec!["contact".to_string()]);
    }

    #[test]
    fn test_submit_error_message() {
        let err = SubmitError::ServerUnreachable {
            message: "Server unreachable.".to_string(),
        };
        assert_eq!(err.message(), "Server unreachable.");
        assert_eq!(err.to_string(), "Server unreachable.");
    }

    #[test]
    fn test_formflow_error_from_submit() {
        let err: FormflowError = SubmitError::Unauthorized {
            message: "Unauthorized.".to_string(),
        }
        .into();
        assert!(matches!(err, FormflowError::Submission(_)));
    }
}
