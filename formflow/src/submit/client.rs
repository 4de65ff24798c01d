//! Backend client trait, HTTP implementation, and status mapping.

use crate::errors::{FormflowError, SubmitError};
use async_trait::async_trait;

/// The HTTP verb a submission uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Create a resource (`POST`).
    Create,
    /// Update a resource (`PATCH`).
    Update,
}

/// A backend response: status code plus parsed JSON body.
#[derive(Debug, Clone, Default)]
pub struct BackendResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed response body. Empty when the body was absent or not an
    /// object.
    pub body: serde_json::Map<String, serde_json::Value>,
}

impl BackendResponse {
    /// Whether the response indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A transport-level backend failure (no status code available).
#[derive(Debug, Clone, thiserror::Error)]
#[error("Backend transport error: {0}")]
pub struct BackendError(pub String);

/// Abstraction over the HTTP backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Performs one mutation with a JSON payload and bearer token.
    ///
    /// Non-2xx statuses are returned in the response, not as errors;
    /// only transport failures produce `Err`.
    async fn mutate(
        &self,
        mutation: Mutation,
        path: &str,
        payload: &serde_json::Map<String, serde_json::Value>,
        token: &str,
    ) -> Result<BackendResponse, BackendError>;
}

/// Abstraction over the authentication/session provider.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a bearer token for the signed-in identity.
    ///
    /// # Errors
    ///
    /// Returns [`FormflowError::MissingContext`] when no one is signed
    /// in; callers treat that as an unrecoverable precondition
    /// violation, not a handled submission failure.
    async fn get_token(&self) -> Result<String, FormflowError>;

    /// Ends the session.
    async fn sign_out(&self);
}

/// User-facing messages for the fixed set of mapped failures.
#[derive(Debug, Clone)]
pub struct SubmitMessages {
    /// Shown for HTTP 400.
    pub invalid_data: String,
    /// Shown for HTTP 401.
    pub unauthorized: String,
    /// Shown for HTTP 403.
    pub forbidden: String,
    /// Shown for HTTP 404.
    pub server_unreachable: String,
    /// Shown when the auxiliary upload fails.
    pub upload_failed: String,
    /// Shown for every other failure.
    pub unexpected: String,
}

impl Default for SubmitMessages {
    fn default() -> Self {
        Self {
            invalid_data: "Invalid data. Please review your entries.".to_string(),
            unauthorized: "Unauthorized. Please sign in again.".to_string(),
            forbidden: "You are not allowed to do that.".to_string(),
            server_unreachable: "Server unreachable. Please try again later.".to_string(),
            upload_failed: "Image upload failed. Please try again.".to_string(),
            unexpected: "Unexpected error occurred.".to_string(),
        }
    }
}

impl SubmitMessages {
    /// Maps a non-success status code to its submission error.
    ///
    /// Returns `None` for 2xx. Statuses outside the fixed map (409,
    /// 500, ...) fold into the generic message.
    #[must_use]
    pub fn map_status(&self, status: u16) -> Option<SubmitError> {
        if (200..300).contains(&status) {
            return None;
        }
        Some(match status {
            400 => SubmitError::InvalidData {
                message: self.invalid_data.clone(),
            },
            401 => SubmitError::Unauthorized {
                message: self.unauthorized.clone(),
            },
            403 => SubmitError::Forbidden {
                message: self.forbidden.clone(),
            },
            404 => SubmitError::ServerUnreachable {
                message: self.server_unreachable.clone(),
            },
            _ => SubmitError::Unexpected {
                message: self.unexpected.clone(),
            },
        })
    }

    /// The submission error for a failed upload.
    #[must_use]
    pub fn upload_error(&self) -> SubmitError {
        SubmitError::Upload {
            message: self.upload_failed.clone(),
        }
    }

    /// The submission error for a transport failure.
    #[must_use]
    pub fn transport_error(&self) -> SubmitError {
        SubmitError::ServerUnreachable {
            message: self.server_unreachable.clone(),
        }
    }
}

/// `reqwest`-backed backend against a configured base URL.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpBackend {
    /// Creates a backend for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a backend with a preconfigured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Backend for HttpBackend {
    async fn mutate(
        &self,
        mutation: Mutation,
        path: &str,
        payload: &serde_json::Map<String, serde_json::Value>,
        token: &str,
    ) -> Result<BackendResponse, BackendError> {
        let url = self.url(path);
        let request = match mutation {
            Mutation::Create => self.client.post(&url),
            Mutation::Update => self.client.patch(&url),
        };

        let response = request
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(|e| BackendError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default();

        Ok(BackendResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_map_fixed_codes() {
        let messages = SubmitMessages::default();

        assert!(matches!(
            messages.map_status(400),
            Some(SubmitError::InvalidData { .. })
        ));
        assert!(matches!(
            messages.map_status(401),
            Some(SubmitError::Unauthorized { .. })
        ));
        assert!(matches!(
            messages.map_status(403),
            Some(SubmitError::Forbidden { .. })
        ));
        assert!(matches!(
            messages.map_status(404),
            Some(SubmitError::ServerUnreachable { .. })
        ));
    }

    #[test]
    fn test_status_map_success_is_none() {
        let messages = SubmitMessages::default();
        assert!(messages.map_status(200).is_none());
        assert!(messages.map_status(201).is_none());
    }

    #[test]
    fn test_status_map_other_codes_are_generic() {
        let messages = SubmitMessages::default();
        for status in [409, 500, 503] {
            assert!(matches!(
                messages.map_status(status),
                Some(SubmitError::Unexpected { .. })
            ));
        }
    }

    #[test]
    fn test_configured_message_surfaces() {
        let messages = SubmitMessages {
            server_unreachable: "The planner service is unreachable.".to_string(),
            ..SubmitMessages::default()
        };
        let err = messages.map_status(404).unwrap();
        assert_eq!(err.message(), "The planner service is unreachable.");
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_backend_url_join() {
        let backend = HttpBackend::new("https://api.example.com/");
        assert_eq!(backend.url("/vendors"), "https://api.example.com/vendors");
        assert_eq!(backend.url("vendors"), "https://api.example.com/vendors");
    }
}
