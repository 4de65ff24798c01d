//! Scripted mocks for the external collaborators.

use crate::errors::FormflowError;
use crate::fields::ImageDescriptor;
use crate::media::{FileInfo, MediaPicker, PickOutcome, PickedAsset};
use crate::submit::{
    Backend, BackendError, BackendResponse, Mutation, ObjectStore, TokenProvider, UploadError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// One call recorded by [`MockBackend`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The mutation kind.
    pub mutation: Mutation,
    /// The request path.
    pub path: String,
    /// The payload as sent.
    pub payload: serde_json::Map<String, serde_json::Value>,
    /// The bearer token as sent.
    pub token: String,
}

#[derive(Debug)]
struct MockBackendState {
    status: u16,
    body: serde_json::Value,
    transport_failure: Option<String>,
    calls: Vec<RecordedCall>,
}

/// A backend returning a scripted response and recording every call.
///
/// Clones share state, so a test can keep a handle for assertions
/// after moving the mock into the submission.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Arc<Mutex<MockBackendState>>,
}

impl MockBackend {
    /// Creates a backend that answers every call with this status and
    /// body.
    #[must_use]
    pub fn respond(status: u16, body: serde_json::Value) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockBackendState {
                status,
                body,
                transport_failure: None,
                calls: Vec::new(),
            })),
        }
    }

    /// Creates a backend that fails at the transport level.
    #[must_use]
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockBackendState {
                status: 0,
                body: serde_json::Value::Null,
                transport_failure: Some(message.into()),
                calls: Vec::new(),
            })),
        }
    }

    /// Rescripts the response for subsequent calls.
    pub fn set_response(&self, status: u16, body: serde_json::Value) {
        let mut state = self.state.lock();
        state.status = status;
        state.body = body;
        state.transport_failure = None;
    }

    /// Returns all recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn mutate(
        &self,
        mutation: Mutation,
        path: &str,
        payload: &serde_json::Map<String, serde_json::Value>,
        token: &str,
    ) -> Result<BackendResponse, BackendError> {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            mutation,
            path: path.to_string(),
            payload: payload.clone(),
            token: token.to_string(),
        });

        if let Some(message) = &state.transport_failure {
            return Err(BackendError(message.clone()));
        }

        Ok(BackendResponse {
            status: state.status,
            body: state.body.as_object().cloned().unwrap_or_default(),
        })
    }
}

/// A token provider with a fixed token, or none at all.
#[derive(Debug, Clone)]
pub struct MockTokenProvider {
    token: Option<String>,
    sign_outs: Arc<Mutex<usize>>,
}

impl MockTokenProvider {
    /// Creates a provider that always hands out this token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            sign_outs: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates a provider with no signed-in identity.
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            token: None,
            sign_outs: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns how many times `sign_out` was called.
    #[must_use]
    pub fn sign_out_count(&self) -> usize {
        *self.sign_outs.lock()
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn get_token(&self) -> Result<String, FormflowError> {
        self.token.clone().ok_or_else(|| {
            FormflowError::MissingContext("no signed-in identity".to_string())
        })
    }

    async fn sign_out(&self) {
        *self.sign_outs.lock() += 1;
    }
}

/// An object store recording uploads and returning `ref://` paths.
#[derive(Debug, Clone, Default)]
pub struct MockObjectStore {
    uploads: Arc<Mutex<Vec<(String, ImageDescriptor)>>>,
    failure: Option<String>,
}

impl MockObjectStore {
    /// Creates a store whose uploads succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose uploads fail with this message.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Vec::new())),
            failure: Some(message.into()),
        }
    }

    /// Returns all attempted uploads, in order.
    #[must_use]
    pub fn uploads(&self) -> Vec<(String, ImageDescriptor)> {
        self.uploads.lock().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(
        &self,
        path: &str,
        descriptor: &ImageDescriptor,
    ) -> Result<String, UploadError> {
        self.uploads
            .lock()
            .push((path.to_string(), descriptor.clone()));
        match &self.failure {
            Some(message) => Err(UploadError(message.clone())),
            None => Ok(format!("ref://{path}")),
        }
    }

    async fn download_url(&self, reference: &str) -> Result<String, UploadError> {
        Ok(format!(
            "https://storage.example.com/{}",
            reference.trim_start_matches("ref://")
        ))
    }
}

/// A media picker that picks a scripted asset or cancels.
#[derive(Debug, Clone)]
pub struct MockMediaPicker {
    asset: Option<PickedAsset>,
    size: u64,
}

impl MockMediaPicker {
    /// Creates a picker that picks one asset with the given size.
    #[must_use]
    pub fn picking(uri: impl Into<String>, file_name: impl Into<String>, size: u64) -> Self {
        Self {
            asset: Some(PickedAsset {
                uri: uri.into(),
                file_name: file_name.into(),
                mime_type: "image/jpeg".to_string(),
            }),
            size,
        }
    }

    /// Creates a picker the user always dismisses.
    #[must_use]
    pub fn cancelling() -> Self {
        Self {
            asset: None,
            size: 0,
        }
    }
}

#[async_trait]
impl MediaPicker for MockMediaPicker {
    async fn pick_image(&self) -> PickOutcome {
        match &self.asset {
            Some(asset) => PickOutcome::Picked(asset.clone()),
            None => PickOutcome::Cancelled,
        }
    }

    async fn file_info(&self, _uri: &str) -> FileInfo {
        FileInfo { size: self.size }
    }
}
