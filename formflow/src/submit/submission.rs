//! The terminal submission orchestration.

use super::client::{Backend, Mutation, SubmitMessages, TokenProvider};
use super::upload::ObjectStore;
use crate::context::{Profile, ProfileStore};
use crate::errors::{FormflowError, SubmitError};
use crate::fields::FieldStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Liveness flag owned by a controller instance.
///
/// Asynchronous continuations check the flag before applying their
/// results; once the owning scope is disposed, nothing downstream may
/// mutate shared state. Disposal is idempotent and one-way.
#[derive(Debug, Clone, Default)]
pub struct LivenessToken {
    disposed: Arc<AtomicBool>,
}

impl LivenessToken {
    /// Creates a live token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while the owning scope is alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.disposed.load(Ordering::SeqCst)
    }

    /// Marks the owning scope disposed.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

/// The result of one submission attempt.
///
/// Replaced wholesale on the next attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The attempt is in flight.
    Pending,
    /// The backend confirmed the mutation; the payload is the
    /// server-confirmed profile.
    Success(Profile),
    /// The attempt failed with a mapped, user-facing error.
    Failure(SubmitError),
}

/// What one flow submits and where.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Backend path, relative to the configured base URL.
    pub path: String,
    /// Create or update.
    pub mutation: Mutation,
    /// Name of the image field whose asset is uploaded first, if the
    /// flow carries one.
    pub image_field: Option<String>,
    /// Storage path prefix for the auxiliary upload.
    pub upload_prefix: String,
}

impl SubmitRequest {
    /// Creates a request with no auxiliary upload.
    #[must_use]
    pub fn new(path: impl Into<String>, mutation: Mutation) -> Self {
        Self {
            path: path.into(),
            mutation,
            image_field: None,
            upload_prefix: "uploads".to_string(),
        }
    }

    /// Sets the image field whose asset is uploaded before the
    /// primary call.
    #[must_use]
    pub fn with_image_field(mut self, field: impl Into<String>) -> Self {
        self.image_field = Some(field.into());
        self
    }

    /// Sets the storage path prefix for uploads.
    #[must_use]
    pub fn with_upload_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.upload_prefix = prefix.into();
        self
    }
}

/// Performs exactly one outbound mutation for a fully collected form.
///
/// Ordering within one attempt is strict: auxiliary upload first (or an
/// explicit skip when no image was provided), then the primary call,
/// because the primary payload embeds the upload's storage reference.
pub struct TerminalSubmission {
    backend: Arc<dyn Backend>,
    tokens: Arc<dyn TokenProvider>,
    objects: Option<Arc<dyn ObjectStore>>,
    profile_store: ProfileStore,
    messages: SubmitMessages,
}

impl TerminalSubmission {
    /// Creates a submission over a backend and token provider.
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        tokens: Arc<dyn TokenProvider>,
        profile_store: ProfileStore,
    ) -> Self {
        Self {
            backend,
            tokens,
            objects: None,
            profile_store,
            messages: SubmitMessages::default(),
        }
    }

    /// Attaches an object store for auxiliary uploads.
    #[must_use]
    pub fn with_object_store(mut self, objects: Arc<dyn ObjectStore>) -> Self {
        self.objects = Some(objects);
        self
    }

    /// Overrides the user-facing failure messages.
    #[must_use]
    pub fn with_messages(mut self, messages: SubmitMessages) -> Self {
        self.messages = messages;
        self
    }

    /// Returns the configured messages.
    #[must_use]
    pub fn messages(&self) -> &SubmitMessages {
        &self.messages
    }

    /// Runs one submission attempt.
    ///
    /// Handled failures (mapped statuses, transport, upload) come back
    /// as `Ok(SubmissionOutcome::Failure)` and never touch the shared
    /// profile store; it is only committed on confirmed success, and
    /// only while `liveness` is live.
    ///
    /// # Errors
    ///
    /// `Err` is reserved for precondition violations: a missing session
    /// token ([`FormflowError::MissingContext`]) or a scope disposed
    /// before the result could be applied ([`FormflowError::Disposed`]).
    pub async fn run(
        &self,
        fields: &FieldStore,
        request: &SubmitRequest,
        liveness: &LivenessToken,
    ) -> Result<SubmissionOutcome, FormflowError> {
        let attempt = Uuid::new_v4();
        info!(attempt = %attempt, path = %request.path, "submission started");

        let token = self.tokens.get_token().await?;

        let mut payload = fields.to_payload();

        // The upload must complete before the primary call is issued;
        // the payload depends on its storage reference.
        if let Some(field) = &request.image_field {
            if let Some(descriptor) = fields.value(field).as_image() {
                let Some(objects) = &self.objects else {
                    return Err(FormflowError::Internal(
                        "submission has an image field but no object store".to_string(),
                    ));
                };
                let path = format!("{}/{}", request.upload_prefix, descriptor.file_name);
                match objects.upload(&path, descriptor).await {
                    Ok(reference) => {
                        payload.insert(field.clone(), serde_json::Value::String(reference));
                    }
                    Err(err) => {
                        warn!(attempt = %attempt, error = %err, "auxiliary upload failed");
                        return Ok(SubmissionOutcome::Failure(self.messages.upload_error()));
                    }
                }
            }
            // No image provided: the upload is explicitly skipped.
        }

        let response = match self
            .backend
            .mutate(request.mutation, &request.path, &payload, &token)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!(attempt = %attempt, error = %err, "backend transport failure");
                return Ok(SubmissionOutcome::Failure(self.messages.transport_error()));
            }
        };

        if !liveness.is_live() {
            return Err(FormflowError::Disposed(
                "submission completed after controller disposal".to_string(),
            ));
        }

        if let Some(err) = self.messages.map_status(response.status) {
            info!(attempt = %attempt, status = response.status, "submission failed");
            return Ok(SubmissionOutcome::Failure(err));
        }

        let profile = Profile::from_response(response.body);
        self.profile_store.commit(profile.clone());
        info!(attempt = %attempt, status = response.status, "submission succeeded");
        Ok(SubmissionOutcome::Success(profile))
    }
}

impl std::fmt::Debug for TerminalSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSubmission")
            .field("has_object_store", &self.objects.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldSchema, FieldSpec, FieldStore, FieldValue, ImageDescriptor};
    use crate::testing::{MockBackend, MockObjectStore, MockTokenProvider};
    use pretty_assertions::assert_eq;

    fn store_with_name() -> FieldStore {
        let schema = FieldSchema::new().field(FieldSpec::new("name", "Name"));
        let mut store = FieldStore::new(schema);
        store.set_value("name", FieldValue::text("Ana"));
        store
    }

    fn submission(backend: MockBackend, profiles: ProfileStore) -> TerminalSubmission {
        TerminalSubmission::new(
            Arc::new(backend),
            Arc::new(MockTokenProvider::new("token-1")),
            profiles,
        )
    }

    #[tokio::test]
    async fn test_success_commits_profile() {
        let backend = MockBackend::respond(
            201,
            serde_json::json!({"id": "v-1", "display_name": "Ana"}),
        );
        let profiles = ProfileStore::new();
        let submission = submission(backend, profiles.clone());

        let outcome = submission
            .run(
                &store_with_name(),
                &SubmitRequest::new("vendors", Mutation::Create),
                &LivenessToken::new(),
            )
            .await
            .unwrap();

        let SubmissionOutcome::Success(profile) = outcome else {
            panic!("expected success");
        };
        assert_eq!(profile.id.as_deref(), Some("v-1"));
        assert_eq!(profiles.snapshot(), Some(profile));
    }

    #[tokio::test]
    async fn test_mapped_failure_leaves_profile_untouched() {
        let backend = MockBackend::respond(404, serde_json::json!({}));
        let profiles = ProfileStore::new();
        let submission = submission(backend, profiles.clone());

        let outcome = submission
            .run(
                &store_with_name(),
                &SubmitRequest::new("vendors", Mutation::Create),
                &LivenessToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SubmissionOutcome::Failure(SubmitError::ServerUnreachable {
                message: SubmitMessages::default().server_unreachable,
            })
        );
        assert!(profiles.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_disposed_scope_blocks_commit() {
        let backend = MockBackend::respond(201, serde_json::json!({"id": "v-1"}));
        let profiles = ProfileStore::new();
        let submission = submission(backend, profiles.clone());

        let liveness = LivenessToken::new();
        liveness.dispose();

        let result = submission
            .run(
                &store_with_name(),
                &SubmitRequest::new("vendors", Mutation::Create),
                &liveness,
            )
            .await;

        assert!(matches!(result, Err(FormflowError::Disposed(_))));
        assert!(profiles.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_upload_runs_before_primary_call() {
        let schema = FieldSchema::new()
            .field(FieldSpec::new("name", "Name"))
            .field(FieldSpec::new("photo", "Portfolio photo"));
        let mut fields = FieldStore::new(schema);
        fields.set_value("name", FieldValue::text("Ana"));
        fields.set_value(
            "photo",
            FieldValue::Image(ImageDescriptor::new(
                "file:///tmp/p.jpg",
                "p.jpg",
                "image/jpeg",
                1024,
            )),
        );

        let backend = MockBackend::respond(201, serde_json::json!({"id": "v-1"}));
        let objects = MockObjectStore::new();
        let recorded_backend = backend.clone();
        let recorded_objects = objects.clone();

        let submission = TerminalSubmission::new(
            Arc::new(backend),
            Arc::new(MockTokenProvider::new("token-1")),
            ProfileStore::new(),
        )
        .with_object_store(Arc::new(objects));

        let request = SubmitRequest::new("vendors", Mutation::Create)
            .with_image_field("photo")
            .with_upload_prefix("vendors/portfolio");
        let outcome = submission
            .run(&fields, &request, &LivenessToken::new())
            .await
            .unwrap();

        assert!(matches!(outcome, SubmissionOutcome::Success(_)));
        assert_eq!(recorded_objects.uploads().len(), 1);
        assert_eq!(
            recorded_objects.uploads()[0].0,
            "vendors/portfolio/p.jpg"
        );

        // The payload the backend saw carries the storage reference,
        // not the device descriptor.
        let calls = recorded_backend.calls();
        assert_eq!(calls.len(), 1);
        let photo = calls[0].payload.get("photo").unwrap();
        assert!(photo.is_string());
    }

    #[tokio::test]
    async fn test_upload_failure_is_fatal_to_attempt() {
        let schema = FieldSchema::new().field(FieldSpec::new("photo", "Photo"));
        let mut fields = FieldStore::new(schema);
        fields.set_value(
            "photo",
            FieldValue::Image(ImageDescriptor::new("u", "p.jpg", "image/jpeg", 10)),
        );

        let backend = MockBackend::respond(201, serde_json::json!({"id": "v-1"}));
        let recorded_backend = backend.clone();

        let submission = TerminalSubmission::new(
            Arc::new(backend),
            Arc::new(MockTokenProvider::new("token-1")),
            ProfileStore::new(),
        )
        .with_object_store(Arc::new(MockObjectStore::failing("disk full")));

        let request = SubmitRequest::new("vendors", Mutation::Create).with_image_field("photo");
        let outcome = submission
            .run(&fields, &request, &LivenessToken::new())
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            SubmissionOutcome::Failure(SubmitError::Upload { .. })
        ));
        // The primary call was never issued.
        assert!(recorded_backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_flow_without_image_skips_upload() {
        let backend = MockBackend::respond(201, serde_json::json!({"id": "v-1"}));
        let objects = MockObjectStore::new();
        let recorded_objects = objects.clone();

        let submission = TerminalSubmission::new(
            Arc::new(backend),
            Arc::new(MockTokenProvider::new("token-1")),
            ProfileStore::new(),
        )
        .with_object_store(Arc::new(objects));

        // The request declares an image field but the store holds none.
        let schema = FieldSchema::new()
            .field(FieldSpec::new("name", "Name"))
            .field(FieldSpec::new("photo", "Photo"));
        let mut fields = FieldStore::new(schema);
        fields.set_value("name", FieldValue::text("Ana"));

        let request = SubmitRequest::new("vendors", Mutation::Create).with_image_field("photo");
        let outcome = submission
            .run(&fields, &request, &LivenessToken::new())
            .await
            .unwrap();

        assert!(matches!(outcome, SubmissionOutcome::Success(_)));
        assert!(recorded_objects.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_is_precondition_violation() {
        let backend = MockBackend::respond(201, serde_json::json!({}));
        let submission = TerminalSubmission::new(
            Arc::new(backend),
            Arc::new(MockTokenProvider::signed_out()),
            ProfileStore::new(),
        );

        let result = submission
            .run(
                &store_with_name(),
                &SubmitRequest::new("vendors", Mutation::Create),
                &LivenessToken::new(),
            )
            .await;

        assert!(matches!(result, Err(FormflowError::MissingContext(_))));
    }
}
