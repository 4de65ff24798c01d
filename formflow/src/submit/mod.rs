//! Terminal submission: backend client, auxiliary upload, and the
//! submission orchestration.
//!
//! Within one submission the auxiliary upload (if any) is awaited to
//! completion before the primary mutation is issued; the primary
//! payload embeds the storage reference the upload returns.

mod client;
mod submission;
mod upload;

#[cfg(feature = "http")]
pub use client::HttpBackend;
pub use client::{Backend, BackendError, BackendResponse, Mutation, SubmitMessages, TokenProvider};
pub use submission::{
    LivenessToken, SubmitRequest, SubmissionOutcome, TerminalSubmission,
};
pub use upload::{ObjectStore, UploadError};
