//! Binary-object storage seam.

use crate::fields::ImageDescriptor;
use async_trait::async_trait;

/// A storage failure, surfaced to the user as the configured upload
/// message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Upload failed: {0}")]
pub struct UploadError(pub String);

/// Abstraction over the binary-object storage service.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads the asset behind a descriptor, returning its storage
    /// reference.
    async fn upload(
        &self,
        path: &str,
        descriptor: &ImageDescriptor,
    ) -> Result<String, UploadError>;

    /// Resolves a storage reference to a download URL.
    async fn download_url(&self, reference: &str) -> Result<String, UploadError>;
}
