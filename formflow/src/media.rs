//! Device media-picker seam.
//!
//! The platform picker itself is out of scope; this trait is the
//! boundary a host implements. [`attach_image`] drives the pick /
//! file-info / store-write sequence so picker plumbing stays out of the
//! controller.

use crate::fields::{FieldStore, FieldValue, ImageDescriptor};
use async_trait::async_trait;

/// A picked asset before its size is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedAsset {
    /// Device-local URI.
    pub uri: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
}

/// The result of offering the picker to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The user dismissed the picker.
    Cancelled,
    /// The user picked an asset.
    Picked(PickedAsset),
}

/// File metadata reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    /// File size in bytes.
    pub size: u64,
}

/// Abstraction over the device media-picker capability.
#[async_trait]
pub trait MediaPicker: Send + Sync {
    /// Opens the image picker.
    async fn pick_image(&self) -> PickOutcome;

    /// Returns metadata for a device-local URI.
    async fn file_info(&self, uri: &str) -> FileInfo;
}

/// Picks an image and writes its descriptor into a field.
///
/// Returns true if a descriptor was stored. The store's usual
/// revalidation runs on the write, so an oversized file surfaces its
/// size error immediately.
pub async fn attach_image(
    picker: &dyn MediaPicker,
    store: &mut FieldStore,
    field: &str,
) -> bool {
    let PickOutcome::Picked(asset) = picker.pick_image().await else {
        return false;
    };
    let info = picker.file_info(&asset.uri).await;
    let descriptor =
        ImageDescriptor::new(asset.uri, asset.file_name, asset.mime_type, info.size);
    store.set_value(field, FieldValue::Image(descriptor));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldSchema, FieldSpec, Rule};
    use crate::testing::MockMediaPicker;

    fn store() -> FieldStore {
        FieldStore::new(
            FieldSchema::new()
                .field(FieldSpec::new("photo", "Photo").with_rule(Rule::max_image_size())),
        )
    }

    #[tokio::test]
    async fn test_attach_image_stores_descriptor() {
        let picker = MockMediaPicker::picking("file:///tmp/a.jpg", "a.jpg", 1_000_000);
        let mut store = store();

        assert!(attach_image(&picker, &mut store, "photo").await);
        let value = store.value("photo");
        assert_eq!(value.as_image().unwrap().file_size, 1_000_000);
        assert!(store.error("photo").is_none());
    }

    #[tokio::test]
    async fn test_attach_oversized_image_surfaces_error() {
        let picker = MockMediaPicker::picking("file:///tmp/big.jpg", "big.jpg", 6_000_000);
        let mut store = store();

        assert!(attach_image(&picker, &mut store, "photo").await);
        assert!(store.error("photo").is_some());
    }

    #[tokio::test]
    async fn test_cancelled_pick_leaves_field_alone() {
        let picker = MockMediaPicker::cancelling();
        let mut store = store();

        assert!(!attach_image(&picker, &mut store, "photo").await);
        assert!(store.value("photo").as_image().is_none());
    }
}
