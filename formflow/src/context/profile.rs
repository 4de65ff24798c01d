//! The shared profile store.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The server-confirmed representation of the signed-in party's
/// profile (client or vendor).
///
/// Only fields the engine itself needs are typed; everything else rides
/// in `attributes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Server-assigned identifier.
    pub id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Remaining server-confirmed attributes, keyed by field name.
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    /// Builds a profile from a server response body.
    ///
    /// The `id` and `display_name` keys are lifted out; the rest stays
    /// in `attributes`.
    #[must_use]
    pub fn from_response(mut body: serde_json::Map<String, serde_json::Value>) -> Self {
        let id = body
            .remove("id")
            .and_then(|v| v.as_str().map(String::from));
        let display_name = body
            .remove("display_name")
            .and_then(|v| v.as_str().map(String::from));
        Self {
            id,
            display_name,
            attributes: body,
        }
    }
}

/// Shared, single-writer profile state.
///
/// All mutation goes through named setters; in the normal flow the
/// terminal submission is the only writer, on confirmed success.
/// Cloning the store clones the handle, not the data.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    inner: Arc<RwLock<Option<Profile>>>,
}

impl ProfileStore {
    /// Creates an empty store (no one signed in / no profile yet).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with a profile.
    #[must_use]
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(profile))),
        }
    }

    /// Returns a snapshot of the current profile, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Profile> {
        self.inner.read().clone()
    }

    /// Replaces the profile with a server-confirmed representation.
    pub fn commit(&self, profile: Profile) {
        *self.inner.write() = Some(profile);
    }

    /// Clears the profile (sign-out).
    pub fn clear(&self) {
        *self.inner.write() = None;
    }

    /// Returns true if a profile is present.
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.inner.read().is_some()
    }
}
