//! The transition guard.

use super::spec::FlowSpec;
use crate::fields::FieldStore;

/// Decides whether the flow may advance past a stage.
///
/// Checking is not silent: the validation pass is committed to the
/// store so error text becomes visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionGuard;

impl TransitionGuard {
    /// Creates a new guard.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns true iff every field on the given stage validates.
    ///
    /// Stages past the end of the flow never pass; the confirmation
    /// stage, having no fields, always does.
    pub fn can_advance(&self, spec: &FlowSpec, stage: usize, store: &mut FieldStore) -> bool {
        let Some(stage_spec) = spec.stage(stage) else {
            return false;
        };
        let names: Vec<&str> = stage_spec.fields.iter().map(String::as_str).collect();
        store.validate(&names).is_empty()
    }

    /// Returns true iff the whole form validates, committing the pass.
    ///
    /// Used ahead of the terminal submission.
    pub fn can_submit(&self, store: &mut FieldStore) -> bool {
        store.validate_all().is_empty()
    }
}
