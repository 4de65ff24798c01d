//! Field values, validation rules, and the field store.
//!
//! The field store owns all values and validation state for one
//! controller instance; values are discarded when the controller is
//! dropped. Validation never fails as a `Result` - it always yields a
//! structured error list, possibly empty.

mod rules;
mod store;
mod value;

pub use rules::{FieldError, Rule, MAX_IMAGE_BYTES};
pub use store::{FieldSchema, FieldSpec, FieldStore, Revalidate};
pub use value::{FieldValue, ImageDescriptor};
