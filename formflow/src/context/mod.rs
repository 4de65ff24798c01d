//! Explicit shared application state.
//!
//! The source pattern this replaces is ambient context-style global
//! state. Here the profile store is an ordinary value passed by
//! reference (or cloned handle) to every controller that needs it, with
//! mutation confined to named setters.

mod profile;

pub use profile::{Profile, ProfileStore};
