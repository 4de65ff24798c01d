//! Test doubles and fixtures.
//!
//! Available to downstream crates as well as the engine's own tests;
//! hosts integrating a real backend can exercise whole flows against
//! the scripted mocks here.

mod fixtures;
mod mocks;

pub use fixtures::{vendor_profile_flow, vendor_profile_request, VENDOR_CATEGORIES};
pub use mocks::{
    MockBackend, MockMediaPicker, MockObjectStore, MockTokenProvider, RecordedCall,
};
