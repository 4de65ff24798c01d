//! Shared flow fixtures.

use crate::fields::{FieldSchema, FieldSpec, FieldValue, Rule};
use crate::flow::{FlowBuilder, FlowSpec, StageSpec};
use crate::submit::{Mutation, SubmitRequest};

/// The vendor categories the fixture flow accepts.
pub const VENDOR_CATEGORIES: [&str; 4] = ["catering", "venue", "photography", "music"];

/// A realistic vendor-profile flow: business info, contact details, a
/// portfolio photo, and the confirmation stage.
///
/// # Panics
///
/// Panics if the fixture definition itself is invalid, which the tests
/// below guard against.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn vendor_profile_flow() -> FlowSpec {
    let schema = FieldSchema::new()
        .field(
            FieldSpec::new("business_name", "Business name")
                .required()
                .with_rule(Rule::MaxLength {
                    max: 60,
                    message: "Business name must be 60 characters or fewer.".to_string(),
                }),
        )
        .field(
            FieldSpec::new("category", "Category")
                .required()
                .with_rule(Rule::OneOf {
                    options: VENDOR_CATEGORIES.iter().map(|s| (*s).to_string()).collect(),
                    message: "Pick a listed category.".to_string(),
                }),
        )
        .field(
            FieldSpec::new("contact_number", "Contact number")
                .required()
                .with_rule(Rule::contact_number()),
        )
        .field(
            FieldSpec::new("description", "Description")
                .with_default(FieldValue::text(""))
                .with_rule(Rule::MaxLength {
                    max: 500,
                    message: "Description must be 500 characters or fewer.".to_string(),
                }),
        )
        .field(FieldSpec::new("portfolio_photo", "Portfolio photo").with_rule(Rule::max_image_size()));

    FlowBuilder::new("vendor-profile", schema)
        .stage(
            StageSpec::new("business", "Business information")
                .with_field("business_name")
                .with_field("category"),
        )
        .unwrap()
        .stage(
            StageSpec::new("contact", "Contact details")
                .with_field("contact_number")
                .with_field("description"),
        )
        .unwrap()
        .stage(StageSpec::new("portfolio", "Portfolio").with_field("portfolio_photo"))
        .unwrap()
        .confirmation("confirm", "Review your profile")
        .unwrap()
}

/// The submit request matching [`vendor_profile_flow`].
#[must_use]
pub fn vendor_profile_request() -> SubmitRequest {
    SubmitRequest::new("vendors", Mutation::Create)
        .with_image_field("portfolio_photo")
        .with_upload_prefix("vendors/portfolio")
}
