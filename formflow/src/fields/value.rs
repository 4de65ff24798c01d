//! Field value types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Descriptor for an image chosen through the media picker.
///
/// The descriptor references a device-local asset; the storage
/// reference produced by the upload replaces it in the submitted
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Device-local URI of the asset.
    pub uri: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the picker.
    pub mime_type: String,
    /// File size in bytes.
    pub file_size: u64,
}

impl ImageDescriptor {
    /// Creates a new image descriptor.
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        file_size: u64,
    ) -> Self {
        Self {
            uri: uri.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            file_size,
        }
    }
}

/// A single form field value.
///
/// `Empty` is the default for fields without a configured default; a
/// required rule treats it (and blank text) as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// No value entered yet.
    #[default]
    Empty,
    /// Free-form text.
    Text(String),
    /// Whole number (counts, capacities).
    Integer(i64),
    /// Decimal number (prices, budgets).
    Decimal(f64),
    /// Boolean toggle.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Selection from a declared set of options.
    Choice(String),
    /// An image selected through the media picker.
    Image(ImageDescriptor),
}

impl FieldValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Creates a choice value.
    #[must_use]
    pub fn choice(s: impl Into<String>) -> Self {
        Self::Choice(s.into())
    }

    /// Returns true if the value counts as missing for a required rule.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) | Self::Choice(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the text content, if this is a text or choice value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric content as f64, if numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(n) => Some(*n as f64),
            Self::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the image descriptor, if this is an image value.
    #[must_use]
    pub fn as_image(&self) -> Option<&ImageDescriptor> {
        match self {
            Self::Image(desc) => Some(desc),
            _ => None,
        }
    }

    /// Renders the value for the read-only confirmation summary.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) | Self::Choice(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Decimal(n) => n.to_string(),
            Self::Bool(b) => if *b { "yes" } else { "no" }.to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Image(desc) => desc.file_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_missing() {
        assert!(FieldValue::Empty.is_missing());
        assert!(FieldValue::text("").is_missing());
        assert!(FieldValue::text("   ").is_missing());
        assert!(!FieldValue::text("x").is_missing());
        assert!(!FieldValue::Integer(0).is_missing());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(FieldValue::Integer(3).as_number(), Some(3.0));
        assert_eq!(FieldValue::Decimal(2.5).as_number(), Some(2.5));
        assert_eq!(FieldValue::text("3").as_number(), None);
    }

    #[test]
    fn test_display_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(FieldValue::Date(date).display(), "2024-06-15");
    }

    #[test]
    fn test_display_image_uses_file_name() {
        let value = FieldValue::Image(ImageDescriptor::new(
            "file:///tmp/a.jpg",
            "a.jpg",
            "image/jpeg",
            1024,
        ));
        assert_eq!(value.display(), "a.jpg");
    }

    #[test]
    fn test_serialization_round_trip() {
        let value = FieldValue::choice("catering");
        let json = serde_json::to_string(&value).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }
}
