//! The field store: values, dirty flags, and committed validation state.

use super::rules::{FieldError, Rule};
use super::value::FieldValue;
use std::collections::HashMap;

/// Declaration of a single field: label, default, and rules.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// The field name used as the store key.
    pub name: String,
    /// The label shown next to the input and in the summary.
    pub label: String,
    /// The default value at controller mount.
    pub default: FieldValue,
    /// Validation rules checked in declaration order.
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    /// Creates a new field spec with an empty default and no rules.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            default: FieldValue::Empty,
            rules: Vec::new(),
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.default = default;
        self
    }

    /// Adds a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Marks the field required using its label in the message.
    #[must_use]
    pub fn required(self) -> Self {
        let rule = Rule::required(&self.label);
        self.with_rule(rule)
    }
}

/// The declared set of fields for one flow.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field declaration.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Returns the declared field specs in declaration order.
    #[must_use]
    pub fn specs(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field spec by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if a field with this name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// When a mutation triggers revalidation beyond the changed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Revalidate {
    /// Revalidate only the field that changed.
    #[default]
    Changed,
    /// Revalidate the whole form on every change.
    All,
}

/// Owns current values and validation state for all fields in a flow.
///
/// One store instance lives exactly as long as its controller; there is
/// no persistence across restarts.
#[derive(Debug)]
pub struct FieldStore {
    schema: FieldSchema,
    values: HashMap<String, FieldValue>,
    dirty: HashMap<String, bool>,
    errors: HashMap<String, FieldError>,
    mode: Revalidate,
}

impl FieldStore {
    /// Creates a store from a schema, seeding every field with its
    /// declared default.
    #[must_use]
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            schema,
            values: HashMap::new(),
            dirty: HashMap::new(),
            errors: HashMap::new(),
            mode: Revalidate::default(),
        }
    }

    /// Sets the revalidation mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Revalidate) -> Self {
        self.mode = mode;
        self
    }

    /// Changes the revalidation mode in place.
    pub fn set_mode(&mut self, mode: Revalidate) {
        self.mode = mode;
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Returns the current value for a field, or its declared default.
    ///
    /// Unknown fields read as [`FieldValue::Empty`].
    #[must_use]
    pub fn value(&self, name: &str) -> FieldValue {
        self.values.get(name).cloned().unwrap_or_else(|| {
            self.schema
                .get(name)
                .map(|spec| spec.default.clone())
                .unwrap_or_default()
        })
    }

    /// Stores a value, marks the field dirty, and revalidates.
    ///
    /// In [`Revalidate::Changed`] mode only the mutated field is
    /// rechecked; in [`Revalidate::All`] mode the whole form is.
    /// Writes to undeclared fields are ignored and logged.
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        if !self.schema.contains(name) {
            tracing::warn!(field = %name, "write to undeclared field ignored");
            return;
        }
        self.values.insert(name.to_string(), value);
        self.dirty.insert(name.to_string(), true);

        match self.mode {
            Revalidate::Changed => {
                self.validate(&[name]);
            }
            Revalidate::All => {
                self.validate_all();
            }
        }
    }

    /// Returns true if the field has been written since mount.
    #[must_use]
    pub fn is_dirty(&self, name: &str) -> bool {
        self.dirty.get(name).copied().unwrap_or(false)
    }

    /// Runs the declared rules for the named fields and commits the
    /// results, replacing any previously stored errors for those fields.
    ///
    /// Returns the errors found in this pass. Validation never fails;
    /// an unknown name simply contributes nothing.
    pub fn validate(&mut self, names: &[&str]) -> Vec<FieldError> {
        let mut found = Vec::new();
        for name in names {
            let Some(spec) = self.schema.get(name) else {
                continue;
            };
            let value = self.value(name);
            let first_error = spec
                .rules
                .iter()
                .find_map(|rule| rule.check(&spec.name, &value));

            match first_error {
                Some(err) => {
                    self.errors.insert(spec.name.clone(), err.clone());
                    found.push(err);
                }
                None => {
                    self.errors.remove(&spec.name);
                }
            }
        }
        found
    }

    /// Validates every declared field.
    pub fn validate_all(&mut self) -> Vec<FieldError> {
        let names: Vec<String> = self.schema.specs().iter().map(|s| s.name.clone()).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        self.validate(&refs)
    }

    /// Returns the committed error for a field, if any.
    #[must_use]
    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Returns all committed errors in field declaration order, the
    /// same order a whole-form validation pass reports them.
    #[must_use]
    pub fn errors(&self) -> Vec<FieldError> {
        self.schema
            .specs()
            .iter()
            .filter_map(|spec| self.errors.get(&spec.name).cloned())
            .collect()
    }

    /// Returns true if no committed errors remain.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Serializes current values as a JSON object keyed by field name.
    ///
    /// Used to build the submission payload from the terminal stage.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Map<String, serde_json::Value> {
        self.schema
            .specs()
            .iter()
            .map(|spec| {
                let value = serde_json::to_value(self.value(&spec.name))
                    .unwrap_or(serde_json::Value::Null);
                (spec.name.clone(), value)
            })
            .collect()
    }
}
