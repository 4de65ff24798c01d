//! Flow and stage specifications with build-time validation.

use crate::errors::FlowValidationError;
use crate::fields::FieldSchema;
use std::collections::HashSet;

/// Specification of one stage: a screen's worth of fields.
#[derive(Debug, Clone)]
pub struct StageSpec {
    /// The stage name, unique within the flow.
    pub name: String,
    /// The title shown at the top of the screen.
    pub title: String,
    /// Names of the fields this stage edits. Empty for the
    /// confirmation stage.
    pub fields: Vec<String>,
}

impl StageSpec {
    /// Creates a new stage spec.
    #[must_use]
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field to the stage.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Validates the stage name.
    pub(crate) fn validate(&self) -> Result<(), FlowValidationError> {
        if self.name.trim().is_empty() {
            return Err(FlowValidationError::new(
                "Stage name cannot be empty or whitespace-only",
            ));
        }
        Ok(())
    }
}

/// A validated flow definition.
#[derive(Debug, Clone)]
pub struct FlowSpec {
    name: String,
    stages: Vec<StageSpec>,
    schema: FieldSchema,
}

impl FlowSpec {
    /// Returns the flow name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered stages.
    #[must_use]
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the stage at an ordinal position.
    #[must_use]
    pub fn stage(&self, index: usize) -> Option<&StageSpec> {
        self.stages.get(index)
    }

    /// Returns the index of the terminal (confirmation) stage.
    #[must_use]
    pub fn terminal_stage(&self) -> usize {
        self.stages.len() - 1
    }

    /// Returns the field schema shared by all stages.
    #[must_use]
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }
}

/// Builder for creating validated flows.
#[derive(Debug, Clone)]
pub struct FlowBuilder {
    name: String,
    stages: Vec<StageSpec>,
    schema: FieldSchema,
}

impl FlowBuilder {
    /// Creates a new flow builder over a field schema.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: FieldSchema) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            schema,
        }
    }

    /// Appends a stage to the flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the stage name is blank or duplicated, or if
    /// the stage references a field the schema does not declare.
    pub fn stage(mut self, spec: StageSpec) -> Result<Self, FlowValidationError> {
        spec.validate()?;

        if self.stages.iter().any(|s| s.name == spec.name) {
            return Err(
                FlowValidationError::new(format!("Duplicate stage name '{}'", spec.name))
                    .with_stages(vec![spec.name.clone()]),
            );
        }

        for field in &spec.fields {
            if !self.schema.contains(field) {
                return Err(FlowValidationError::new(format!(
                    "Stage '{}' references undeclared field '{}'",
                    spec.name, field
                ))
                .with_stages(vec![spec.name.clone()]));
            }
        }

        self.stages.push(spec);
        Ok(self)
    }

    /// Appends the read-only confirmation stage and builds the flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow has no editable stages, or if a
    /// declared field is not assigned to any stage (it could never be
    /// edited, yet its rules could block submission forever).
    pub fn confirmation(
        self,
        name: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<FlowSpec, FlowValidationError> {
        let spec = StageSpec::new(name, title);
        let built = self.stage(spec)?;

        if built.stages.len() < 2 {
            return Err(FlowValidationError::new(
                "Flow needs at least one editable stage before the confirmation stage",
            ));
        }

        let assigned: HashSet<&str> = built
            .stages
            .iter()
            .flat_map(|s| s.fields.iter().map(String::as_str))
            .collect();
        for field in built.schema.specs() {
            if !assigned.contains(field.name.as_str()) {
                return Err(FlowValidationError::new(format!(
                    "Field '{}' is declared but assigned to no stage",
                    field.name
                )));
            }
        }

        Ok(FlowSpec {
            name: built.name,
            stages: built.stages,
            schema: built.schema,
        })
    }
}
