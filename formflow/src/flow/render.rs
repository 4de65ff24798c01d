//! The stage renderer.
//!
//! Rendering is a pure mapping from `(phase, stage, field store)` to a
//! screen description. Given the same inputs it produces the same
//! [`StageView`]; it holds no state of its own.

use super::controller::FlowPhase;
use super::spec::FlowSpec;
use crate::fields::{FieldStore, FieldValue};
use serde::Serialize;

/// One editable input on a form screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputView {
    /// The field name.
    pub name: String,
    /// The label shown next to the input.
    pub label: String,
    /// The current value.
    pub value: FieldValue,
    /// Inline error text, if the committed validation state has one.
    pub error: Option<String>,
}

/// One row of the read-only confirmation summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// The field label.
    pub label: String,
    /// The value rendered as display text.
    pub value: String,
}

/// A description of what the screen should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum StageView {
    /// An editable form stage.
    Form {
        /// The stage title.
        title: String,
        /// Zero-based stage index, for progress indicators.
        stage: usize,
        /// Total number of stages.
        stage_count: usize,
        /// The inputs to render.
        inputs: Vec<InputView>,
        /// Whether the back action steps within the flow (mid-flow)
        /// rather than leaving it (stage zero).
        back_steps_within_flow: bool,
    },
    /// The terminal read-only confirmation summary.
    Confirmation {
        /// The stage title.
        title: String,
        /// All collected fields, in declaration order.
        rows: Vec<SummaryRow>,
    },
    /// Full-screen loading indicator during submission.
    Submitting,
    /// Full-screen success presentation with one continue action.
    Success,
    /// Full-screen failure presentation with one retry action.
    Failure {
        /// The mapped user-facing message.
        message: String,
    },
}

/// Renders the screen for the current phase and stage.
#[must_use]
pub fn render(spec: &FlowSpec, phase: &FlowPhase, stage: usize, store: &FieldStore) -> StageView {
    match phase {
        FlowPhase::Submitting => StageView::Submitting,
        FlowPhase::Succeeded => StageView::Success,
        FlowPhase::Failed { message } => StageView::Failure {
            message: message.clone(),
        },
        FlowPhase::Editing => {
            let Some(stage_spec) = spec.stage(stage) else {
                // Unreachable while the cursor invariant holds.
                return StageView::Failure {
                    message: "Unexpected error occurred.".to_string(),
                };
            };

            if stage == spec.terminal_stage() {
                let rows = spec
                    .schema()
                    .specs()
                    .iter()
                    .map(|field| SummaryRow {
                        label: field.label.clone(),
                        value: store.value(&field.name).display(),
                    })
                    .collect();
                StageView::Confirmation {
                    title: stage_spec.title.clone(),
                    rows,
                }
            } else {
                let inputs = stage_spec
                    .fields
                    .iter()
                    .filter_map(|name| {
                        spec.schema().get(name).map(|field| InputView {
                            name: field.name.clone(),
                            label: field.label.clone(),
                            value: store.value(&field.name),
                            error: store.error(&field.name).map(|e| e.message.clone()),
                        })
                    })
                    .collect();
                StageView::Form {
                    title: stage_spec.title.clone(),
                    stage,
                    stage_count: spec.stage_count(),
                    inputs,
                    back_steps_within_flow: stage > 0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldSchema, FieldSpec, FieldStore, FieldValue, Rule};
    use crate::flow::{FlowBuilder, StageSpec};
    use pretty_assertions::assert_eq;

    fn flow() -> FlowSpec {
        let schema = FieldSchema::new()
            .field(FieldSpec::new("name", "Name").required())
            .field(
                FieldSpec::new("contact", "Contact number")
                    .required()
                    .with_rule(Rule::contact_number()),
            );
        FlowBuilder::new("f", schema)
            .stage(StageSpec::new("basics", "Basics").with_field("name"))
            .unwrap()
            .stage(StageSpec::new("contact", "Contact").with_field("contact"))
            .unwrap()
            .confirmation("confirm", "Review")
            .unwrap()
    }

    #[test]
    fn test_render_form_stage() {
        let spec = flow();
        let mut store = FieldStore::new(spec.schema().clone());
        store.set_value("name", FieldValue::text("Ana"));

        let view = render(&spec, &FlowPhase::Editing, 0, &store);
        match view {
            StageView::Form {
                title,
                stage,
                stage_count,
                inputs,
                back_steps_within_flow,
            } => {
                assert_eq!(title, "Basics");
                assert_eq!(stage, 0);
                assert_eq!(stage_count, 3);
                assert_eq!(inputs.len(), 1);
                assert_eq!(inputs[0].value, FieldValue::text("Ana"));
                assert!(inputs[0].error.is_none());
                assert!(!back_steps_within_flow);
            }
            other => panic!("expected form view, got {other:?}"),
        }
    }

    #[test]
    fn test_render_shows_committed_error() {
        let spec = flow();
        let mut store = FieldStore::new(spec.schema().clone());
        store.set_value("contact", FieldValue::text("123"));

        let view = render(&spec, &FlowPhase::Editing, 1, &store);
        let StageView::Form { inputs, .. } = view else {
            panic!("expected form view");
        };
        assert!(inputs[0].error.as_deref().unwrap().contains("contact number"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let spec = flow();
        let store = FieldStore::new(spec.schema().clone());

        let first = render(&spec, &FlowPhase::Editing, 0, &store);
        let second = render(&spec, &FlowPhase::Editing, 0, &store);
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_confirmation_summary() {
        let spec = flow();
        let mut store = FieldStore::new(spec.schema().clone());
        store.set_value("name", FieldValue::text("Ana"));
        store.set_value("contact", FieldValue::text("09123456789"));

        let view = render(&spec, &FlowPhase::Editing, spec.terminal_stage(), &store);
        let StageView::Confirmation { title, rows } = view else {
            panic!("expected confirmation view");
        };
        assert_eq!(title, "Review");
        assert_eq!(
            rows,
            vec![
                SummaryRow {
                    label: "Name".to_string(),
                    value: "Ana".to_string()
                },
                SummaryRow {
                    label: "Contact number".to_string(),
                    value: "09123456789".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_render_phase_screens() {
        let spec = flow();
        let store = FieldStore::new(spec.schema().clone());

        assert_eq!(
            render(&spec, &FlowPhase::Submitting, 2, &store),
            StageView::Submitting
        );
        assert_eq!(
            render(&spec, &FlowPhase::Succeeded, 2, &store),
            StageView::Success
        );
        let failed = FlowPhase::Failed {
            message: "Server unreachable.".to_string(),
        };
        assert_eq!(
            render(&spec, &failed, 2, &store),
            StageView::Failure {
                message: "Server unreachable.".to_string()
            }
        );
    }
}
