//! The staged form controller.

use super::cursor::StageCursor;
use super::guard::TransitionGuard;
use super::render::{render, StageView};
use super::spec::FlowSpec;
use crate::back::BackAction;
use crate::errors::{FlowValidationError, FormflowError};
use crate::events::{FlowEvent, FlowEventSink, NoOpEventSink};
use crate::fields::{FieldStore, FieldValue, Revalidate};
use crate::submit::{LivenessToken, SubmissionOutcome, SubmitRequest, TerminalSubmission};
use std::sync::Arc;
use tracing::debug;

/// The controller's presentation phase.
///
/// One tagged union instead of independent loading/error/success
/// booleans: exactly one phase is active at any time, and rendering
/// matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowPhase {
    /// The user is moving through the stages.
    Editing,
    /// The terminal submission is in flight.
    Submitting,
    /// The submission succeeded; the success screen is shown.
    Succeeded,
    /// The submission failed; the failure screen is shown.
    Failed {
        /// The mapped user-facing message.
        message: String,
    },
}

/// The result of a forward-transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The cursor moved to the next stage.
    Advanced,
    /// Validation failed; the cursor stayed put and error text is now
    /// committed for the renderer.
    Blocked,
    /// Already at the confirmation stage; confirm submits instead.
    AtTerminal,
}

/// Composes the field store, stage cursor, transition guard, and
/// terminal submission for one flow instance.
///
/// The controller owns its field store for its whole life; values are
/// discarded when it is dropped. Dropping also disposes the liveness
/// token, so submission continuations still in flight can no longer
/// mutate shared state.
pub struct FlowController {
    spec: FlowSpec,
    store: FieldStore,
    cursor: StageCursor,
    guard: TransitionGuard,
    phase: FlowPhase,
    events: Arc<dyn FlowEventSink>,
    liveness: LivenessToken,
}

impl FlowController {
    /// Creates a controller at stage zero with defaulted fields.
    #[must_use]
    pub fn new(spec: FlowSpec) -> Self {
        let store = FieldStore::new(spec.schema().clone());
        let cursor = StageCursor::new(spec.stage_count());
        Self {
            spec,
            store,
            cursor,
            guard: TransitionGuard::new(),
            phase: FlowPhase::Editing,
            events: Arc::new(NoOpEventSink),
            liveness: LivenessToken::new(),
        }
    }

    /// Attaches an event sink.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn FlowEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Sets the store's revalidation mode.
    #[must_use]
    pub fn with_revalidate(mut self, mode: Revalidate) -> Self {
        self.store.set_mode(mode);
        self
    }

    /// Returns the flow specification.
    #[must_use]
    pub fn spec(&self) -> &FlowSpec {
        &self.spec
    }

    /// Returns the field store.
    #[must_use]
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// Returns the current stage index.
    #[must_use]
    pub fn stage(&self) -> usize {
        self.cursor.stage()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> &FlowPhase {
        &self.phase
    }

    /// Returns a handle to the controller's liveness token.
    ///
    /// Hosts hand this to work whose continuation might outlive the
    /// controller.
    #[must_use]
    pub fn liveness(&self) -> LivenessToken {
        self.liveness.clone()
    }

    /// Writes a field value through the store.
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        self.store.set_value(name, value);
    }

    /// Attempts to move forward one stage.
    ///
    /// The transition guard validates the active stage's fields and
    /// commits the result; on failure the cursor stays put.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.phase != FlowPhase::Editing {
            return AdvanceOutcome::Blocked;
        }
        if self.cursor.at_terminal() {
            return AdvanceOutcome::AtTerminal;
        }

        let stage = self.cursor.stage();
        if self.guard.can_advance(&self.spec, stage, &mut self.store) {
            self.cursor.advance();
            self.events.emit(FlowEvent::Advanced {
                from: stage,
                to: self.cursor.stage(),
            });
            AdvanceOutcome::Advanced
        } else {
            self.events.emit(FlowEvent::Blocked {
                stage,
                error_count: self.store.errors().len(),
            });
            AdvanceOutcome::Blocked
        }
    }

    /// Moves back one stage, leaving all field values unchanged.
    ///
    /// Returns false at stage zero.
    pub fn retreat(&mut self) -> bool {
        if self.phase != FlowPhase::Editing {
            return false;
        }
        let from = self.cursor.stage();
        if self.cursor.retreat() {
            self.events.emit(FlowEvent::Retreated {
                from,
                to: self.cursor.stage(),
            });
            true
        } else {
            false
        }
    }

    /// Handles a platform back event.
    ///
    /// Mid-flow the event is consumed and the cursor steps backward; at
    /// stage zero it passes through to the enclosing navigation.
    /// During an in-flight submission the event is consumed and
    /// ignored; on the success and failure screens it passes through
    /// (those screens offer a single explicit action).
    pub fn handle_back(&mut self) -> BackAction {
        match self.phase {
            FlowPhase::Editing => {
                if self.cursor.at_start() {
                    self.events.emit(FlowEvent::BackPassedThrough);
                    BackAction::PassThrough
                } else {
                    let stage = self.cursor.stage();
                    self.retreat();
                    self.events.emit(FlowEvent::BackConsumed { stage });
                    BackAction::Consumed
                }
            }
            FlowPhase::Submitting => BackAction::Consumed,
            FlowPhase::Succeeded | FlowPhase::Failed { .. } => {
                self.events.emit(FlowEvent::BackPassedThrough);
                BackAction::PassThrough
            }
        }
    }

    /// Renders the screen for the current phase and stage.
    #[must_use]
    pub fn view(&self) -> StageView {
        render(&self.spec, &self.phase, self.cursor.stage(), &self.store)
    }

    /// Runs the terminal submission.
    ///
    /// Valid only while editing at the confirmation stage. A whole-form
    /// validation failure keeps the phase at `Editing` with errors
    /// committed; otherwise the phase moves through `Submitting` to
    /// `Succeeded` or `Failed`.
    ///
    /// # Errors
    ///
    /// Returns an error when called off the confirmation stage or
    /// outside the editing phase, when the session token is missing, or
    /// when the controller was disposed before the result arrived. No
    /// shared state was updated, and the phase returns to `Editing` so
    /// the controller stays actionable.
    pub async fn submit(
        &mut self,
        submission: &TerminalSubmission,
        request: &SubmitRequest,
    ) -> Result<&FlowPhase, FormflowError> {
        if self.phase != FlowPhase::Editing {
            return Err(FormflowError::Internal(
                "submit is only valid while editing".to_string(),
            ));
        }
        if !self.cursor.at_terminal() {
            return Err(FlowValidationError::new(
                "submit before the confirmation stage",
            )
            .with_stages(vec![self
                .spec
                .stage(self.cursor.stage())
                .map(|s| s.name.clone())
                .unwrap_or_default()])
            .into());
        }

        if !self.guard.can_submit(&mut self.store) {
            debug!(errors = self.store.errors().len(), "submission blocked by validation");
            self.events.emit(FlowEvent::Blocked {
                stage: self.cursor.stage(),
                error_count: self.store.errors().len(),
            });
            return Ok(&self.phase);
        }

        self.phase = FlowPhase::Submitting;
        self.events.emit(FlowEvent::SubmissionStarted);

        let outcome = match submission.run(&self.store, request, &self.liveness).await {
            Ok(outcome) => outcome,
            Err(err) => {
                // A precondition violation must not strand the flow in
                // `Submitting`; back to the confirmation stage.
                self.phase = FlowPhase::Editing;
                return Err(err);
            }
        };

        match outcome {
            SubmissionOutcome::Success(_) => {
                self.phase = FlowPhase::Succeeded;
                self.events.emit(FlowEvent::SubmissionSucceeded);
            }
            SubmissionOutcome::Failure(err) => {
                let message = err.message().to_string();
                self.events.emit(FlowEvent::SubmissionFailed {
                    message: message.clone(),
                });
                self.phase = FlowPhase::Failed { message };
            }
            SubmissionOutcome::Pending => {
                // run() resolves every attempt; Pending is for hosts
                // tracking outcomes externally.
            }
        }

        Ok(&self.phase)
    }

    /// Returns from the failure screen to the confirmation stage.
    ///
    /// The retry action of the failure presentation; a no-op in any
    /// other phase.
    pub fn acknowledge_failure(&mut self) {
        if matches!(self.phase, FlowPhase::Failed { .. }) {
            self.phase = FlowPhase::Editing;
        }
    }

    /// Resets the cursor to stage zero and the phase to editing.
    ///
    /// Field values are kept; a fresh start means a fresh controller.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.phase = FlowPhase::Editing;
    }
}

impl Drop for FlowController {
    fn drop(&mut self) {
        self.liveness.dispose();
    }
}

impl std::fmt::Debug for FlowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowController")
            .field("flow", &self.spec.name())
            .field("stage", &self.cursor.stage())
            .field("phase", &self.phase)
            .finish()
    }
}
