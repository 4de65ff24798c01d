//! Flow definition and the staged form controller.
//!
//! A flow is a finite, linearly ordered sequence of stages. Each stage
//! names the fields it edits; the last stage is always the read-only
//! confirmation stage whose confirm action triggers the terminal
//! submission.

mod controller;
mod cursor;
mod guard;
mod render;
mod spec;


pub use controller::{AdvanceOutcome, FlowController, FlowPhase};
pub use cursor::StageCursor;
pub use guard::TransitionGuard;
pub use render::{InputView, StageView, SummaryRow};
pub use spec::{FlowBuilder, FlowSpec, StageSpec};
