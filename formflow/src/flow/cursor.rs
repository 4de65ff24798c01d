//! The stage cursor.

/// Ordinal position within a flow's stage sequence.
///
/// The invariant `0 <= stage < stage_count` holds at all times; the
/// position changes only by one step at a time or by a reset to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCursor {
    stage: usize,
    stage_count: usize,
}

impl StageCursor {
    /// Creates a cursor at stage zero.
    ///
    /// A zero `stage_count` is clamped to one so the invariant holds;
    /// the flow builder already rejects empty flows.
    #[must_use]
    pub fn new(stage_count: usize) -> Self {
        Self {
            stage: 0,
            stage_count: stage_count.max(1),
        }
    }

    /// Returns the current stage index.
    #[must_use]
    pub fn stage(&self) -> usize {
        self.stage
    }

    /// Returns the total number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// Returns true if the cursor is at the first stage.
    #[must_use]
    pub fn at_start(&self) -> bool {
        self.stage == 0
    }

    /// Returns true if the cursor is at the terminal stage.
    #[must_use]
    pub fn at_terminal(&self) -> bool {
        self.stage == self.stage_count - 1
    }

    /// Moves forward one stage. Returns false at the terminal stage.
    pub fn advance(&mut self) -> bool {
        if self.at_terminal() {
            return false;
        }
        self.stage += 1;
        true
    }

    /// Moves back one stage. Returns false at stage zero.
    pub fn retreat(&mut self) -> bool {
        if self.at_start() {
            return false;
        }
        self.stage -= 1;
        true
    }

    /// Resets the cursor to stage zero.
    pub fn reset(&mut self) {
        self.stage = 0;
    }
}
