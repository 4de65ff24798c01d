//! Flow event sinks.
//!
//! Controllers emit events at every transition so hosts can log,
//! analyze, or assert on flow behavior without instrumenting the
//! controller itself.

use tracing::{debug, info, Level};

/// An event emitted by a flow controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// The cursor moved forward.
    Advanced {
        /// Stage moved from.
        from: usize,
        /// Stage moved to.
        to: usize,
    },
    /// A forward transition was blocked by validation.
    Blocked {
        /// The stage that stayed active.
        stage: usize,
        /// Number of committed field errors.
        error_count: usize,
    },
    /// The cursor moved backward.
    Retreated {
        /// Stage moved from.
        from: usize,
        /// Stage moved to.
        to: usize,
    },
    /// A back event was consumed mid-flow.
    BackConsumed {
        /// The stage at dispatch time.
        stage: usize,
    },
    /// A back event fell through to default navigation.
    BackPassedThrough,
    /// A submission attempt began.
    SubmissionStarted,
    /// A submission attempt succeeded.
    SubmissionSucceeded,
    /// A submission attempt failed with a mapped message.
    SubmissionFailed {
        /// The user-facing message.
        message: String,
    },
}

impl FlowEvent {
    /// The event name, dot-namespaced.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Advanced { .. } => "flow.advanced",
            Self::Blocked { .. } => "flow.blocked",
            Self::Retreated { .. } => "flow.retreated",
            Self::BackConsumed { .. } => "flow.back_consumed",
            Self::BackPassedThrough => "flow.back_passed_through",
            Self::SubmissionStarted => "submission.started",
            Self::SubmissionSucceeded => "submission.succeeded",
            Self::SubmissionFailed { .. } => "submission.failed",
        }
    }
}

/// Receives flow events.
///
/// Sinks must never fail; errors are logged and suppressed.
pub trait FlowEventSink: Send + Sync {
    /// Receives one event.
    fn emit(&self, event: FlowEvent);
}

/// Discards all events. The default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl FlowEventSink for NoOpEventSink {
    fn emit(&self, _event: FlowEvent) {}
}

/// Logs events through the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a sink logging at the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl FlowEventSink for LoggingEventSink {
    fn emit(&self, event: FlowEvent) {
        if self.level == Level::DEBUG {
            debug!(event = event.name(), detail = ?event, "flow event");
        } else {
            info!(event = event.name(), detail = ?event, "flow event");
        }
    }
}

/// Collects events for assertions in tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<FlowEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<FlowEvent> {
        self.events.read().clone()
    }

    /// Returns the collected event names, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.read().iter().map(FlowEvent::name).collect()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl FlowEventSink for CollectingEventSink {
    fn emit(&self, event: FlowEvent) {
        self.events.write().push(event);
    }
}
