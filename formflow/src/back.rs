//! Back-navigation interception.
//!
//! The platform's hardware back event is dispatched to registered
//! handlers in LIFO order (the most recently focused screen answers
//! first). A handler either consumes the event or lets it fall through
//! to the enclosing navigation system.
//!
//! Registration returns a [`BackSubscription`] guard; dropping it
//! deregisters the handler, so a controller that has lost focus or been
//! unmounted can never intercept back events belonging to other
//! screens.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// The result of offering a back event to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// The handler consumed the event; default navigation is prevented.
    Consumed,
    /// The handler declined; the event falls through.
    PassThrough,
}

type Handler = Box<dyn Fn() -> BackAction + Send + Sync>;

struct Registration {
    id: u64,
    handler: Handler,
}

#[derive(Default)]
struct DispatcherState {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

/// Registry of back handlers dispatched in LIFO order.
#[derive(Clone, Default)]
pub struct BackDispatcher {
    state: Arc<DispatcherState>,
}

impl BackDispatcher {
    /// Creates a new dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler, returning its subscription guard.
    ///
    /// The handler stays registered exactly as long as the guard lives.
    #[must_use]
    pub fn subscribe<F>(&self, handler: F) -> BackSubscription
    where
        F: Fn() -> BackAction + Send + Sync + 'static,
    {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state.registrations.write().push(Registration {
            id,
            handler: Box::new(handler),
        });
        BackSubscription {
            state: Arc::downgrade(&self.state),
            id,
        }
    }

    /// Dispatches a back event.
    ///
    /// Handlers are offered the event newest-first; the first one to
    /// consume it wins. With no live handlers, or none consuming, the
    /// event passes through to default navigation.
    pub fn dispatch(&self) -> BackAction {
        let registrations = self.state.registrations.read();
        for registration in registrations.iter().rev() {
            if (registration.handler)() == BackAction::Consumed {
                debug!(handler = registration.id, "back event consumed");
                return BackAction::Consumed;
            }
        }
        BackAction::PassThrough
    }

    /// Returns the number of live handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.state.registrations.read().len()
    }
}

impl std::fmt::Debug for BackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackDispatcher")
            .field("handler_count", &self.handler_count())
            .finish()
    }
}

/// Scoped registration guard for one back handler.
///
/// Deregisters on drop.
pub struct BackSubscription {
    state: Weak<DispatcherState>,
    id: u64,
}

impl BackSubscription {
    /// Deregisters the handler now instead of at end of scope.
    pub fn unsubscribe(self) {
        // Drop does the work.
        drop(self);
    }
}

impl Drop for BackSubscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.registrations.write().retain(|r| r.id != self.id);
        }
    }
}

impl std::fmt::Debug for BackSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackSubscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dispatch_with_no_handlers_passes_through() {
        let dispatcher = BackDispatcher::new();
        assert_eq!(dispatcher.dispatch(), BackAction::PassThrough);
    }

    #[test]
    fn test_lifo_dispatch_order() {
        let dispatcher = BackDispatcher::new();
        let winner = Arc::new(RwLock::new(String::new()));

        let w1 = winner.clone();
        let _outer = dispatcher.subscribe(move || {
            *w1.write() = "outer".to_string();
            BackAction::Consumed
        });

        let w2 = winner.clone();
        let _inner = dispatcher.subscribe(move || {
            *w2.write() = "inner".to_string();
            BackAction::Consumed
        });

        assert_eq!(dispatcher.dispatch(), BackAction::Consumed);
        assert_eq!(*winner.read(), "inner");
    }

    #[test]
    fn test_pass_through_falls_to_older_handler() {
        let dispatcher = BackDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let _outer = dispatcher.subscribe(move || {
            h.fetch_add(1, Ordering::SeqCst);
            BackAction::Consumed
        });
        let _inner = dispatcher.subscribe(|| BackAction::PassThrough);

        assert_eq!(dispatcher.dispatch(), BackAction::Consumed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_deregisters() {
        let dispatcher = BackDispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        {
            let h = hits.clone();
            let _sub = dispatcher.subscribe(move || {
                h.fetch_add(1, Ordering::SeqCst);
                BackAction::Consumed
            });
            assert_eq!(dispatcher.handler_count(), 1);
        }

        assert_eq!(dispatcher.handler_count(), 0);
        assert_eq!(dispatcher.dispatch(), BackAction::PassThrough);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let dispatcher = BackDispatcher::new();
        let sub = dispatcher.subscribe(|| BackAction::Consumed);
        assert_eq!(dispatcher.handler_count(), 1);

        sub.unsubscribe();
        assert_eq!(dispatcher.handler_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_dispatcher_is_harmless() {
        let sub = {
            let dispatcher = BackDispatcher::new();
            dispatcher.subscribe(|| BackAction::Consumed)
        };
        // The dispatcher state is gone; dropping must not panic.
        drop(sub);
    }
}
