//! Guard predicates for gating transitions.
//!
//! Guards are pure boolean functions over a snapshot of the session. The
//! dispatcher uses them to decide whether a control is live; a failed guard
//! means the control is inert, never an error.

use super::timeline::TimelineKind;
use std::fmt;
use std::sync::Arc;

/// Pure predicate over a context value.
///
/// # Example
///
/// ```rust
/// use slidecast::core::{CaptureContext, Guard, TimelineKind};
///
/// let guard = Guard::capture_allowed();
///
/// assert!(guard.check(&CaptureContext {
///     kind: TimelineKind::Default,
///     server_connected: true,
/// }));
/// assert!(!guard.check(&CaptureContext {
///     kind: TimelineKind::Recorded,
///     server_connected: true,
/// }));
/// ```
pub struct Guard<C> {
    predicate: Arc<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }

    /// Guard that passes only when both guards pass.
    pub fn and(self, other: Guard<C>) -> Self
    where
        C: 'static,
    {
        let (left, right) = (self.predicate, other.predicate);
        Guard {
            predicate: Arc::new(move |c: &C| left(c) && right(c)),
        }
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Guard {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

/// What the record and live controls are checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureContext {
    pub kind: TimelineKind,
    pub server_connected: bool,
}

impl Guard<CaptureContext> {
    /// Capture needs a writable timeline and a reachable server.
    pub fn capture_allowed() -> Self {
        Guard::new(|c: &CaptureContext| c.kind == TimelineKind::Default && c.server_connected)
    }
}
