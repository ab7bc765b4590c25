//! Cancellable delayed actions.
//!
//! The session manager schedules deferred work (expiry, re-insertion) with
//! [`set_timer`]. Cancellation is a token, not a guarantee: [`TimerHandle::cancel`]
//! flips a flag that the timer task checks *after* its sleep finishes. A
//! cancel that lands once the check has passed does not stop the action —
//! callers that need stronger guarantees must sequence a corrective action
//! of their own (which is exactly what the session expiry protocol does).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Handle to a scheduled action. Dropping the handle does not cancel it;
/// clones share the same cancellation token.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Requests cancellation. Best-effort: an action whose cancellation
    /// check already passed will still run.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Schedules `action` to run after `delay` on the tokio runtime.
///
/// A `delay` of zero still defers the action to a later poll of the
/// runtime — it never runs inline in the caller.
pub fn set_timer<F>(delay: Duration, action: F) -> TimerHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if !flag.load(Ordering::SeqCst) {
            action.await;
        }
    });

    TimerHandle { cancelled }
}

// =========================================================================
// Tests
// =========================================================================
