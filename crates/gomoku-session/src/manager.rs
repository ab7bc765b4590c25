//! The session manager: session table, uid index, and expiry timers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gomoku_protocol::{SessionId, UserId};
use gomoku_transport::{set_timer, TimerHandle};
use tokio::sync::Mutex;

use crate::{Expiry, LoginState, Session, SessionError};

/// One row of the session table: the session snapshot plus the timer (if
/// any) currently governing its destruction.
struct Entry {
    session: Session,
    /// `None` means "forever": nothing is scheduled to remove this session.
    /// At most one live timer is associated with a session at a time.
    timer: Option<TimerHandle>,
}

struct Table {
    next_sid: u64,
    sessions: HashMap<SessionId, Entry>,
    /// uid → most recent sid, kept in sync with `sessions` so lifecycle
    /// callbacks that only know a uid can reach the session.
    by_uid: HashMap<UserId, SessionId>,
}

/// Tracks every live session and owns their expiry timers.
///
/// Cheap to clone — clones share the same table. The manager is cloned into
/// every timer callback, which is how a deferred removal finds its way back
/// to the table.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Mutex<Table>>,
}

impl SessionManager {
    /// Creates an empty session manager.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Table {
                next_sid: 1,
                sessions: HashMap::new(),
                by_uid: HashMap::new(),
            })),
        }
    }

    /// Allocates a fresh sid and stores a new session for `uid`.
    ///
    /// The new session has no timer — it lives until a finite expiry is
    /// set or it is removed explicitly.
    pub async fn create_session(&self, uid: UserId, login: LoginState) -> Session {
        let mut table = self.inner.lock().await;
        let sid = SessionId(table.next_sid);
        table.next_sid += 1;

        let session = Session { sid, uid, login };
        table.sessions.insert(sid, Entry { session, timer: None });
        table.by_uid.insert(uid, sid);

        tracing::info!(%sid, %uid, "session created");
        session
    }

    /// Looks up a session by its token.
    pub async fn get_session(&self, sid: SessionId) -> Option<Session> {
        let table = self.inner.lock().await;
        table.sessions.get(&sid).map(|e| e.session)
    }

    /// Returns the most recent session token issued to `uid`, if any.
    pub async fn sid_for_uid(&self, uid: UserId) -> Option<SessionId> {
        let table = self.inner.lock().await;
        table.by_uid.get(&uid).copied()
    }

    /// Looks up a session and checks that its player is logged in.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if the token is unknown (or expired),
    /// [`SessionError::NotLoggedIn`] otherwise.
    pub async fn authorize(&self, sid: SessionId) -> Result<Session, SessionError> {
        let session = self
            .get_session(sid)
            .await
            .ok_or(SessionError::NotFound(sid))?;
        if !session.is_logged_in() {
            return Err(SessionError::NotLoggedIn(sid));
        }
        Ok(session)
    }

    /// Unconditionally deletes the session. Safe to call on an id that is
    /// already gone.
    pub async fn remove_session(&self, sid: SessionId) {
        let mut table = self.inner.lock().await;
        if let Some(entry) = table.sessions.remove(&sid) {
            // Drop the uid index entry only if it still points here — a
            // newer session for the same player must keep its mapping.
            if table.by_uid.get(&entry.session.uid) == Some(&sid) {
                table.by_uid.remove(&entry.session.uid);
            }
            tracing::info!(%sid, uid = %entry.session.uid, "session removed");
        }
    }

    /// Sets what governs this session's destruction from now on.
    ///
    /// Contract: exactly one pending scheduled action governs a session's
    /// destruction at any time. The four cases:
    ///
    /// 1. no timer, `Forever` — nothing to do.
    /// 2. no timer, `After(d)` — schedule a deferred removal, keep its handle.
    /// 3. timer set, `Forever` — cancel it, clear the handle, and schedule a
    ///    zero-delay re-insertion of the session.
    /// 4. timer set, `After(d)` — cancel, clear, zero-delay re-insertion,
    ///    then schedule the new removal and keep its handle.
    ///
    /// The re-insertion in cases 3 and 4 is the load-bearing piece:
    /// cancelling a timer does not guarantee an already-in-flight callback
    /// is suppressed, so the old timer may still remove the session after
    /// this call returns. The deferred re-add turns that into a transient
    /// removal that immediately heals, rather than a session lost while its
    /// player is sitting in the lobby.
    ///
    /// Unknown `sid` is a no-op.
    pub async fn set_expiry(&self, sid: SessionId, expiry: Expiry) {
        let mut table = self.inner.lock().await;
        let Some(entry) = table.sessions.get_mut(&sid) else {
            return;
        };

        match (entry.timer.take(), expiry) {
            // 1. Nothing scheduled, nothing wanted.
            (None, Expiry::Forever) => {}

            // 2. Arm the first timer.
            (None, Expiry::After(delay)) => {
                entry.timer = Some(self.schedule_removal(sid, delay));
            }

            // 3. Pin: cancel and heal a possibly in-flight removal.
            (Some(old), Expiry::Forever) => {
                old.cancel();
                self.schedule_reinsert(entry.session, None);
                tracing::debug!(%sid, "session pinned");
            }

            // 4. Re-arm: cancel, heal, then schedule the replacement.
            (Some(old), Expiry::After(delay)) => {
                old.cancel();
                let fresh = self.schedule_removal(sid, delay);
                self.schedule_reinsert(entry.session, Some(fresh.clone()));
                entry.timer = Some(fresh);
            }
        }
    }

    /// Schedules `remove_session(sid)` after `delay`. The returned handle's
    /// cancellation token is checked inside the deferred callback, right
    /// before the removal runs.
    fn schedule_removal(&self, sid: SessionId, delay: Duration) -> TimerHandle {
        let manager = self.clone();
        set_timer(delay, async move {
            tracing::debug!(%sid, "expiry timer fired");
            manager.remove_session(sid).await;
        })
    }

    /// Schedules a zero-delay re-insertion of `session`, carrying the timer
    /// that should govern it afterwards. Insert-if-absent: if the session
    /// was never removed (the usual case), this is a no-op.
    fn schedule_reinsert(&self, session: Session, timer: Option<TimerHandle>) {
        let manager = self.clone();
        set_timer(Duration::ZERO, async move {
            let mut table = manager.inner.lock().await;
            let sid = session.sid;
            let uid = session.uid;
            table
                .sessions
                .entry(sid)
                .or_insert(Entry { session, timer });
            table.by_uid.entry(uid).or_insert(sid);
        });
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.sessions.len()
    }

    /// Returns `true` if no sessions are live.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.sessions.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
