//! The matcher: tier bucketing and the per-tier pairing workers.

use std::sync::Arc;

use gomoku_protocol::{Codec, JsonCodec, Response, UserId};
use gomoku_room::RoomManager;
use gomoku_session::ConnectionRegistry;
use gomoku_store::UserStore;

use crate::{LobbyError, MatchQueue};

/// Scores below this are bronze.
pub const BRONZE_CEILING: i64 = 1000;
/// Scores in `[BRONZE_CEILING, SILVER_CEILING)` are silver; above, gold.
pub const SILVER_CEILING: i64 = 3000;

/// A matchmaking skill bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    /// Buckets a score. Evaluated once, when the player enqueues — a score
    /// change while waiting does not move them between tiers.
    pub fn for_score(score: i64) -> Self {
        if score < BRONZE_CEILING {
            Tier::Bronze
        } else if score < SILVER_CEILING {
            Tier::Silver
        } else {
            Tier::Gold
        }
    }

    const ALL: [Tier; 3] = [Tier::Bronze, Tier::Silver, Tier::Gold];

    fn index(self) -> usize {
        match self {
            Tier::Bronze => 0,
            Tier::Silver => 1,
            Tier::Gold => 2,
        }
    }
}

struct Inner {
    queues: [MatchQueue; 3],
    registry: ConnectionRegistry,
    rooms: RoomManager,
    store: Arc<dyn UserStore>,
    codec: JsonCodec,
}

/// Pairs waiting players into rooms, one worker task per tier.
///
/// Cheap to clone; the workers hold clones of the same inner state.
/// Workers outlive any particular caller — they are spawned in
/// [`Matcher::new`] and run for the life of the process.
#[derive(Clone)]
pub struct Matcher {
    inner: Arc<Inner>,
}

impl Matcher {
    /// Creates the matcher and spawns the three tier workers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        registry: ConnectionRegistry,
        rooms: RoomManager,
        store: Arc<dyn UserStore>,
    ) -> Self {
        let matcher = Self {
            inner: Arc::new(Inner {
                queues: [MatchQueue::new(), MatchQueue::new(), MatchQueue::new()],
                registry,
                rooms,
                store,
                codec: JsonCodec,
            }),
        };

        for tier in Tier::ALL {
            let worker = matcher.clone();
            tokio::spawn(async move { worker.run_tier(tier).await });
        }
        tracing::info!("matchmaking workers started");

        matcher
    }

    fn queue(&self, tier: Tier) -> &MatchQueue {
        &self.inner.queues[tier.index()]
    }

    /// Enqueues a player in the tier matching their current score.
    ///
    /// # Errors
    /// Propagates the store failure if the score lookup fails; the player
    /// is not enqueued in that case.
    pub async fn add(&self, uid: UserId) -> Result<(), LobbyError> {
        let profile = self.inner.store.lookup_by_uid(uid).map_err(|e| {
            tracing::warn!(%uid, error = %e, "score lookup failed, not enqueueing");
            e
        })?;

        let tier = Tier::for_score(profile.score);
        self.queue(tier).push(uid).await;
        tracing::info!(%uid, score = profile.score, ?tier, "queued for matchmaking");
        Ok(())
    }

    /// Removes a player from whichever tier queue currently holds them.
    /// Idempotent if they are not queued anywhere.
    pub async fn remove(&self, uid: UserId) {
        for queue in &self.inner.queues {
            queue.remove(uid).await;
        }
        tracing::debug!(%uid, "dequeued from matchmaking");
    }

    /// One tier's pairing loop. Never returns.
    async fn run_tier(self, tier: Tier) {
        let queue = self.queue(tier);
        tracing::debug!(?tier, "tier worker running");

        loop {
            // 1. Park until at least two players wait here.
            while queue.len().await < 2 {
                queue.wait().await;
            }

            // 2. Take the two oldest waiters. The queue can drain between
            //    the length check and the pops, so both are fallible.
            let Some(first) = queue.pop().await else {
                continue;
            };
            let Some(second) = queue.pop().await else {
                queue.push(first).await;
                continue;
            };

            // 3. Both must still be reachable in the lobby. Whoever vanished
            //    is dropped; the survivor goes to the back of the queue and
            //    is paired on a later cycle.
            let Some(first_conn) = self.inner.registry.conn_from_lobby(first).await
            else {
                tracing::debug!(uid = %first, "matched player left lobby, requeueing opponent");
                queue.push(second).await;
                continue;
            };
            let Some(second_conn) = self.inner.registry.conn_from_lobby(second).await
            else {
                tracing::debug!(uid = %second, "matched player left lobby, requeueing opponent");
                queue.push(first).await;
                continue;
            };

            // 4. Ask for a room. A failure here means one of the two left
            //    the lobby between step 3 and now — requeue both.
            let rid = match self.inner.rooms.create_room_for_pair(first, second).await {
                Ok(rid) => rid,
                Err(e) => {
                    tracing::debug!(error = %e, "room creation failed, requeueing pair");
                    queue.push(first).await;
                    queue.push(second).await;
                    continue;
                }
            };

            // 5. Tell both players through their lobby connections.
            match self.inner.codec.encode(&Response::MatchSuccess { result: true }) {
                Ok(payload) => {
                    first_conn.send(&payload);
                    second_conn.send(&payload);
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode match notification");
                }
            }
            tracing::info!(%rid, a = %first, b = %second, ?tier, "match made");
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
