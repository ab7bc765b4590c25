//! Room manager: allocates room ids, owns the room arena, routes by player.

use std::collections::HashMap;
use std::sync::Arc;

use gomoku_protocol::{RoomId, UserId};
use gomoku_session::ConnectionRegistry;
use gomoku_store::UserStore;
use tokio::sync::Mutex;

use crate::{Room, RoomError};

struct Indexes {
    /// Strictly increasing; ids are never reused.
    next_rid: u64,
    /// The arena: rid → owned room.
    rooms: HashMap<RoomId, Arc<Mutex<Room>>>,
    /// Back-reference: uid → rid. A uid is present here iff its room is
    /// present in `rooms` — the two maps mutate together under one lock.
    users: HashMap<UserId, RoomId>,
}

/// Creates, finds, and destroys rooms.
///
/// Cheap to clone; clones share the same indexes. Cross-component checks
/// (lobby presence) happen before the index lock is taken, and room method
/// calls happen on a cloned `Arc` after it is released — the index lock
/// only ever covers map mutation.
#[derive(Clone)]
pub struct RoomManager {
    registry: ConnectionRegistry,
    store: Arc<dyn UserStore>,
    state: Arc<Mutex<Indexes>>,
}

impl RoomManager {
    /// Creates a manager with no rooms.
    pub fn new(registry: ConnectionRegistry, store: Arc<dyn UserStore>) -> Self {
        Self {
            registry,
            store,
            state: Arc::new(Mutex::new(Indexes {
                next_rid: 1,
                rooms: HashMap::new(),
                users: HashMap::new(),
            })),
        }
    }

    /// Creates a room for a matched pair: `uid1` plays white, `uid2` black.
    ///
    /// Fails if the two ids are the same player or if either is no longer
    /// registered in the lobby (they may have disconnected between being
    /// matched and the room being created — the matchmaker requeues on
    /// this failure).
    pub async fn create_room_for_pair(
        &self,
        uid1: UserId,
        uid2: UserId,
    ) -> Result<RoomId, RoomError> {
        if uid1 == uid2 {
            return Err(RoomError::DuplicatePlayer(uid1));
        }
        for uid in [uid1, uid2] {
            if !self.registry.in_lobby(uid).await {
                return Err(RoomError::NotInLobby(uid));
            }
        }

        let mut state = self.state.lock().await;
        let rid = RoomId(state.next_rid);
        state.next_rid += 1;

        let room = Room::new(
            rid,
            uid1,
            uid2,
            self.registry.clone(),
            Arc::clone(&self.store),
        );
        state.rooms.insert(rid, Arc::new(Mutex::new(room)));
        state.users.insert(uid1, rid);
        state.users.insert(uid2, rid);

        tracing::info!(%rid, white = %uid1, black = %uid2, "room created");
        Ok(rid)
    }

    /// Finds a room by its id.
    pub async fn room_by_rid(&self, rid: RoomId) -> Option<Arc<Mutex<Room>>> {
        self.state.lock().await.rooms.get(&rid).cloned()
    }

    /// Finds the room a player currently occupies.
    pub async fn room_by_uid(&self, uid: UserId) -> Option<Arc<Mutex<Room>>> {
        let state = self.state.lock().await;
        let rid = state.users.get(&uid)?;
        state.rooms.get(rid).cloned()
    }

    /// Removes every index entry for the given room. Safe to call on an id
    /// that is already gone.
    pub async fn destroy_room(&self, rid: RoomId) {
        let mut state = self.state.lock().await;
        if state.rooms.remove(&rid).is_some() {
            state.users.retain(|_, r| *r != rid);
            tracing::info!(%rid, "room destroyed");
        }
    }

    /// A player is leaving whatever room they are in: delegates to the
    /// room's exit handling and destroys the room once its occupant count
    /// reaches zero. This is the only path by which rooms are collected —
    /// an empty room is never left registered.
    pub async fn remove_user(&self, uid: UserId) {
        let Some(room) = self.room_by_uid(uid).await else {
            return;
        };

        let (rid, empty) = {
            let mut room = room.lock().await;
            room.handle_exit(uid).await;
            (room.rid(), room.player_count() == 0)
        };

        if empty {
            self.destroy_room(rid).await;
        }
    }

    /// Number of registered rooms.
    pub async fn room_count(&self) -> usize {
        self.state.lock().await.rooms.len()
    }
}
