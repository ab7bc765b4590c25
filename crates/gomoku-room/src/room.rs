//! A single two-player game room.

use std::sync::Arc;

use gomoku_protocol::{Codec, JsonCodec, Request, Response, RoomId, UserId};
use gomoku_session::ConnectionRegistry;
use gomoku_store::UserStore;

use crate::{Board, Cell};

/// Room lifecycle. One-way: once a game finishes it never reactivates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// The game is being played; moves mutate the board.
    Active,
    /// The game is decided; only exit handling is accepted.
    Finished,
}

/// One game between two players.
///
/// The room owns the board and the outcome logic, looks up both players'
/// room-context connections for broadcasting, and reports the final result
/// to the user store. It holds no lock of its own — the manager wraps every
/// room in a mutex, so all methods take `&mut self` and are serialized per
/// room even when both players send moves concurrently.
pub struct Room {
    rid: RoomId,
    status: RoomStatus,
    white_uid: UserId,
    black_uid: UserId,
    player_count: u8,
    board: Board,
    registry: ConnectionRegistry,
    store: Arc<dyn UserStore>,
    codec: JsonCodec,
}

impl Room {
    /// Creates an active room for a matched pair. `white` moves as white,
    /// `black` as black; both count as present.
    pub fn new(
        rid: RoomId,
        white: UserId,
        black: UserId,
        registry: ConnectionRegistry,
        store: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            rid,
            status: RoomStatus::Active,
            white_uid: white,
            black_uid: black,
            player_count: 2,
            board: Board::new(),
            registry,
            store,
            codec: JsonCodec,
        }
    }

    pub fn rid(&self) -> RoomId {
        self.rid
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn white_uid(&self) -> UserId {
        self.white_uid
    }

    pub fn black_uid(&self) -> UserId {
        self.black_uid
    }

    /// Occupants still accounted for (0, 1, or 2).
    pub fn player_count(&self) -> u8 {
        self.player_count
    }

    /// Read access to the board, mainly for assertions in tests.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Handles one in-room request and broadcasts the outcome to both
    /// players. Returns the response that was broadcast.
    ///
    /// A request carrying a room id other than this room's is rejected
    /// without further processing; an optype outside the room vocabulary is
    /// rejected as unknown.
    pub async fn handle_request(&mut self, req: &Request) -> Response {
        let resp = match req {
            Request::PutChess {
                room_id,
                uid,
                row,
                col,
            } => {
                if *room_id != self.rid {
                    Response::error("room id mismatch")
                } else {
                    self.handle_chess(*uid, *row, *col).await
                }
            }
            Request::Chat {
                room_id,
                uid,
                message,
            } => {
                if *room_id != self.rid {
                    Response::error("room id mismatch")
                } else {
                    self.handle_chat(*uid, message)
                }
            }
            _ => Response::error("unknown request"),
        };

        self.broadcast(&resp).await;
        resp
    }

    /// Builds a rejected move response: no mutation happened.
    fn reject_move(&self, uid: UserId, row: usize, col: usize, reason: &str) -> Response {
        Response::PutChess {
            result: false,
            reason: reason.to_string(),
            room_id: self.rid,
            uid,
            row,
            col,
            winner: UserId::NONE,
        }
    }

    /// Move handling.
    async fn handle_chess(&mut self, uid: UserId, row: usize, col: usize) -> Response {
        if uid != self.white_uid && uid != self.black_uid {
            return self.reject_move(uid, row, col, "not a player in this room");
        }
        if self.status == RoomStatus::Finished {
            return self.reject_move(uid, row, col, "game already finished");
        }

        // A mover whose opponent is no longer reachable in the room context
        // wins by forfeit; an unreachable mover forfeits to the opponent.
        // No board mutation either way.
        let absent_forfeit = if !self.registry.in_room(self.white_uid).await {
            Some(self.black_uid)
        } else if !self.registry.in_room(self.black_uid).await {
            Some(self.white_uid)
        } else {
            None
        };
        if let Some(winner) = absent_forfeit {
            self.conclude(winner).await;
            return Response::PutChess {
                result: true,
                reason: "opponent disconnected".to_string(),
                room_id: self.rid,
                uid,
                row,
                col,
                winner,
            };
        }

        if !self.board.in_range(row, col) {
            return self.reject_move(uid, row, col, "cell out of range");
        }
        if self.board.get(row, col) != Some(Cell::Empty) {
            return self.reject_move(uid, row, col, "cell occupied");
        }

        let stone = if uid == self.white_uid {
            Cell::White
        } else {
            Cell::Black
        };
        self.board.place(row, col, stone);
        tracing::debug!(rid = %self.rid, %uid, row, col, "stone placed");

        let winner = if self.board.five_from(row, col) {
            self.conclude(uid).await;
            uid
        } else {
            UserId::NONE
        };

        Response::PutChess {
            result: true,
            reason: if winner == UserId::NONE {
                "move accepted".to_string()
            } else {
                "five in a row".to_string()
            },
            room_id: self.rid,
            uid,
            row,
            col,
            winner,
        }
    }

    /// Chat handling: pass-through acknowledgement, no board mutation.
    fn handle_chat(&self, uid: UserId, message: &str) -> Response {
        Response::Chat {
            result: true,
            reason: String::new(),
            room_id: self.rid,
            uid,
            message: message.to_string(),
        }
    }

    /// A player is leaving the room.
    ///
    /// If the game is still running, the remaining player wins
    /// unconditionally — board state is irrelevant — and the forced result
    /// is broadcast. The occupant count drops exactly once per call either
    /// way; the manager destroys the room when it reaches zero.
    pub async fn handle_exit(&mut self, uid: UserId) {
        if self.status == RoomStatus::Active {
            let winner = if uid == self.white_uid {
                self.black_uid
            } else {
                self.white_uid
            };
            self.conclude(winner).await;
            tracing::info!(rid = %self.rid, loser = %uid, %winner, "win by forfeit");

            let resp = Response::PutChess {
                result: true,
                reason: "opponent exited".to_string(),
                room_id: self.rid,
                uid,
                row: 0,
                col: 0,
                winner,
            };
            self.broadcast(&resp).await;
        }

        self.player_count = self.player_count.saturating_sub(1);
        tracing::debug!(rid = %self.rid, %uid, remaining = self.player_count, "player exited room");
    }

    /// Records the final result and freezes the room.
    ///
    /// Storage failures are logged and swallowed: the game outcome stands
    /// even if the score update was lost.
    async fn conclude(&mut self, winner: UserId) {
        let loser = if winner == self.white_uid {
            self.black_uid
        } else {
            self.white_uid
        };

        if let Err(e) = self.store.record_win(winner) {
            tracing::error!(rid = %self.rid, %winner, error = %e, "failed to record win");
        }
        if let Err(e) = self.store.record_loss(loser) {
            tracing::error!(rid = %self.rid, %loser, error = %e, "failed to record loss");
        }

        self.status = RoomStatus::Finished;
        tracing::info!(rid = %self.rid, %winner, "game finished");
    }

    /// Serializes `resp` once and sends it to each occupant that still has
    /// a room connection. A missing side is logged and skipped — the other
    /// side still gets the message.
    async fn broadcast(&self, resp: &Response) {
        let payload = match self.codec.encode(resp) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(rid = %self.rid, error = %e, "failed to encode broadcast");
                return;
            }
        };

        for uid in [self.white_uid, self.black_uid] {
            match self.registry.conn_from_room(uid).await {
                Some(conn) => conn.send(&payload),
                None => {
                    tracing::warn!(rid = %self.rid, %uid, "occupant unreachable, skipping broadcast");
                }
            }
        }
    }
}
