//! Request and response envelopes.
//!
//! Every wire message is a flat JSON object tagged by an `optype` field.
//! Inbound traffic is modelled as one closed [`Request`] enum — there is no
//! string dispatch anywhere in the server; an optype the enum doesn't know
//! lands in the explicit [`Request::Unknown`] variant and is rejected with a
//! reason instead of being silently dropped.
//!
//! Outbound traffic is the [`Response`] enum. Every response carries at
//! least `result` (did the request succeed) and, on failure, a
//! human-readable `reason`.

use serde::{Deserialize, Serialize};

use crate::{RoomId, SessionId, UserId};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A message from a client.
///
/// `#[serde(tag = "optype")]` produces internally tagged JSON, so a
/// matchmaking request is simply `{"optype":"match_start"}` and a move is
/// `{"optype":"put_chess","room_id":1,"uid":42,"row":7,"col":7}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "optype", rename_all = "snake_case")]
pub enum Request {
    /// First frame on a lobby connection: identifies the session.
    EnterLobby { sid: SessionId },

    /// First frame on a room connection: identifies the session.
    EnterRoom { sid: SessionId },

    /// Join the matchmaking queue for the player's score tier.
    MatchStart,

    /// Leave the matchmaking queue.
    MatchStop,

    /// Place a stone at (`row`, `col`) in room `room_id`.
    PutChess {
        room_id: RoomId,
        uid: UserId,
        row: usize,
        col: usize,
    },

    /// In-room chat; passed through to both players unchanged.
    Chat {
        room_id: RoomId,
        uid: UserId,
        message: String,
    },

    /// Any optype the server doesn't recognize. Always rejected with a
    /// reason rather than ignored.
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A message from the server.
///
/// Same internally tagged layout as [`Request`]. Room responses are
/// broadcast to both occupants; lobby responses go to a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "optype", rename_all = "snake_case")]
pub enum Response {
    /// A tier worker paired this player with an opponent.
    MatchSuccess { result: bool },

    /// Acknowledges leaving the matchmaking queue.
    MatchStop { result: bool },

    /// Sent when a player connects into their room: who plays which color.
    RoomReady {
        result: bool,
        room_id: RoomId,
        uid: UserId,
        white_id: UserId,
        black_id: UserId,
    },

    /// Outcome of a move. `winner` is [`UserId::NONE`] while the game is
    /// still undecided, otherwise the winning player's uid.
    PutChess {
        result: bool,
        reason: String,
        room_id: RoomId,
        uid: UserId,
        row: usize,
        col: usize,
        winner: UserId,
    },

    /// Chat pass-through acknowledgement.
    Chat {
        result: bool,
        reason: String,
        room_id: RoomId,
        uid: UserId,
        message: String,
    },

    /// A rejected request: `result` is always false, `reason` says why.
    Error { result: bool, reason: String },
}

impl Response {
    /// Builds a rejection response with the given reason.
    pub fn error(reason: impl Into<String>) -> Self {
        Self::Error {
            result: false,
            reason: reason.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The client expects exact JSON shapes; these tests pin the serde
    //! attributes that produce them. A mismatch here means the browser
    //! can't parse what we send.

    use super::*;

    // =====================================================================
    // Request
    // =====================================================================

    #[test]
    fn test_request_match_start_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(&Request::MatchStart).unwrap();
        assert_eq!(json["optype"], "match_start");
    }

    #[test]
    fn test_request_put_chess_json_format() {
        let req = Request::PutChess {
            room_id: RoomId(3),
            uid: UserId(42),
            row: 7,
            col: 8,
        };
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();

        assert_eq!(json["optype"], "put_chess");
        assert_eq!(json["room_id"], 3);
        assert_eq!(json["uid"], 42);
        assert_eq!(json["row"], 7);
        assert_eq!(json["col"], 8);
    }

    #[test]
    fn test_request_chat_round_trip() {
        let req = Request::Chat {
            room_id: RoomId(1),
            uid: UserId(2),
            message: "hello".into(),
        };
        let bytes = serde_json::to_vec(&req).unwrap();
        let decoded: Request = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn test_request_enter_lobby_round_trip() {
        let req = Request::EnterLobby { sid: SessionId(9) };
        let bytes = serde_json::to_vec(&req).unwrap();
        let decoded: Request = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn test_request_unknown_optype_maps_to_unknown_variant() {
        // `#[serde(other)]` catches any unrecognized tag instead of failing,
        // so the handler can reject it with a reason.
        let json = r#"{"optype":"fly_to_moon","speed":9000}"#;
        let decoded: Request = serde_json::from_str(json).unwrap();
        assert_eq!(decoded, Request::Unknown);
    }

    #[test]
    fn test_request_missing_optype_is_an_error() {
        let json = r#"{"room_id":1,"uid":2}"#;
        let result: Result<Request, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    // =====================================================================
    // Response
    // =====================================================================

    #[test]
    fn test_response_match_success_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(&Response::MatchSuccess { result: true })
                .unwrap();
        assert_eq!(json["optype"], "match_success");
        assert_eq!(json["result"], true);
    }

    #[test]
    fn test_response_room_ready_json_format() {
        let resp = Response::RoomReady {
            result: true,
            room_id: RoomId(5),
            uid: UserId(10),
            white_id: UserId(10),
            black_id: UserId(11),
        };
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["optype"], "room_ready");
        assert_eq!(json["room_id"], 5);
        assert_eq!(json["white_id"], 10);
        assert_eq!(json["black_id"], 11);
    }

    #[test]
    fn test_response_put_chess_no_winner_serializes_zero() {
        let resp = Response::PutChess {
            result: true,
            reason: "ok".into(),
            room_id: RoomId(1),
            uid: UserId(2),
            row: 0,
            col: 0,
            winner: UserId::NONE,
        };
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["winner"], 0);
    }

    #[test]
    fn test_response_error_helper_sets_result_false() {
        let resp = Response::error("room id mismatch");
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["optype"], "error");
        assert_eq!(json["result"], false);
        assert_eq!(json["reason"], "room id mismatch");
    }

    #[test]
    fn test_response_round_trip_all_variants() {
        let variants = vec![
            Response::MatchSuccess { result: true },
            Response::MatchStop { result: true },
            Response::RoomReady {
                result: true,
                room_id: RoomId(1),
                uid: UserId(2),
                white_id: UserId(2),
                black_id: UserId(3),
            },
            Response::Chat {
                result: true,
                reason: String::new(),
                room_id: RoomId(1),
                uid: UserId(2),
                message: "gg".into(),
            },
            Response::error("nope"),
        ];
        for resp in variants {
            let bytes = serde_json::to_vec(&resp).unwrap();
            let decoded: Response = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(resp, decoded);
        }
    }
}
