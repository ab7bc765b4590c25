//! Identity newtypes shared by every layer of the server.
//!
//! All three ids are opaque `u64` wrappers. Wrapping them in distinct
//! structs means a `RoomId` can never be passed where a `UserId` is
//! expected, even though both are plain integers underneath.
//!
//! `#[serde(transparent)]` makes each id serialize as a bare number, so a
//! `UserId(42)` is just `42` on the wire — matching what the client sends
//! in its `uid` field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique player identity.
///
/// Issued by the user store when an account is registered; the coordination
/// core only ever references uids, it never mints or retires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// Sentinel used in the `winner` field of a move response: no winner yet.
    pub const NONE: UserId = UserId(0);
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// A unique session token identity.
///
/// Assigned monotonically by the session manager on login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// A unique room identity.
///
/// Assigned monotonically by the room manager when a matched pair gets a
/// room; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_serializes_as_plain_number() {
        // `#[serde(transparent)]` means UserId(42) → `42`, not `{"0":42}`.
        let json = serde_json::to_string(&UserId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_user_id_deserializes_from_plain_number() {
        let uid: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(uid, UserId(42));
    }

    #[test]
    fn test_user_id_none_is_zero() {
        assert_eq!(UserId::NONE, UserId(0));
    }

    #[test]
    fn test_id_display_formats() {
        assert_eq!(UserId(7).to_string(), "U-7");
        assert_eq!(SessionId(3).to_string(), "S-3");
        assert_eq!(RoomId(9).to_string(), "R-9");
    }

    #[test]
    fn test_ids_work_as_map_keys() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(UserId(1), "alice");
        map.insert(UserId(2), "bob");
        assert_eq!(map[&UserId(1)], "alice");
    }
}
