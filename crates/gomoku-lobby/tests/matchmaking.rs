//! Integration tests for the matchmaking pipeline: queues, tier workers,
//! registry checks, and room creation.

use std::sync::Arc;
use std::time::Duration;

use gomoku_lobby::Matcher;
use gomoku_protocol::{Response, UserId};
use gomoku_room::RoomManager;
use gomoku_session::ConnectionRegistry;
use gomoku_store::{MemoryStore, UserStore};
use gomoku_transport::ChannelConnection;
use tokio::sync::mpsc::UnboundedReceiver;

struct Harness {
    registry: ConnectionRegistry,
    store: Arc<MemoryStore>,
    rooms: RoomManager,
    matcher: Matcher,
}

fn harness() -> Harness {
    let registry = ConnectionRegistry::new();
    let store = Arc::new(MemoryStore::new());
    let rooms = RoomManager::new(
        registry.clone(),
        Arc::clone(&store) as Arc<dyn UserStore>,
    );
    let matcher = Matcher::new(
        registry.clone(),
        rooms.clone(),
        Arc::clone(&store) as Arc<dyn UserStore>,
    );
    Harness {
        registry,
        store,
        rooms,
        matcher,
    }
}

/// Registers an account and connects it to the lobby.
async fn lobby_player(h: &Harness, name: &str) -> (UserId, UnboundedReceiver<Vec<u8>>) {
    let uid = h.store.create_user(name, "pw").unwrap().uid;
    let (conn, rx) = ChannelConnection::new();
    h.registry.enter_lobby(uid, conn).await;
    (uid, rx)
}

/// Waits for a frame and asserts it is a `match_success`.
async fn expect_match_success(rx: &mut UnboundedReceiver<Vec<u8>>) {
    let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for match notification")
        .expect("connection closed");
    let resp: Response = serde_json::from_slice(&frame).unwrap();
    assert!(matches!(resp, Response::MatchSuccess { result: true }));
}

#[tokio::test]
async fn test_two_waiting_players_get_matched() {
    let h = harness();
    let (alice, mut rx_a) = lobby_player(&h, "alice").await;
    let (bob, mut rx_b) = lobby_player(&h, "bob").await;

    h.matcher.add(alice).await.unwrap();
    h.matcher.add(bob).await.unwrap();

    expect_match_success(&mut rx_a).await;
    expect_match_success(&mut rx_b).await;

    // Both ended up in the same two-player room.
    let room = h.rooms.room_by_uid(alice).await.expect("alice has a room");
    let room = room.lock().await;
    assert_eq!(room.player_count(), 2);
    let occupants = [room.white_uid(), room.black_uid()];
    assert!(occupants.contains(&alice));
    assert!(occupants.contains(&bob));
}

#[tokio::test]
async fn test_unreachable_player_dropped_survivor_eventually_matched() {
    let h = harness();
    let (alice, mut rx_a) = lobby_player(&h, "alice").await;

    // Bob has an account but never connected to the lobby.
    let bob = h.store.create_user("bob", "pw").unwrap().uid;

    h.matcher.add(alice).await.unwrap();
    h.matcher.add(bob).await.unwrap();

    // A third, reachable player arrives; alice must not be lost.
    let (carol, mut rx_c) = lobby_player(&h, "carol").await;
    h.matcher.add(carol).await.unwrap();

    expect_match_success(&mut rx_a).await;
    expect_match_success(&mut rx_c).await;

    let room = h.rooms.room_by_uid(alice).await.expect("alice has a room");
    let room = room.lock().await;
    let occupants = [room.white_uid(), room.black_uid()];
    assert!(occupants.contains(&carol));
    assert!(!occupants.contains(&bob));
    assert!(h.rooms.room_by_uid(bob).await.is_none());
}

#[tokio::test]
async fn test_add_unknown_uid_fails_without_enqueueing() {
    let h = harness();
    assert!(h.matcher.add(UserId(999)).await.is_err());
}

#[tokio::test]
async fn test_removed_player_is_not_matched() {
    let h = harness();
    let (alice, mut rx_a) = lobby_player(&h, "alice").await;

    h.matcher.add(alice).await.unwrap();
    h.matcher.remove(alice).await;

    // The next two arrivals pair with each other, not with alice.
    let (bob, mut rx_b) = lobby_player(&h, "bob").await;
    let (carol, mut rx_c) = lobby_player(&h, "carol").await;
    h.matcher.add(bob).await.unwrap();
    h.matcher.add(carol).await.unwrap();

    expect_match_success(&mut rx_b).await;
    expect_match_success(&mut rx_c).await;

    assert!(h.rooms.room_by_uid(alice).await.is_none());
    assert!(rx_a.try_recv().is_err(), "alice must not be notified");
}

#[tokio::test]
async fn test_players_in_different_tiers_never_pair() {
    let h = harness();
    let (silver, mut rx_s) = lobby_player(&h, "silver").await;
    let (gold, mut rx_g) = lobby_player(&h, "gold").await;

    // Push one account into the gold bracket before enqueueing.
    for _ in 0..70 {
        h.store.record_win(gold).unwrap();
    }
    assert!(h.store.lookup_by_uid(gold).unwrap().score >= 3000);

    h.matcher.add(silver).await.unwrap();
    h.matcher.add(gold).await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(rx_s.try_recv().is_err());
    assert!(rx_g.try_recv().is_err());
    assert!(h.rooms.room_by_uid(silver).await.is_none());
    assert!(h.rooms.room_by_uid(gold).await.is_none());
}
