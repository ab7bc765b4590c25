//! Server binary: in-memory accounts, WebSocket edge.
//!
//! Demo accounts are seeded and logged in at startup so a client can be
//! pointed at the server immediately; their session tokens appear in the
//! log. A real deployment keeps its own `UserStore` implementation and
//! drives `GameCore::login` from its HTTP frontend instead.

use std::sync::Arc;

use gomoku::ServerBuilder;
use gomoku_store::{MemoryStore, UserStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = std::env::var("GOMOKU_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let store = Arc::new(MemoryStore::new());
    for name in ["alice", "bob"] {
        store.create_user(name, "secret")?;
    }

    let server = ServerBuilder::new()
        .bind(&addr)
        .build(store as Arc<dyn UserStore>)
        .await?;

    let core = server.core();
    for name in ["alice", "bob"] {
        let session = core.login(name, "secret").await?;
        tracing::info!(user = name, sid = %session.sid, "demo account ready");
    }

    server.run().await?;
    Ok(())
}
