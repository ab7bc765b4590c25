//! WebSocket edge: accept loop and per-connection handler.
//!
//! This is thin dispatch. Each accepted socket declares its context with a
//! first frame — `enter_lobby` or `enter_room` carrying a session token —
//! and everything after that is decoded and routed into the matching
//! [`GameCore`] entry points. When the socket closes, the matching
//! disconnect entry point runs.

use std::sync::Arc;

use gomoku_protocol::{Codec, JsonCodec, Request, Response, UserId};
use gomoku_store::UserStore;
use gomoku_transport::{
    Connection, WebSocketConnection, WebSocketReceiver, WebSocketTransport,
};

use crate::{CoreConfig, GameCore, ServerError};

/// Which context a connection attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Lobby,
    Room,
}

/// Builder for configuring and starting a gomoku server.
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(MemoryStore::new());
/// let server = ServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(store)
///     .await?;
/// server.run().await
/// ```
pub struct ServerBuilder {
    bind_addr: String,
    config: CoreConfig,
}

impl ServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            config: CoreConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the core configuration.
    pub fn config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the transport and assembles the core.
    pub async fn build(self, store: Arc<dyn UserStore>) -> Result<Server, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let core = Arc::new(GameCore::with_config(store, self.config));
        Ok(Server { transport, core })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running gomoku server.
pub struct Server {
    transport: WebSocketTransport,
    core: Arc<GameCore>,
}

impl Server {
    /// The assembled core, for embedding callers that drive logins or
    /// registrations out of band.
    pub fn core(&self) -> Arc<GameCore> {
        Arc::clone(&self.core)
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("gomoku server running");

        loop {
            match self.transport.accept().await {
                Ok((conn, receiver)) => {
                    let core = Arc::clone(&self.core);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, receiver, core).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Handles a single connection from hello to close.
async fn handle_connection(
    conn: Arc<WebSocketConnection>,
    mut receiver: WebSocketReceiver,
    core: Arc<GameCore>,
) -> Result<(), ServerError> {
    let codec = JsonCodec;
    let handle: Arc<dyn Connection> = conn.clone();

    // --- Hello: which context, which session ---
    let (uid, context) = match perform_hello(&codec, &handle, &mut receiver, &core).await? {
        Some(attached) => attached,
        None => return Ok(()),
    };

    match context {
        Context::Lobby => core.on_lobby_connect(uid, Arc::clone(&handle)).await,
        Context::Room => core.on_room_connect(uid, Arc::clone(&handle)).await,
    }
    tracing::info!(%uid, ?context, id = %handle.id(), "player attached");

    // --- Message loop ---
    loop {
        let data = match receiver.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%uid, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%uid, error = %e, "receive error");
                break;
            }
        };

        let req: Request = match codec.decode(&data) {
            Ok(req) => req,
            Err(e) => {
                tracing::debug!(%uid, error = %e, "undecodable frame");
                send(&codec, &handle, &Response::error("malformed request"));
                continue;
            }
        };

        match context {
            Context::Lobby => core.on_lobby_message(uid, &req).await,
            Context::Room => core.on_room_message(uid, &req).await,
        }
    }

    // --- Teardown ---
    match context {
        Context::Lobby => core.on_lobby_disconnect(uid).await,
        Context::Room => core.on_room_disconnect(uid).await,
    }
    tracing::info!(%uid, ?context, "player detached");
    Ok(())
}

/// Reads and validates the first frame. Returns `None` (after telling the
/// client why) when the connection should be dropped without attaching.
async fn perform_hello(
    codec: &JsonCodec,
    handle: &Arc<dyn Connection>,
    receiver: &mut WebSocketReceiver,
    core: &Arc<GameCore>,
) -> Result<Option<(UserId, Context)>, ServerError> {
    let Some(data) = receiver.recv().await? else {
        return Ok(None);
    };

    let hello: Request = match codec.decode(&data) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = %e, "undecodable hello");
            send(codec, handle, &Response::error("malformed request"));
            return Ok(None);
        }
    };

    let (sid, context) = match hello {
        Request::EnterLobby { sid } => (sid, Context::Lobby),
        Request::EnterRoom { sid } => (sid, Context::Room),
        other => {
            tracing::debug!(?other, "first frame was not a hello");
            send(codec, handle, &Response::error("expected enter_lobby or enter_room"));
            return Ok(None);
        }
    };

    match core.sessions().authorize(sid).await {
        Ok(session) => Ok(Some((session.uid, context))),
        Err(e) => {
            tracing::debug!(%sid, error = %e, "hello rejected");
            send(codec, handle, &Response::error("invalid session"));
            Ok(None)
        }
    }
}

fn send(codec: &JsonCodec, handle: &Arc<dyn Connection>, resp: &Response) {
    match codec.encode(resp) {
        Ok(payload) => handle.send(&payload),
        Err(e) => tracing::error!(error = %e, "failed to encode response"),
    }
}
