//! WebSocket transport.
//!
//! Each client connects to `/ws`. The socket task owns a [`ClientSession`]
//! and an outbound queue: matches push [`ServerMessage`]s onto the queue
//! and the task forwards them to the socket while reading client frames.

use crate::config::ServerConfig;
use crate::connection::Connection;
use crate::gateway::ClientSession;
use crate::registry::MatchRegistry;
use anyhow::Result;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
struct AppState {
    registry: MatchRegistry,
}

/// The game server: registry plus HTTP/WebSocket front end.
#[derive(Debug)]
pub struct GameServer {
    config: ServerConfig,
    registry: MatchRegistry,
}

impl GameServer {
    /// Creates a server with an empty registry.
    #[instrument(skip(config))]
    pub fn new(config: ServerConfig) -> Self {
        info!("Creating game server");
        let registry = MatchRegistry::new(*config.game());
        Self { config, registry }
    }

    /// The match registry.
    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    /// Builds the axum router (`/ws` and `/health`).
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_handler))
            .route("/health", get(health))
            .with_state(AppState {
                registry: self.registry.clone(),
            })
    }

    /// Binds the configured address and serves until the listener fails.
    pub async fn run(self) -> Result<()> {
        let listener =
            TcpListener::bind((self.config.host().as_str(), *self.config.port())).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener, sweeping stale matches in the
    /// background.
    #[instrument(skip_all, fields(addr = ?listener.local_addr().ok()))]
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let sweeper = spawn_idle_sweeper(
            self.registry.clone(),
            self.config.sweep_interval(),
            self.config.lobby_idle_timeout(),
        );

        info!("Server ready, accepting WebSocket connections on /ws");
        let result = axum::serve(listener, self.router()).await;
        sweeper.abort();
        warn!(?result, "Server exited");
        result?;
        Ok(())
    }
}

/// Periodically runs [`MatchRegistry::sweep_idle`] with `max_idle`.
pub fn spawn_idle_sweeper(
    registry: MatchRegistry,
    every: Duration,
    max_idle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            registry.sweep_idle(max_idle);
        }
    })
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "lobbies": state.registry.len(),
    }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.registry))
}

async fn handle_socket(mut socket: WebSocket, registry: MatchRegistry) {
    let (connection, mut outbound) = Connection::channel();
    let connection_id = connection.id();
    let mut session = ClientSession::new(connection, registry);
    info!(%connection_id, "Client connected");

    loop {
        tokio::select! {
            Some(message) = outbound.recv() => {
                let json = match message.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(%connection_id, error = %e, "Failed to encode message");
                        continue;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => session.handle_text(text.as_str()),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Binary(_))) => {
                        debug!(%connection_id, "Ignoring binary frame");
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!(%connection_id, error = %e, "WebSocket error");
                        break;
                    }
                }
            }
        }
    }

    session.disconnect();
}
