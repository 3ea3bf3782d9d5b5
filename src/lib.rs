//! Strictly Morpion - real-time lobby server for grid games
//!
//! Players create or join a lobby over a WebSocket, then take turns
//! placing marks on a square grid until one of them lines up a run of the
//! configured length or the grid fills up.
//!
//! # Architecture
//!
//! - **Games**: pure grid, mark and win-detection rules
//! - **Session**: the per-match state machine (`Waiting` → `Active` → `Finished`)
//! - **Registry**: creates matches, routes joins, retires finished lobbies
//! - **Gateway**: decodes client messages and routes them for one connection
//! - **Server**: axum WebSocket transport and idle-lobby sweeper
//!
//! # Example
//!
//! ```no_run
//! use strictly_morpion::{GameServer, ServerConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let server = GameServer::new(ServerConfig::default());
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod connection;
mod error;
mod games;
mod gateway;
mod protocol;
mod registry;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, MAX_GRID_SIZE, MatchSettings, ServerConfig};

// Crate-level exports - Transport-facing types
pub use connection::{Connection, ConnectionId};
pub use error::LobbyError;
pub use gateway::ClientSession;
pub use protocol::{ClientMessage, MatchId, PlayRequest, ServerMessage};
pub use server::{GameServer, spawn_idle_sweeper};

// Crate-level exports - Lobby and match management
pub use registry::{MatchRegistry, Seat, SharedMatch, lock_match};
pub use session::{Match, MoveOutcome, Player, SeatId};

// Crate-level exports - Game types (morpion)
pub use games::morpion::rules::{Axis, is_full, is_winning_move, winning_axis};
pub use games::morpion::{Cell, Grid, Mark, MatchState, Outcome};
