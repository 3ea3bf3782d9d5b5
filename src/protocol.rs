//! Wire protocol.
//!
//! Every frame is a JSON envelope `{"event": <name>, "data": <payload>}`.
//! Frames are decoded into typed messages before they reach a match.

use crate::error::LobbyError;
use crate::games::morpion::{Cell, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Unique identifier of a match (lobby).
pub type MatchId = String;

/// Coordinates of a requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRequest {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub column: usize,
}

/// Message sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Open a new lobby with the sender in seat 1.
    CreateLobby,
    /// Take a seat in an existing lobby.
    JoinLobby(MatchId),
    /// Place a mark.
    Play(PlayRequest),
}

impl ClientMessage {
    /// Decodes a text frame.
    ///
    /// Unknown events, missing data and coordinates that are not
    /// non-negative integers are all rejected as
    /// [`LobbyError::InvalidPayload`].
    #[instrument]
    pub fn parse(text: &str) -> Result<Self, LobbyError> {
        serde_json::from_str(text).map_err(|e| LobbyError::InvalidPayload(e.to_string()))
    }
}

/// Message sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Reply to `createLobby`; carries the id other players use to join.
    LobbyCreated(MatchId),
    /// Every seat is filled; carries the receiver's own mark.
    Starting(Mark),
    /// Another seat placed a mark.
    Play {
        /// Row played.
        row: usize,
        /// Column played.
        column: usize,
        /// Mark placed.
        mark: Mark,
    },
    /// The receiver's move targeted a taken or off-grid cell.
    IllegalPlay {
        /// Row requested.
        row: usize,
        /// Column requested.
        column: usize,
    },
    /// The match is over; carries the winning mark, `Cell::Empty` on a draw.
    GameOver(Cell),
    /// A request failed; carries a human-readable reason.
    Error(String),
}

impl ServerMessage {
    /// Builds an `error` event from a lobby error.
    pub fn error(err: &LobbyError) -> Self {
        ServerMessage::Error(err.to_string())
    }

    /// Encodes the message as a JSON text frame.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
