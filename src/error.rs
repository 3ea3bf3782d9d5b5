//! Lobby error types.
//!
//! Every variant is recoverable: it is reported to the acting connection as
//! an `error` event and the connection stays open.

/// Error raised while routing a client request.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum LobbyError {
    /// The match already has every seat filled.
    #[display("Lobby is full")]
    LobbyFull,

    /// No open match has the requested id.
    #[display("Lobby not found")]
    LobbyNotFound,

    /// The client frame could not be decoded into a known message.
    #[display("Invalid payload: {}", _0)]
    InvalidPayload(String),

    /// The connection is already seated in a match that has not finished.
    #[display("Already seated in a lobby")]
    AlreadySeated,

    /// The lobby was closed after waiting too long for players.
    #[display("Lobby expired")]
    LobbyExpired,
}

impl std::error::Error for LobbyError {}
