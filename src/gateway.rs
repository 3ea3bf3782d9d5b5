//! Per-connection message dispatch.
//!
//! A [`ClientSession`] owns one client's connection handle and, once the
//! client has created or joined a lobby, its [`Seat`]. Decoded messages
//! are routed to the registry (`createLobby`, `joinLobby`) or straight to
//! the seated match (`play`). Nothing here knows about sockets.

use crate::connection::Connection;
use crate::error::LobbyError;
use crate::protocol::{ClientMessage, PlayRequest, ServerMessage};
use crate::registry::{MatchRegistry, Seat};
use tracing::{debug, info, instrument, warn};

/// State kept for one connected client.
#[derive(Debug)]
pub struct ClientSession {
    connection: Connection,
    registry: MatchRegistry,
    seat: Option<Seat>,
}

impl ClientSession {
    /// Creates a session for a freshly connected client.
    pub fn new(connection: Connection, registry: MatchRegistry) -> Self {
        Self {
            connection,
            registry,
            seat: None,
        }
    }

    /// The client's connection handle.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The seat this client holds, if any.
    pub fn seat(&self) -> Option<&Seat> {
        self.seat.as_ref()
    }

    /// Decodes and handles one text frame.
    ///
    /// Frames that fail to decode are answered with an `error` event and
    /// change nothing.
    #[instrument(skip(self, text), fields(connection_id = %self.connection.id()))]
    pub fn handle_text(&mut self, text: &str) {
        match ClientMessage::parse(text) {
            Ok(message) => self.handle(message),
            Err(err) => {
                warn!(error = %err, "Rejecting malformed frame");
                self.connection.send(ServerMessage::error(&err));
            }
        }
    }

    /// Handles one decoded message.
    #[instrument(skip(self), fields(connection_id = %self.connection.id()))]
    pub fn handle(&mut self, message: ClientMessage) {
        match message {
            ClientMessage::CreateLobby => self.create_lobby(),
            ClientMessage::JoinLobby(match_id) => self.join_lobby(&match_id),
            ClientMessage::Play(request) => self.play(request),
        }
    }

    /// Whether the client sits in a match that has not finished yet.
    fn is_seated(&self) -> bool {
        self.seat.as_ref().is_some_and(|seat| !seat.is_finished())
    }

    fn reject(&self, err: LobbyError) {
        warn!(error = %err, "Request rejected");
        self.connection.send(ServerMessage::error(&err));
    }

    fn create_lobby(&mut self) {
        if self.is_seated() {
            self.reject(LobbyError::AlreadySeated);
            return;
        }
        let seat = self.registry.create_lobby(self.connection.clone());
        info!(match_id = %seat.match_id(), "Creating lobby");
        self.connection
            .send(ServerMessage::LobbyCreated(seat.match_id().to_string()));
        self.seat = Some(seat);
    }

    fn join_lobby(&mut self, match_id: &str) {
        if self.is_seated() {
            self.reject(LobbyError::AlreadySeated);
            return;
        }
        info!(match_id, "Joining lobby");
        match self.registry.join_lobby(self.connection.clone(), match_id) {
            Ok(seat) => self.seat = Some(seat),
            Err(err) => self.reject(err),
        }
    }

    fn play(&mut self, PlayRequest { row, column }: PlayRequest) {
        let Some(seat) = &self.seat else {
            debug!(row, column, "Ignoring play from unseated client");
            return;
        };
        let outcome = seat.play(row, column);
        if outcome.is_terminal() {
            self.registry.retire(seat.match_id());
        }
    }

    /// Logs the client leaving.
    ///
    /// Its seat stays in the match; the idle sweeper closes the match once
    /// every seat's connection has gone.
    #[instrument(skip(self), fields(connection_id = %self.connection.id()))]
    pub fn disconnect(self) {
        match &self.seat {
            Some(seat) => info!(match_id = %seat.match_id(), seat_id = seat.seat_id(), "Client disconnected"),
            None => info!("Client disconnected"),
        }
    }
}
