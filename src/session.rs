//! Match state machine.
//!
//! A [`Match`] owns its grid, its seats and the turn pointer. Every
//! mutation goes through [`Match::add_player`] or [`Match::apply_move`],
//! which callers serialize by holding the match behind a mutex.

use crate::config::MatchSettings;
use crate::connection::{Connection, ConnectionId};
use crate::error::LobbyError;
use crate::games::morpion::{Cell, Grid, Mark, MatchState, Outcome, rules};
use crate::protocol::{MatchId, ServerMessage};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// 1-based seat number; also the turn order.
pub type SeatId = usize;

/// A seated player.
#[derive(Debug, Clone)]
pub struct Player {
    seat_id: SeatId,
    mark: Mark,
    connection: Connection,
}

impl Player {
    /// Seat number.
    pub fn seat_id(&self) -> SeatId {
        self.seat_id
    }

    /// Mark this seat places.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Connection handle.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn send(&self, message: ServerMessage) {
        self.connection.send(message);
    }
}

/// Result of [`Match::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Not the mover's turn, or the match is not active. Nothing happened.
    Ignored,
    /// Target cell taken or off the grid. Only the mover was told.
    Illegal,
    /// Mark placed; the turn passed to the next seat.
    Continued,
    /// Mark placed and it completed a winning run.
    Won(Mark),
    /// Mark placed and it filled the grid without a winner.
    Drawn,
}

impl MoveOutcome {
    /// Whether this move ended the match.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MoveOutcome::Won(_) | MoveOutcome::Drawn)
    }
}

/// One game instance, from lobby creation to game over.
#[derive(Debug)]
pub struct Match {
    id: MatchId,
    settings: MatchSettings,
    grid: Grid,
    players: Vec<Player>,
    turn: usize,
    move_count: usize,
    state: MatchState,
    last_activity: Instant,
}

impl Match {
    /// Creates a waiting match with `creator` in seat 1.
    #[instrument(skip(settings, creator), fields(connection_id = %creator.id()))]
    pub fn new(id: MatchId, settings: MatchSettings, creator: Connection) -> Self {
        info!(match_id = %id, ?settings, "Creating new match");
        let mut game = Self {
            id,
            settings,
            grid: Grid::new(settings.grid_size()),
            players: Vec::with_capacity(settings.max_players()),
            turn: 0,
            move_count: 0,
            state: MatchState::Waiting,
            last_activity: Instant::now(),
        };
        if let Err(err) = game.seat(creator) {
            warn!(match_id = %game.id, error = %err, "Could not seat lobby creator");
        }
        game
    }

    /// Match id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Settings this match was created with.
    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MatchState {
        self.state
    }

    /// The grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Seated players in seat order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of accepted moves.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Seat allowed to move, only while the match is active.
    pub fn turn_owner_seat(&self) -> Option<SeatId> {
        match self.state {
            MatchState::Active => self.players.get(self.turn).map(Player::seat_id),
            MatchState::Waiting | MatchState::Finished(_) => None,
        }
    }

    /// Seat held by `connection_id`, if any.
    pub fn seat_of(&self, connection_id: ConnectionId) -> Option<SeatId> {
        self.players
            .iter()
            .find(|p| p.connection.id() == connection_id)
            .map(Player::seat_id)
    }

    /// Time since the last join or accepted move.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }

    /// Whether every seated player's connection has gone away.
    pub fn is_deserted(&self) -> bool {
        self.players.iter().all(|p| p.connection.is_closed())
    }

    /// Seats a new player.
    ///
    /// When the last seat fills the match becomes active and every seat is
    /// sent `starting` with its own mark.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::LobbyFull`] if the match is no longer waiting
    /// or every seat is taken.
    #[instrument(skip(self, connection), fields(match_id = %self.id, connection_id = %connection.id()))]
    pub fn add_player(&mut self, connection: Connection) -> Result<SeatId, LobbyError> {
        if self.state != MatchState::Waiting || self.players.len() >= self.settings.max_players() {
            warn!(seats = self.players.len(), state = ?self.state, "Lobby is full");
            return Err(LobbyError::LobbyFull);
        }
        self.seat(connection)
    }

    fn seat(&mut self, connection: Connection) -> Result<SeatId, LobbyError> {
        let seat_id = self.players.len() + 1;
        let mark = Mark::for_seat(seat_id).ok_or(LobbyError::LobbyFull)?;
        info!(match_id = %self.id, seat_id, %mark, "Seating player");
        self.players.push(Player {
            seat_id,
            mark,
            connection,
        });
        self.last_activity = Instant::now();

        if self.players.len() == self.settings.max_players() {
            self.start();
        }
        Ok(seat_id)
    }

    fn start(&mut self) {
        self.state = MatchState::Active;
        self.turn = 0;
        info!(match_id = %self.id, players = self.players.len(), "Match starting");
        for player in &self.players {
            player.send(ServerMessage::Starting(player.mark));
        }
    }

    /// Applies a move from `seat_id`.
    ///
    /// Moves from anyone but the turn owner, or outside the active state,
    /// are dropped without a reply. A taken or off-grid target earns the
    /// mover an `illegalPlay`. An accepted move is relayed to every other
    /// seat, then checked for a win once at least `win_condition` moves
    /// have been played, then for a full grid.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn apply_move(&mut self, seat_id: SeatId, row: usize, column: usize) -> MoveOutcome {
        if self.turn_owner_seat() != Some(seat_id) {
            debug!(turn_owner = ?self.turn_owner_seat(), state = ?self.state, "Ignoring out-of-turn move");
            return MoveOutcome::Ignored;
        }
        let mover = &self.players[self.turn];
        let mark = mover.mark;

        if !self.grid.place(row, column, mark) {
            warn!(%mark, "Illegal play");
            mover.send(ServerMessage::IllegalPlay { row, column });
            return MoveOutcome::Illegal;
        }

        self.move_count += 1;
        self.last_activity = Instant::now();
        for player in self.players.iter().filter(|p| p.seat_id != seat_id) {
            player.send(ServerMessage::Play { row, column, mark });
        }
        debug!(%mark, move_count = self.move_count, "Move accepted");

        let win_condition = self.settings.win_condition();
        if self.move_count >= win_condition
            && rules::is_winning_move(&self.grid, row, column, mark, win_condition)
        {
            self.finish(Outcome::Winner(mark));
            return MoveOutcome::Won(mark);
        }

        if self.move_count == self.grid.cell_count() {
            debug_assert!(rules::is_full(&self.grid));
            self.finish(Outcome::Draw);
            return MoveOutcome::Drawn;
        }

        self.turn = (self.turn + 1) % self.players.len();
        MoveOutcome::Continued
    }

    /// Closes a match that never reached a result.
    ///
    /// Players still connected are told the lobby expired. Returns `false`
    /// if the match had already finished.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn abandon(&mut self) -> bool {
        if self.state.is_finished() {
            return false;
        }
        info!(seats = self.players.len(), state = ?self.state, moves = self.move_count, "Lobby expired");
        self.state = MatchState::Finished(Outcome::Abandoned);
        for player in &self.players {
            player.send(ServerMessage::error(&LobbyError::LobbyExpired));
        }
        true
    }

    fn finish(&mut self, outcome: Outcome) {
        self.state = MatchState::Finished(outcome);
        let mark = outcome.winner().map_or(Cell::Empty, Cell::Occupied);
        info!(
            match_id = %self.id,
            %outcome,
            moves = self.move_count,
            grid = %self.grid.display(),
            "Game over"
        );
        for player in &self.players {
            player.send(ServerMessage::GameOver(mark));
        }
    }
}
