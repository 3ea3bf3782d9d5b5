//! Match registry.
//!
//! Creates matches, hands out seats and routes joins. It never touches a
//! match's grid; once seated, a connection talks to its match through the
//! [`Seat`] handle directly.

use crate::config::MatchSettings;
use crate::connection::Connection;
use crate::error::LobbyError;
use crate::protocol::MatchId;
use crate::session::{Match, MoveOutcome, SeatId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A match shared between the registry and its seats.
pub type SharedMatch = Arc<Mutex<Match>>;

/// Locks a match, recovering the guard if a previous holder panicked.
pub fn lock_match(game: &Mutex<Match>) -> MutexGuard<'_, Match> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A connection's place in a match.
#[derive(Debug, Clone)]
pub struct Seat {
    match_id: MatchId,
    seat_id: SeatId,
    game: SharedMatch,
}

impl Seat {
    /// Id of the match this seat belongs to.
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    /// Seat number within the match.
    pub fn seat_id(&self) -> SeatId {
        self.seat_id
    }

    /// Shared handle to the match.
    pub fn game(&self) -> &SharedMatch {
        &self.game
    }

    /// Plays a move from this seat.
    pub fn play(&self, row: usize, column: usize) -> MoveOutcome {
        lock_match(&self.game).apply_move(self.seat_id, row, column)
    }

    /// Whether the match has ended.
    pub fn is_finished(&self) -> bool {
        lock_match(&self.game).state().is_finished()
    }
}

/// Tracks every open match by id.
///
/// Lock order is always registry map first, then an individual match.
#[derive(Debug, Clone)]
pub struct MatchRegistry {
    settings: MatchSettings,
    matches: Arc<Mutex<HashMap<MatchId, SharedMatch>>>,
}

impl MatchRegistry {
    /// Creates an empty registry whose matches use `settings`.
    #[instrument]
    pub fn new(settings: MatchSettings) -> Self {
        info!("Creating match registry");
        Self {
            settings,
            matches: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn map(&self) -> MutexGuard<'_, HashMap<MatchId, SharedMatch>> {
        self.matches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Settings new matches are created with.
    pub fn settings(&self) -> MatchSettings {
        self.settings
    }

    /// Opens a new lobby with `creator` in seat 1.
    ///
    /// Always succeeds; the returned seat carries the fresh match id.
    #[instrument(skip(self, creator), fields(connection_id = %creator.id()))]
    pub fn create_lobby(&self, creator: Connection) -> Seat {
        let mut matches = self.map();
        let match_id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !matches.contains_key(&candidate) {
                break candidate;
            }
        };

        let game = Arc::new(Mutex::new(Match::new(
            match_id.clone(),
            self.settings,
            creator,
        )));
        matches.insert(match_id.clone(), Arc::clone(&game));
        info!(match_id = %match_id, open = matches.len(), "Lobby created");

        Seat {
            match_id,
            seat_id: 1,
            game,
        }
    }

    /// Seats `connection` in the lobby `match_id`.
    ///
    /// # Errors
    ///
    /// [`LobbyError::LobbyNotFound`] if no open match has that id,
    /// [`LobbyError::LobbyFull`] if every seat is taken.
    #[instrument(skip(self, connection), fields(connection_id = %connection.id()))]
    pub fn join_lobby(&self, connection: Connection, match_id: &str) -> Result<Seat, LobbyError> {
        let matches = self.map();
        let Some(game) = matches.get(match_id).cloned() else {
            warn!("Lobby not found");
            return Err(LobbyError::LobbyNotFound);
        };

        let mut guard = lock_match(&game);
        if guard.state().is_finished() {
            warn!("Lobby already closed");
            return Err(LobbyError::LobbyNotFound);
        }
        let seat_id = guard.add_player(connection)?;
        drop(guard);

        info!(seat_id, "Player joined lobby");
        Ok(Seat {
            match_id: match_id.to_string(),
            seat_id,
            game,
        })
    }

    /// Removes a finished match. Returns `true` if it was removed.
    #[instrument(skip(self))]
    pub fn retire(&self, match_id: &str) -> bool {
        let mut matches = self.map();
        let finished = matches
            .get(match_id)
            .is_some_and(|game| lock_match(game).state().is_finished());
        if finished {
            matches.remove(match_id);
            info!(open = matches.len(), "Retired finished match");
        } else {
            debug!("Match not retired");
        }
        finished
    }

    /// Closes every unfinished match that has gone `max_idle` without a
    /// join or move, or whose players have all disconnected, and drops any
    /// finished match still registered. Returns how many matches were
    /// closed.
    #[instrument(skip(self))]
    pub fn sweep_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut matches = self.map();
        let mut expired = 0;
        matches.retain(|match_id, game| {
            let mut game = lock_match(game);
            if game.state().is_finished() {
                return false;
            }
            let idle = game.idle_for(now) >= max_idle;
            let deserted = game.is_deserted();
            if (idle || deserted) && game.abandon() {
                debug!(%match_id, idle, deserted, "Closing stale match");
                expired += 1;
                return false;
            }
            true
        });
        if expired > 0 {
            info!(expired, open = matches.len(), "Swept stale matches");
        }
        expired
    }

    /// Looks up an open match.
    pub fn get(&self, match_id: &str) -> Option<SharedMatch> {
        self.map().get(match_id).cloned()
    }

    /// Whether `match_id` is open.
    pub fn contains(&self, match_id: &str) -> bool {
        self.map().contains_key(match_id)
    }

    /// Number of open matches.
    pub fn len(&self) -> usize {
        self.map().len()
    }

    /// Whether no match is open.
    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new(MatchSettings::default())
    }
}
