//! Tests for the match state machine.

use strictly_morpion::{
    Cell, Connection, LobbyError, Mark, Match, MatchSettings, MatchState, MoveOutcome, Outcome,
    ServerMessage,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Drains every message queued for a connection.
fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

/// Creates a match with every seat filled, returning one receiver per seat.
fn started_match(settings: MatchSettings) -> (Match, Vec<UnboundedReceiver<ServerMessage>>) {
    let (creator, rx) = Connection::channel();
    let mut game = Match::new("m1".to_string(), settings, creator);
    let mut receivers = vec![rx];
    for _ in 1..settings.max_players() {
        let (conn, rx) = Connection::channel();
        game.add_player(conn).expect("seat available");
        receivers.push(rx);
    }
    for rx in &mut receivers {
        drain(rx);
    }
    (game, receivers)
}

#[test]
fn test_waiting_until_last_seat_joins() {
    let (creator, mut rx1) = Connection::channel();
    let mut game = Match::new("m1".to_string(), MatchSettings::default(), creator);
    assert_eq!(game.state(), MatchState::Waiting);
    assert_eq!(game.turn_owner_seat(), None);
    assert!(drain(&mut rx1).is_empty());

    let (joiner, mut rx2) = Connection::channel();
    assert_eq!(game.add_player(joiner), Ok(2));
    assert_eq!(game.state(), MatchState::Active);
    assert_eq!(game.turn_owner_seat(), Some(1));

    assert_eq!(drain(&mut rx1), vec![ServerMessage::Starting(Mark::X)]);
    assert_eq!(drain(&mut rx2), vec![ServerMessage::Starting(Mark::O)]);
}

#[test]
fn test_join_full_match_fails() {
    let (mut game, _rx) = started_match(MatchSettings::default());
    let (late, mut late_rx) = Connection::channel();
    assert_eq!(game.add_player(late), Err(LobbyError::LobbyFull));
    assert_eq!(game.players().len(), 2);
    assert!(drain(&mut late_rx).is_empty());
}

#[test]
fn test_row_win_example() {
    let (mut game, mut rx) = started_match(MatchSettings::default());

    assert_eq!(game.apply_move(1, 0, 0), MoveOutcome::Continued);
    assert_eq!(game.apply_move(2, 1, 1), MoveOutcome::Continued);
    assert_eq!(game.apply_move(1, 0, 1), MoveOutcome::Continued);
    assert_eq!(game.apply_move(2, 2, 2), MoveOutcome::Continued);
    assert_eq!(game.apply_move(1, 0, 2), MoveOutcome::Won(Mark::X));

    assert_eq!(game.state(), MatchState::Finished(Outcome::Winner(Mark::X)));
    assert_eq!(game.move_count(), 5);

    let game_over = ServerMessage::GameOver(Cell::Occupied(Mark::X));
    assert_eq!(drain(&mut rx[0]).last(), Some(&game_over));
    assert_eq!(drain(&mut rx[1]).last(), Some(&game_over));

    // Nothing is accepted once finished.
    assert_eq!(game.apply_move(2, 2, 0), MoveOutcome::Ignored);
    assert_eq!(game.grid().get(2, 0), Some(Cell::Empty));
    assert!(drain(&mut rx[0]).is_empty());
    assert!(drain(&mut rx[1]).is_empty());
}

#[test]
fn test_accepted_move_relayed_to_others_only() {
    let (mut game, mut rx) = started_match(MatchSettings::default());

    game.apply_move(1, 2, 1);

    assert!(drain(&mut rx[0]).is_empty());
    assert_eq!(
        drain(&mut rx[1]),
        vec![ServerMessage::Play {
            row: 2,
            column: 1,
            mark: Mark::X
        }]
    );
    assert_eq!(game.turn_owner_seat(), Some(2));
}

#[test]
fn test_out_of_turn_move_is_silent_no_op() {
    let (mut game, mut rx) = started_match(MatchSettings::default());

    assert_eq!(game.apply_move(2, 0, 0), MoveOutcome::Ignored);

    assert_eq!(game.grid().get(0, 0), Some(Cell::Empty));
    assert_eq!(game.move_count(), 0);
    assert_eq!(game.turn_owner_seat(), Some(1));
    assert!(drain(&mut rx[0]).is_empty());
    assert!(drain(&mut rx[1]).is_empty());
}

#[test]
fn test_illegal_play_reported_to_mover_only() {
    let (mut game, mut rx) = started_match(MatchSettings::default());
    game.apply_move(1, 1, 1);
    drain(&mut rx[1]);

    // Occupied cell.
    assert_eq!(game.apply_move(2, 1, 1), MoveOutcome::Illegal);
    // Off the grid.
    assert_eq!(game.apply_move(2, 0, 3), MoveOutcome::Illegal);
    assert_eq!(game.apply_move(2, 99, 99), MoveOutcome::Illegal);

    assert_eq!(
        drain(&mut rx[1]),
        vec![
            ServerMessage::IllegalPlay { row: 1, column: 1 },
            ServerMessage::IllegalPlay { row: 0, column: 3 },
            ServerMessage::IllegalPlay {
                row: 99,
                column: 99
            },
        ]
    );
    assert!(drain(&mut rx[0]).is_empty());
    assert_eq!(game.grid().get(1, 1), Some(Cell::Occupied(Mark::X)));
    assert_eq!(game.move_count(), 1);
    assert_eq!(game.turn_owner_seat(), Some(2));
}

#[test]
fn test_turns_alternate_only_on_accepted_moves() {
    let (mut game, _rx) = started_match(MatchSettings::default());
    let plays = [(1, 0, 0), (2, 0, 0), (2, 0, 1), (1, 1, 0), (2, 2, 2)];
    let mut owners = Vec::new();
    for (seat, row, column) in plays {
        game.apply_move(seat, row, column);
        owners.push(game.turn_owner_seat());
    }
    assert_eq!(owners, vec![Some(2), Some(2), Some(1), Some(2), Some(1)]);
}

#[test]
fn test_full_grid_without_winner_is_a_draw() {
    let (mut game, mut rx) = started_match(MatchSettings::default());
    // X O X / X O O / O X X
    let moves = [
        (1, 0, 0),
        (2, 1, 1),
        (1, 0, 2),
        (2, 0, 1),
        (1, 1, 0),
        (2, 1, 2),
        (1, 2, 1),
        (2, 2, 0),
    ];
    for (seat, row, column) in moves {
        assert_eq!(game.apply_move(seat, row, column), MoveOutcome::Continued);
    }
    assert_eq!(game.apply_move(1, 2, 2), MoveOutcome::Drawn);
    assert_eq!(game.state(), MatchState::Finished(Outcome::Draw));

    let draw = ServerMessage::GameOver(Cell::Empty);
    assert_eq!(drain(&mut rx[0]).last(), Some(&draw));
    assert_eq!(drain(&mut rx[1]).last(), Some(&draw));
}

#[test]
fn test_round_robin_with_three_seats() {
    let settings = MatchSettings::new(3, 4, 3);
    let (mut game, mut rx) = started_match(settings);

    let mut owners = vec![game.turn_owner_seat()];
    for (seat, row, column) in [(1, 0, 0), (2, 1, 0), (3, 2, 0), (1, 0, 1)] {
        assert_eq!(game.apply_move(seat, row, column), MoveOutcome::Continued);
        owners.push(game.turn_owner_seat());
    }
    assert_eq!(owners, vec![Some(1), Some(2), Some(3), Some(1), Some(2)]);

    // Seat 3 saw the moves of seats 1 and 2 but not its own.
    let seen: Vec<_> = drain(&mut rx[2])
        .into_iter()
        .filter_map(|m| match m {
            ServerMessage::Play { mark, .. } => Some(mark),
            _ => None,
        })
        .collect();
    assert_eq!(seen, vec![Mark::X, Mark::O, Mark::X]);
}

#[test]
fn test_third_seat_plays_plus_and_can_win() {
    let settings = MatchSettings::new(3, 3, 3);
    let (mut game, _rx) = started_match(settings);
    let moves = [
        (1, 0, 0),
        (2, 1, 0),
        (3, 0, 2),
        (1, 0, 1),
        (2, 2, 2),
        (3, 1, 1),
        (1, 1, 2),
        (2, 2, 1),
    ];
    for (seat, row, column) in moves {
        assert_eq!(game.apply_move(seat, row, column), MoveOutcome::Continued);
    }
    assert_eq!(game.apply_move(3, 2, 0), MoveOutcome::Won(Mark::Plus));
}

#[test]
fn test_win_condition_shorter_than_grid() {
    let settings = MatchSettings::new(2, 6, 4);
    let (mut game, _rx) = started_match(settings);
    let moves = [
        (1, 1, 5),
        (2, 0, 0),
        (1, 2, 4),
        (2, 0, 1),
        (1, 3, 3),
        (2, 0, 2),
    ];
    for (seat, row, column) in moves {
        assert_eq!(game.apply_move(seat, row, column), MoveOutcome::Continued);
    }
    assert_eq!(game.apply_move(1, 4, 2), MoveOutcome::Won(Mark::X));
}

#[test]
fn test_abandon_closes_unfinished_matches() {
    let (creator, mut rx) = Connection::channel();
    let mut game = Match::new("m1".to_string(), MatchSettings::default(), creator);
    assert!(game.abandon());
    assert_eq!(game.state(), MatchState::Finished(Outcome::Abandoned));
    assert_eq!(
        drain(&mut rx),
        vec![ServerMessage::Error("Lobby expired".to_string())]
    );
    assert!(!game.abandon(), "already finished");
    assert!(drain(&mut rx).is_empty());

    let (mut active, mut receivers) = started_match(MatchSettings::default());
    assert_eq!(active.apply_move(1, 0, 0), MoveOutcome::Continued);
    assert!(active.abandon());
    assert_eq!(active.state(), MatchState::Finished(Outcome::Abandoned));
    assert_eq!(active.apply_move(2, 1, 1), MoveOutcome::Ignored);
    assert_eq!(
        drain(&mut receivers[0]),
        vec![ServerMessage::Error("Lobby expired".to_string())]
    );
}

#[test]
fn test_deserted_once_every_receiver_is_gone() {
    let (mut game, mut receivers) = started_match(MatchSettings::default());
    assert!(!game.is_deserted());
    drop(receivers.pop());
    assert!(!game.is_deserted(), "seat 1 is still connected");
    drop(receivers);
    assert!(game.is_deserted());
    assert!(game.abandon());
}
