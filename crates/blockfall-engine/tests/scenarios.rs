use std::time::Duration;

use blockfall_engine::{
    Action, Board, Cell, EngineConfig, GameSession, PieceKind, ScriptedGenerator, SessionEvent,
    ghost, line_clear,
};

fn session_with(config: EngineConfig, pieces: &[PieceKind]) -> GameSession {
    let generator = ScriptedGenerator::cycling(pieces.to_vec());
    GameSession::with_generator(config, Box::new(generator)).unwrap()
}

fn count_events(events: &[SessionEvent], pred: impl Fn(&SessionEvent) -> bool) -> usize {
    events.iter().filter(|event| pred(event)).count()
}

#[test]
fn test_hard_drop_matches_soft_drops_then_lock() {
    let pieces = [PieceKind::T, PieceKind::S, PieceKind::J, PieceKind::I, PieceKind::Z];
    let config = EngineConfig::default();
    let mut dropped = session_with(config.clone(), &pieces);
    let mut stepped = session_with(config.clone(), &pieces);

    let shifts: [i32; 8] = [-3, 2, 0, 4, -1, 1, -4, 3];
    for shift in shifts {
        let action = if shift < 0 {
            Action::MoveLeft
        } else {
            Action::MoveRight
        };
        for _ in 0..shift.unsigned_abs() {
            dropped.apply_action(action).unwrap();
            stepped.apply_action(action).unwrap();
        }

        dropped.apply_action(Action::HardDrop).unwrap();

        while stepped.try_soft_drop().is_ok() {}
        stepped.tick(config.lock_delay()).unwrap();

        assert_eq!(
            dropped.board(),
            stepped.board(),
            "boards diverged after shift {shift}:\n{}\n{}",
            dropped.board(),
            stepped.board()
        );
    }
}

#[test]
fn test_hold_at_most_once_per_lock() {
    let pieces = [PieceKind::L, PieceKind::O, PieceKind::T, PieceKind::I];
    let mut session = session_with(EngineConfig::default(), &pieces);

    let noise = [
        Action::Hold,
        Action::MoveLeft,
        Action::Hold,
        Action::RotateCw,
        Action::Hold,
        Action::Rotate180,
        Action::SoftDrop,
        Action::Hold,
        Action::RotateCcw,
        Action::MoveRight,
        Action::Hold,
    ];
    for _ in 0..6 {
        session.drain_events();
        for action in noise {
            session.apply_action(action).unwrap();
        }
        let events = session.drain_events();
        let holds = count_events(&events, |e| matches!(e, SessionEvent::Held { .. }));
        assert_eq!(holds, 1, "{events:?}");

        session.apply_action(Action::HardDrop).unwrap();
        assert!(session.can_hold(), "lock re-arms the hold slot");
    }
}

#[test]
fn test_line_clear_shifts_partial_row() {
    let mut board = Board::from_text(
        &[
            "..........", //
            "..........", //
            "...T......", //
            "..TTT.....", //
            "IIIIIIIIII", //
            "OO.JJJLLL.",
        ],
        0,
    )
    .unwrap();
    let cleared = line_clear::clear_full_rows(&mut board);
    assert_eq!(cleared, [4]);
    let expected = Board::from_text(
        &[
            "..........", //
            "..........", //
            "..........", //
            "...T......", //
            "..TTT.....", //
            "OO.JJJLLL.",
        ],
        0,
    )
    .unwrap();
    assert_eq!(board, expected);
}

#[test]
fn test_line_clear_through_session() {
    let config = EngineConfig {
        board_width: 4,
        board_height: 8,
        ..EngineConfig::default()
    };
    // Two O pieces side by side fill the two bottom rows of a 4-wide board.
    let mut session = session_with(config, &[PieceKind::O]);
    session.apply_action(Action::MoveLeft).unwrap();
    session.apply_action(Action::HardDrop).unwrap();
    session.apply_action(Action::MoveRight).unwrap();
    session.apply_action(Action::HardDrop).unwrap();

    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::LinesCleared { rows: vec![6, 7] }));
    assert_eq!(session.board(), &Board::new(4, 8));
}

#[test]
fn test_ghost_projection_is_read_only() {
    let mut session = session_with(EngineConfig::default(), &[PieceKind::T, PieceKind::Z]);
    session.apply_action(Action::HardDrop).unwrap();
    session.apply_action(Action::MoveRight).unwrap();

    let board_before = session.board().clone();
    let first = session.ghost_piece().unwrap();
    let second = session.ghost_piece().unwrap();
    assert_eq!(first, second);
    assert_eq!(ghost::project(session.board(), &first), first);
    assert_eq!(session.board(), &board_before);

    // The ghost shows up only in the rendered view.
    let snapshot = session.snapshot();
    let ghost_cells = snapshot
        .main
        .cells
        .iter()
        .flatten()
        .filter(|cell| **cell == Cell::Ghost)
        .count();
    assert_eq!(ghost_cells, 4);
    assert!(session.board().rows().flatten().all(|cell| *cell != Cell::Ghost));
}

#[test]
fn test_stacked_i_pieces_never_clear() {
    let mut session = session_with(EngineConfig::default(), &[PieceKind::I]);
    for _ in 0..10 {
        session.apply_action(Action::HardDrop).unwrap();
    }
    let events = session.drain_events();
    assert_eq!(
        count_events(&events, |e| matches!(e, SessionEvent::Locked { .. })),
        10
    );
    assert_eq!(
        count_events(&events, |e| matches!(e, SessionEvent::LinesCleared { .. })),
        0
    );
    assert!(session.state().is_playing());

    let board = session.board();
    for y in 0..20 {
        let filled = y >= 10;
        for x in 0..10 {
            let expected = if filled && (3..7).contains(&x) {
                Cell::Piece(PieceKind::I)
            } else {
                Cell::Empty
            };
            assert_eq!(board.get(x, y).unwrap(), expected, "({x}, {y})");
        }
    }
}

#[test]
fn test_first_i_lands_on_bottom_row() {
    let mut session = session_with(EngineConfig::default(), &[PieceKind::I]);
    session.apply_action(Action::HardDrop).unwrap();
    let board = session.board();
    assert_eq!(
        board.row(19).unwrap().iter().filter(|cell| cell.is_filled()).count(),
        4
    );
    assert!(board.rows().take(19).flatten().all(|cell| cell.is_empty()));
}

#[test]
fn test_reserved_rows_shrink_play_area() {
    let config = EngineConfig {
        reserved_rows: 4,
        ..EngineConfig::default()
    };
    let mut session = session_with(config, &[PieceKind::I]);
    session.apply_action(Action::HardDrop).unwrap();
    let board = session.board();
    assert_eq!(board.get(3, 15).unwrap(), Cell::Piece(PieceKind::I));
    assert!(board.row(16).unwrap().iter().all(|cell| *cell == Cell::Blocked));

    session.apply_action(Action::Reset).unwrap();
    assert_eq!(session.board(), &Board::with_reserved_rows(10, 20, 4));
}

#[test]
fn test_tick_size_does_not_change_outcome() {
    let config = EngineConfig {
        gravity_interval_ms: 100,
        ..EngineConfig::default()
    };
    let pieces = [PieceKind::O, PieceKind::T];
    let mut coarse = session_with(config.clone(), &pieces);
    let mut fine = session_with(config, &pieces);

    coarse.tick(Duration::from_millis(3000)).unwrap();
    for _ in 0..3000 {
        fine.tick(Duration::from_millis(1)).unwrap();
    }

    assert_eq!(coarse.board(), fine.board());
    assert_eq!(coarse.active_piece(), fine.active_piece());
    assert_eq!(coarse.lock_status(), fine.lock_status());
    assert_eq!(coarse.drain_events(), fine.drain_events());
    // The O landed at 1.8s and locked at 2.3s; the T has fallen since.
    assert_eq!(coarse.board().get(4, 19).unwrap(), Cell::Piece(PieceKind::O));
    assert_eq!(coarse.active_piece().unwrap().kind(), PieceKind::T);
    assert_eq!(coarse.active_piece().unwrap().position().y(), 7);
}

#[test]
fn test_same_seed_same_game() {
    let config = EngineConfig {
        seed: Some("00112233445566778899aabbccddeeff".parse().unwrap()),
        ..EngineConfig::default()
    };
    let mut a = GameSession::new(config.clone()).unwrap();
    let mut b = GameSession::new(config).unwrap();
    for _ in 0..15 {
        for session in [&mut a, &mut b] {
            session.apply_action(Action::RotateCw).unwrap();
            session.apply_action(Action::HardDrop).unwrap();
            session.tick(Duration::from_millis(16)).unwrap();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
    assert_eq!(a.drain_events(), b.drain_events());
}
