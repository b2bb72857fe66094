//! Collision and transform validation.
//!
//! The board passed in never contains the active piece's own cells (the active
//! piece is only merged at lock time), so a piece can never collide with its own
//! prior position.

use crate::{
    InvalidTransform,
    core::{Board, Piece, RotationDirection, kick_candidates},
};

/// Returns `true` if any cell of `piece` is outside the board or overlaps a
/// non-free cell. Reserved (blocked) cells count as occupied.
#[must_use]
pub fn collides(board: &Board, piece: &Piece) -> bool {
    piece
        .occupied_positions()
        .any(|(x, y)| !board.get(x, y).is_ok_and(|cell| cell.is_free()))
}

/// Translates the piece by `(dx, dy)`.
///
/// On success returns the moved piece; on failure the caller keeps the original.
pub fn try_move(board: &Board, piece: &Piece, dx: i32, dy: i32) -> Result<Piece, InvalidTransform> {
    let moved = piece.translated(dx, dy);
    if collides(board, &moved) {
        return Err(InvalidTransform);
    }
    Ok(moved)
}

/// Result of a successful rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotated {
    pub piece: Piece,
    /// Index into the kick candidate list that made the rotation legal
    /// (`0` means no kick was needed).
    pub kick_index: usize,
}

/// Rotates the piece, trying each kick candidate in order until one fits.
///
/// The candidate list depends only on the shape's kick class and the source and
/// target rotation states, so identical inputs always select the same kick.
pub fn try_rotate(
    board: &Board,
    piece: &Piece,
    direction: RotationDirection,
) -> Result<Rotated, InvalidTransform> {
    let rotated = piece.rotated(direction);
    let kicks = kick_candidates(piece.kind().kick_class(), piece.rotation(), rotated.rotation());
    kicks
        .iter()
        .enumerate()
        .map(|(kick_index, &(dx, dy))| Rotated {
            piece: rotated.translated(dx, dy),
            kick_index,
        })
        .find(|candidate| !collides(board, &candidate.piece))
        .ok_or(InvalidTransform)
}

/// Returns `true` if the piece cannot move down by one row.
#[must_use]
pub fn is_grounded(board: &Board, piece: &Piece) -> bool {
    try_move(board, piece, 0, 1).is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cell, PieceKind, PiecePosition, PieceRotation};

    fn piece(kind: PieceKind, rotation: PieceRotation, x: i32, y: i32) -> Piece {
        Piece::new(kind, rotation, PiecePosition::new(x, y))
    }

    #[test]
    fn test_move_inside_empty_board() {
        let board = Board::new(10, 20);
        let t = Piece::spawn(PieceKind::T, 10);
        let moved = try_move(&board, &t, -1, 0).unwrap();
        assert_eq!(moved.position(), PiecePosition::new(2, 0));
    }

    #[test]
    fn test_move_rejected_at_walls() {
        let board = Board::new(10, 20);
        // T spawn occupies columns 0..=2 of its box.
        let left = piece(PieceKind::T, PieceRotation::SPAWN, 0, 0);
        assert_eq!(try_move(&board, &left, -1, 0), Err(InvalidTransform));
        let right = piece(PieceKind::T, PieceRotation::SPAWN, 7, 0);
        assert_eq!(try_move(&board, &right, 1, 0), Err(InvalidTransform));
        let bottom = piece(PieceKind::T, PieceRotation::SPAWN, 3, 18);
        assert_eq!(try_move(&board, &bottom, 0, 1), Err(InvalidTransform));
    }

    #[test]
    fn test_move_rejected_by_filled_cell() {
        let mut board = Board::new(10, 20);
        board.set(4, 2, Cell::Piece(PieceKind::O)).unwrap();
        let t = Piece::spawn(PieceKind::T, 10);
        assert!(try_move(&board, &t, 0, 1).is_err());
        assert!(try_move(&board, &t, 1, 0).is_ok());
    }

    #[test]
    fn test_ghost_cells_do_not_obstruct() {
        let mut board = Board::new(10, 20);
        board.set(4, 2, Cell::Ghost).unwrap();
        let t = Piece::spawn(PieceKind::T, 10);
        assert!(try_move(&board, &t, 0, 1).is_ok());
    }

    #[test]
    fn test_reserved_rows_obstruct() {
        let board = Board::with_reserved_rows(10, 20, 4);
        // I spawn occupies row 1 of its box; the last playable row is 15.
        let i = piece(PieceKind::I, PieceRotation::SPAWN, 3, 14);
        assert!(!collides(&board, &i));
        assert!(is_grounded(&board, &i));
    }

    #[test]
    fn test_moves_never_leave_bounds() {
        let board = Board::from_text(
            &[
                "......", //
                "..#...", //
                "......", //
                "#....#", //
                "......",
            ],
            0,
        )
        .unwrap();
        for kind in PieceKind::ALL {
            for index in 0..4 {
                let rotation = PieceRotation::from_index(index).unwrap();
                for x in -3..7 {
                    for y in -3..6 {
                        let p = piece(kind, rotation, x, y);
                        for (dx, dy) in [(-1, 0), (1, 0), (0, 1), (0, -1)] {
                            if let Ok(moved) = try_move(&board, &p, dx, dy) {
                                for (cx, cy) in moved.occupied_positions() {
                                    let cell = board.get(cx, cy).unwrap();
                                    assert!(cell.is_free(), "{moved} overlaps ({cx}, {cy})");
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_rotate_without_kick() {
        let board = Board::new(10, 20);
        let t = piece(PieceKind::T, PieceRotation::SPAWN, 3, 5);
        let rotated = try_rotate(&board, &t, RotationDirection::Clockwise).unwrap();
        assert_eq!(rotated.kick_index, 0);
        assert_eq!(rotated.piece.rotation(), PieceRotation::RIGHT);
        assert_eq!(rotated.piece.position(), t.position());
    }

    #[test]
    fn test_rotate_kicks_off_left_wall() {
        let board = Board::new(10, 20);
        // Vertical I in the left state hugging the wall: box column 1 is x=0.
        let i = piece(PieceKind::I, PieceRotation::LEFT, -1, 5);
        assert!(!collides(&board, &i));
        let rotated = try_rotate(&board, &i, RotationDirection::Clockwise).unwrap();
        // L->0 candidates: (0,0) (1,0) ... ; (0,0) would put a cell at x=-1.
        assert_eq!(rotated.kick_index, 1);
        assert_eq!(rotated.piece.position(), PiecePosition::new(0, 5));
        assert_eq!(rotated.piece.rotation(), PieceRotation::SPAWN);
    }

    #[test]
    fn test_t_rotation_takes_last_kick() {
        let board = Board::from_text(
            &[
                "......", //
                "......", //
                "...#..", //
                "......", //
                "..#...", //
                "......", //
                "......",
            ],
            0,
        )
        .unwrap();
        let t = piece(PieceKind::T, PieceRotation::SPAWN, 1, 2);
        assert!(!collides(&board, &t));
        // 0->L: (0,0) and (0,2) hit (2,4); (1,0) and (1,-1) hit (3,2).
        let rotated = try_rotate(&board, &t, RotationDirection::CounterClockwise).unwrap();
        assert_eq!(rotated.kick_index, 4);
        assert_eq!(rotated.piece.rotation(), PieceRotation::LEFT);
        assert_eq!(rotated.piece.position(), PiecePosition::new(2, 4));
    }

    #[test]
    fn test_j_half_turn_kicks_up_and_left() {
        let board = Board::from_text(
            &[
                "......", //
                "......", //
                "......", //
                "......", //
                "......", //
                "...###", //
                "....##",
            ],
            0,
        )
        .unwrap();
        let j = piece(PieceKind::J, PieceRotation::SPAWN, 1, 5);
        assert!(!collides(&board, &j));
        // 0->2: (0,0) leaves the floor; (0,-1) and (1,-1) hit (3,5).
        let rotated = try_rotate(&board, &j, RotationDirection::Half).unwrap();
        assert_eq!(rotated.kick_index, 3);
        assert_eq!(rotated.piece.rotation(), PieceRotation::HALF);
        assert_eq!(rotated.piece.position(), PiecePosition::new(0, 4));
    }

    #[test]
    fn test_rotate_fails_when_enclosed() {
        let slot = Board::from_text(
            &[
                "#####", //
                "#...#", //
                "##.##", //
                "#####",
            ],
            0,
        )
        .unwrap();
        let t = piece(PieceKind::T, PieceRotation::HALF, 1, 0);
        assert!(!collides(&slot, &t));
        for direction in [
            RotationDirection::Clockwise,
            RotationDirection::CounterClockwise,
            RotationDirection::Half,
        ] {
            assert_eq!(try_rotate(&slot, &t, direction), Err(InvalidTransform));
        }
    }

    #[test]
    fn test_rotation_is_deterministic() {
        let board = Board::from_text(
            &[
                "..........",
                "..........",
                "..........",
                "#.........",
                "##..######",
                "##...#####",
                "###.######",
            ],
            0,
        )
        .unwrap();
        let t = piece(PieceKind::T, PieceRotation::RIGHT, 2, 3);
        let first = try_rotate(&board, &t, RotationDirection::Clockwise);
        for _ in 0..10 {
            assert_eq!(try_rotate(&board, &t, RotationDirection::Clockwise), first);
        }
    }

    #[test]
    fn test_o_piece_rotation_keeps_cells() {
        let board = Board::new(4, 4);
        let o = piece(PieceKind::O, PieceRotation::SPAWN, 1, 1);
        let rotated = try_rotate(&board, &o, RotationDirection::Half).unwrap();
        let before: Vec<_> = o.occupied_positions().collect();
        let after: Vec<_> = rotated.piece.occupied_positions().collect();
        assert_eq!(before, after);
    }
}
