use crate::{Board, Piece};

use super::validator::try_move;

/// Returns where `piece` would come to rest if dropped straight down.
///
/// Pure: the board is only read.
#[must_use]
pub fn project(board: &Board, piece: &Piece) -> Piece {
    let mut ghost = *piece;
    while let Ok(moved) = try_move(board, &ghost, 0, 1) {
        ghost = moved;
    }
    ghost
}

/// Number of rows `piece` can fall before it rests.
#[must_use]
pub fn drop_distance(board: &Board, piece: &Piece) -> i32 {
    project(board, piece).position().y() - piece.position().y()
}
