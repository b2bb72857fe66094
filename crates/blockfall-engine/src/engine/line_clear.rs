//! Full-row detection and removal.
//!
//! Only playable rows take part. Reserved rows hold [`Cell::Blocked`] and can
//! never be entered by a piece, so they are never removed.
//!
//! [`Cell::Blocked`]: crate::Cell::Blocked

use crate::Board;

/// Returns the indices of every full playable row, top to bottom.
#[must_use]
pub fn scan(board: &Board) -> Vec<usize> {
    (0..board.playable_height())
        .filter(|&y| board.is_row_filled(y))
        .collect()
}

/// Removes the given rows, shifting the stack above each one down.
///
/// `rows` are indices into the board as it was before any removal. Reserved
/// rows and out-of-range indices are ignored.
pub fn clear_rows(board: &mut Board, rows: &[usize]) {
    let mut rows = rows
        .iter()
        .copied()
        .filter(|&y| y < board.playable_height())
        .collect::<Vec<_>>();
    rows.sort_unstable();
    rows.dedup();
    // Removing a row only moves the rows above it, so going top to bottom keeps
    // every remaining index valid.
    for y in rows {
        board.remove_row(y);
    }
}

/// Scans and clears in one step, returning the cleared row indices.
pub fn clear_full_rows(board: &mut Board) -> Vec<usize> {
    let rows = scan(board);
    clear_rows(board, &rows);
    rows
}
