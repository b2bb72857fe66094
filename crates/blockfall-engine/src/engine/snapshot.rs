//! Read-only views handed to renderers.

use std::fmt;

use serde::Serialize;

use crate::{Board, Cell, Piece, PieceKind};

use super::{
    config::{BoardSize, PREVIEW_SLOT_HEIGHT},
    session::SessionState,
};

/// Copy of one board's cells, indexed `cells[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Cell>>,
}

impl BoardView {
    fn from_board(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            cells: board.rows().map(<[Cell]>::to_vec).collect(),
        }
    }

    /// Main board with the ghost and the active piece drawn in. The active
    /// piece wins where the two overlap.
    pub(crate) fn main(board: &Board, active: Option<&Piece>, ghost: Option<&Piece>) -> Self {
        let mut board = board.clone();
        if let Some(ghost) = ghost {
            draw(&mut board, ghost, Cell::Ghost);
        }
        if let Some(active) = active {
            draw(&mut board, active, Cell::Piece(active.kind()));
        }
        Self::from_board(&board)
    }

    /// Preview board with one piece per four-row slot, top to bottom.
    pub(crate) fn preview(size: BoardSize, kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let mut board = Board::new(size.width, size.height);
        let slots = size.height / PREVIEW_SLOT_HEIGHT;
        for (slot, kind) in kinds.into_iter().take(slots).enumerate() {
            let top = i32::try_from(slot * PREVIEW_SLOT_HEIGHT).unwrap_or(i32::MAX);
            let piece = Piece::spawn(kind, size.width).translated(0, top + 1);
            draw(&mut board, &piece, Cell::Piece(kind));
        }
        Self::from_board(&board)
    }

    /// Returns the cell at `(x, y)`, or `None` outside the view.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(y)?.get(x).copied()
    }
}

fn draw(board: &mut Board, piece: &Piece, cell: Cell) {
    if let Err(err) = board.fill_piece_as(piece, cell) {
        log::debug!("skipped drawing {piece}: {err}");
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub main: BoardView,
    pub hold: BoardView,
    pub next: BoardView,
    pub active: Option<Piece>,
    pub ghost: Option<Piece>,
    pub held: Option<PieceKind>,
    pub can_hold: bool,
    pub next_pieces: Vec<PieceKind>,
}
