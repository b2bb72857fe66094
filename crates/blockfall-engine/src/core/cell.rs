use serde::{Deserialize, Serialize};

use super::piece::PieceKind;

/// Content of a single board cell.
///
/// Every cell of every board holds exactly one of these values. Mapping a cell
/// to a display color is the renderer's job; the engine only tags what occupies
/// the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing here.
    #[default]
    Empty,
    /// Locked (or active) mino of a specific shape.
    Piece(PieceKind),
    /// Ghost piece preview (shows where the active piece will land).
    Ghost,
    /// Non-playable reserved cell.
    Blocked,
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Returns `true` if a piece may move into this cell.
    ///
    /// Ghost markers are render annotations and never obstruct a piece.
    #[must_use]
    pub fn is_free(self) -> bool {
        matches!(self, Cell::Empty | Cell::Ghost)
    }

    /// Returns `true` if the cell counts toward completing a row.
    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_free()
    }

    /// Single character used by the text renderer and board fixtures.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::{Cell, PieceKind};
    ///
    /// assert_eq!(Cell::Empty.as_char(), '.');
    /// assert_eq!(Cell::Piece(PieceKind::T).as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Piece(kind) => kind.as_char(),
            Cell::Ghost => '+',
            Cell::Blocked => '#',
        }
    }

    /// Parses a cell from its [`Self::as_char`] form.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '+' => Some(Cell::Ghost),
            '#' => Some(Cell::Blocked),
            _ => match PieceKind::from_char(c) {
                Some(kind) => Some(Cell::Piece(kind)),
                None => None,
            },
        }
    }
}
