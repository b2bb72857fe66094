use std::fmt;

use crate::OutOfBounds;

use super::{cell::Cell, piece::Piece};

/// Fixed-size grid of [`Cell`]s.
///
/// Cells are stored row-major and addressed as `(x, y)` with `(0, 0)` at the
/// top-left. Dimensions are set at construction and never change; only cell
/// contents mutate.
///
/// # Reserved rows
///
/// The bottom `reserved_rows` rows are pre-filled with [`Cell::Blocked`]. They
/// are not part of the playable area: they obstruct pieces like any filled cell
/// but are never removed by a line clear. This lets a board present a smaller
/// play area than its logical size.
///
/// ```text
///  y=0   . . . . . .
///  y=1   . . . . . .     playable rows
///  y=2   . . . . . .
///  y=3   # # # # # #     reserved row (reserved_rows = 1)
/// ```
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Cell, PieceKind};
///
/// let mut board = Board::new(10, 20);
/// board.set(0, 19, Cell::Piece(PieceKind::I)).unwrap();
/// assert_eq!(board.get(0, 19).unwrap(), Cell::Piece(PieceKind::I));
/// assert!(board.get(10, 0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    reserved_rows: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board without reserved rows.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_reserved_rows(width, height, 0)
    }

    /// Creates a board whose bottom `reserved_rows` rows are blocked.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or if `reserved_rows > height`.
    #[must_use]
    pub fn with_reserved_rows(width: usize, height: usize, reserved_rows: usize) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be non-zero");
        assert!(
            reserved_rows <= height,
            "reserved rows ({reserved_rows}) exceed board height ({height})"
        );
        let mut board = Self {
            width,
            height,
            reserved_rows,
            cells: vec![Cell::Empty; width * height],
        };
        board.clear();
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn reserved_rows(&self) -> usize {
        self.reserved_rows
    }

    /// Number of rows above the reserved boundary.
    #[must_use]
    pub fn playable_height(&self) -> usize {
        self.height - self.reserved_rows
    }

    #[must_use]
    pub fn is_reserved_row(&self, y: usize) -> bool {
        y >= self.playable_height()
    }

    /// Cell value a row is reset to by [`Self::clear`] and line clears.
    #[must_use]
    pub fn blank_cell(&self, y: usize) -> Cell {
        if self.is_reserved_row(y) {
            Cell::Blocked
        } else {
            Cell::Empty
        }
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, OutOfBounds> {
        let out_of_bounds = || OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        };
        let ux = usize::try_from(x).map_err(|_| out_of_bounds())?;
        let uy = usize::try_from(y).map_err(|_| out_of_bounds())?;
        if ux >= self.width || uy >= self.height {
            return Err(out_of_bounds());
        }
        Ok(uy * self.width + ux)
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Cell, OutOfBounds> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), OutOfBounds> {
        let i = self.index(x, y)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Resets every playable cell to [`Cell::Empty`] and every reserved cell to
    /// [`Cell::Blocked`].
    pub fn clear(&mut self) {
        for y in 0..self.height {
            let blank = self.blank_cell(y);
            self.row_mut(y).fill(blank);
        }
    }

    /// Returns the cells of row `y`, or `None` if the row does not exist.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        (y < self.height).then(|| &self.cells[y * self.width..][..self.width])
    }

    fn row_mut(&mut self, y: usize) -> &mut [Cell] {
        &mut self.cells[y * self.width..][..self.width]
    }

    /// Iterates over all rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Returns `true` if every cell of row `y` is filled.
    #[must_use]
    pub fn is_row_filled(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_filled()))
    }

    /// Removes row `y`, shifts every row above it down by one, and inserts a
    /// blank row at the top.
    ///
    /// # Panics
    ///
    /// Panics if `y` is not a row of this board.
    pub fn remove_row(&mut self, y: usize) {
        assert!(y < self.height, "row {y} out of range");
        self.cells
            .copy_within(0..y * self.width, self.width);
        let blank = self.blank_cell(0);
        self.row_mut(0).fill(blank);
    }

    /// Writes the piece's cells into the board as `Cell::Piece(kind)`.
    ///
    /// This is called when a piece is locked into position.
    pub fn fill_piece(&mut self, piece: &Piece) -> Result<(), OutOfBounds> {
        self.fill_piece_as(piece, Cell::Piece(piece.kind()))
    }

    /// Writes the piece's cells into the board with a specific cell value.
    ///
    /// Useful for rendering ghost pieces or other annotations on a copy of the
    /// board. Nothing is written if any cell is out of bounds.
    pub fn fill_piece_as(&mut self, piece: &Piece, cell: Cell) -> Result<(), OutOfBounds> {
        let mut indices = [0; 4];
        for (slot, (x, y)) in indices.iter_mut().zip(piece.occupied_positions()) {
            *slot = self.index(x, y)?;
        }
        for i in indices {
            self.cells[i] = cell;
        }
        Ok(())
    }

    /// Builds a board from text rows using [`Cell::from_char`] symbols.
    ///
    /// Returns `None` if the rows are empty, ragged, or contain unknown symbols.
    ///
    /// ```
    /// use blockfall_engine::{Board, Cell};
    ///
    /// let board = Board::from_text(&["....", "#..#", "####"], 1).unwrap();
    /// assert_eq!(board.width(), 4);
    /// assert_eq!(board.get(0, 1).unwrap(), Cell::Blocked);
    /// assert!(board.is_reserved_row(2));
    /// ```
    #[must_use]
    pub fn from_text(rows: &[&str], reserved_rows: usize) -> Option<Self> {
        let width = rows.first()?.chars().count();
        if width == 0 || reserved_rows > rows.len() {
            return None;
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            if row.chars().count() != width {
                return None;
            }
            for c in row.chars() {
                cells.push(Cell::from_char(c)?);
            }
        }
        Some(Self {
            width,
            height: rows.len(),
            reserved_rows,
            cells,
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
