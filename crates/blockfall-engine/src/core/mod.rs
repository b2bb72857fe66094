//! Pure data model: cells, the board grid, piece geometry and kick tables.

pub use self::{board::*, cell::*, kick::*, piece::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod kick;
pub(crate) mod piece;
