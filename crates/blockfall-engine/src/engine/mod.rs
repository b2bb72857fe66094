//! Game rules on top of the [`core`](crate::core) data model.
//!
//! - [`validator`] - collision checks, moves and kicked rotations
//! - [`LockDelay`] - grounded/airborne tracking and the lock countdown
//! - [`PieceQueue`] - upcoming pieces fed by a [`PieceGenerator`]
//! - [`HoldSlot`] - the once-per-lock hold slot
//! - [`line_clear`] - full-row detection and removal
//! - [`ghost`] - landing position of the active piece
//! - [`GameSession`] - owns all of the above and serializes every change through
//!   one command queue
//!
//! # Game Flow
//!
//! 1. A piece spawns centred at the top of the board
//! 2. Actions move, rotate or hold it; gravity moves it down on a timer
//! 3. Once grounded, the lock countdown starts; a hard drop skips it
//! 4. On lock the piece is merged, full rows are cleared and the next piece
//!    spawns
//! 5. Repeat until a new piece cannot spawn (game over)

pub use self::{
    action::*, config::*, hold::*, lock_delay::*, piece_queue::*, session::*, snapshot::*,
    timer::*,
};

mod action;
mod config;
pub mod ghost;
mod hold;
pub mod line_clear;
mod lock_delay;
mod piece_queue;
mod session;
mod snapshot;
mod timer;
pub mod validator;
