//! Rules engine for a falling-block puzzle game.
//!
//! The crate owns the playing field, the active and queued pieces, and every
//! transition that can happen to them. Rendering, input devices and the clock
//! source live outside; the engine only needs to be told that an [`Action`] was
//! requested or that time has advanced.
//!
//! - [`core`] - board, cells, piece geometry and kick tables
//! - [`engine`] - validator, lock delay, queue/hold, line clear, ghost and the
//!   [`GameSession`] that ties them together
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Action, EngineConfig, GameSession};
//!
//! let mut session = GameSession::new(EngineConfig::default()).unwrap();
//! session.apply_action(Action::MoveLeft).unwrap();
//! session.apply_action(Action::HardDrop).unwrap();
//! session.tick(Duration::from_millis(16)).unwrap();
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.main.width, 10);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A requested move or rotation was rejected by the validator.
///
/// This is an expected outcome, not a fault: the piece is left unchanged and the
/// caller may simply try again on a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("transform rejected: piece would collide or leave the board")]
pub struct InvalidTransform;

/// A board accessor was called with coordinates outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({x}, {y}) is outside the {width}x{height} board")]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

/// The piece generator could not keep the queue filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece generator ran dry: requested {requested} pieces, {available} available")]
pub struct QueueUnderflow {
    pub requested: usize,
    pub available: usize,
}

/// An [`EngineConfig`] value that the engine cannot run with.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("{name} board must be at least {min_width}x{min_height}, got {width}x{height}")]
    BoardTooSmall {
        name: &'static str,
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
    #[display("reserved rows ({reserved_rows}) leave no room to spawn on a board of height {height}")]
    ReservedRowsTooMany { reserved_rows: usize, height: usize },
    #[display("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
    #[display("minimum lookahead ({min_lookahead}) cannot fill the {preview_len}-piece next preview")]
    LookaheadTooShort {
        min_lookahead: usize,
        preview_len: usize,
    },
}

/// Errors surfaced by [`GameSession`] operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EngineError {
    #[display("{_0}")]
    QueueUnderflow(QueueUnderflow),
    #[display("{_0}")]
    OutOfBounds(OutOfBounds),
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
}
