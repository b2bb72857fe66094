use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Piece, PieceKind};

/// A discrete input request.
///
/// Each action maps to one [`GameSession`](crate::GameSession) operation; the
/// engine knows nothing about the keys or devices that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    RotateCcw,
    Rotate180,
    Hold,
    HardDrop,
    /// Toggles between playing and paused.
    Pause,
    Reset,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::RotateCw,
        Action::RotateCcw,
        Action::Rotate180,
        Action::Hold,
        Action::HardDrop,
        Action::Pause,
        Action::Reset,
    ];

    /// Name used in scripts and configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::SoftDrop => "softDrop",
            Action::RotateCw => "rotateCw",
            Action::RotateCcw => "rotateCcw",
            Action::Rotate180 => "rotate180",
            Action::Hold => "hold",
            Action::HardDrop => "hardDrop",
            Action::Pause => "pause",
            Action::Reset => "reset",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Action::MoveLeft => "shift the active piece one column left",
            Action::MoveRight => "shift the active piece one column right",
            Action::SoftDrop => "move the active piece one row down",
            Action::RotateCw => "rotate clockwise, with kicks",
            Action::RotateCcw => "rotate counter-clockwise, with kicks",
            Action::Rotate180 => "rotate half a turn, with kicks",
            Action::Hold => "swap the active piece with the hold slot (once per lock)",
            Action::HardDrop => "drop the active piece to its resting place and lock it",
            Action::Pause => "pause or resume the session",
            Action::Reset => "start a new game",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown action {input:?}")]
pub struct ParseActionError {
    input: String,
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseActionError {
                input: s.to_owned(),
            })
    }
}

/// Something that happened inside a session, reported in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SessionEvent {
    /// A new active piece entered play.
    Spawned { piece: Piece },
    /// The active piece went into the hold slot and `spawned` replaced it.
    Held { held: PieceKind, spawned: PieceKind },
    /// A piece was merged into the board.
    Locked { piece: Piece },
    /// Rows removed after a lock, as indices before removal.
    LinesCleared { rows: Vec<usize> },
    /// A new piece could not spawn.
    GameOver,
    Paused,
    Resumed,
    Reset,
}
