//! Rotation kick tables.
//!
//! 90° rotations follow the Guideline Super Rotation System (SRS): one table
//! shared by J, L, S, T and Z, a separate one for I, and none for O. 180°
//! rotations use the SRS+ table for every shape except O.
//!
//! All offsets are in board coordinates, where Y grows downward. The published
//! tables use Y-up, so every `dy` below is the negation of the published value.
//! The first candidate is always `(0, 0)`: the unmodified anchor.

use serde::{Deserialize, Serialize};

use super::piece::PieceRotation;

/// A single kick candidate `(dx, dy)`.
pub type KickOffset = (i32, i32);

/// Group of shapes that share a kick table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum KickClass {
    Jlstz,
    I,
    O,
}

/// Returns the ordered kick candidates for rotating a shape of the given class
/// from one rotation state to another.
///
/// `from == to` yields only the identity candidate.
///
/// # Example
///
/// ```
/// use blockfall_engine::{KickClass, PieceRotation, kick_candidates};
///
/// let kicks = kick_candidates(KickClass::Jlstz, PieceRotation::SPAWN, PieceRotation::RIGHT);
/// assert_eq!(kicks[0], (0, 0));
/// assert_eq!(kicks.len(), 5);
/// ```
#[must_use]
pub fn kick_candidates(
    class: KickClass,
    from: PieceRotation,
    to: PieceRotation,
) -> &'static [KickOffset] {
    if class == KickClass::O || from == to {
        return &IDENTITY;
    }
    let quarter_turns = (to.as_index() + 4 - from.as_index()) % 4;
    if quarter_turns == 2 {
        return &HALF_TURN_KICKS[from.as_index()];
    }
    let table = match class {
        KickClass::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    let clockwise = quarter_turns == 1;
    &table[from.as_index() * 2 + usize::from(!clockwise)]
}

const IDENTITY: [KickOffset; 1] = [(0, 0)];

/// Indexed by `from * 2 + (0 for clockwise, 1 for counter-clockwise)`.
const JLSTZ_KICKS: [[KickOffset; 5]; 8] = [
    // 0->R
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 0->L
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // R->2
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // R->0
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2->L
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->R
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // L->0
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // L->2
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// Same layout as [`JLSTZ_KICKS`].
const I_KICKS: [[KickOffset; 5]; 8] = [
    // 0->R
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 0->L
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // R->2
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // R->0
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 2->L
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 2->R
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // L->0
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // L->2
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
];

/// Indexed by the source rotation state.
const HALF_TURN_KICKS: [[KickOffset; 6]; 4] = [
    // 0->2
    [(0, 0), (0, -1), (1, -1), (-1, -1), (1, 0), (-1, 0)],
    // R->L
    [(0, 0), (1, 0), (1, -2), (1, -1), (0, -2), (0, -1)],
    // 2->0
    [(0, 0), (0, 1), (-1, 1), (1, 1), (-1, 0), (1, 0)],
    // L->R
    [(0, 0), (-1, 0), (-1, -2), (-1, -1), (0, -2), (0, -1)],
];
