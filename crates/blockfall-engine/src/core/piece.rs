use std::{fmt, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::kick::KickClass;

/// A piece (tetromino) with position, rotation, and shape.
///
/// Pieces are immutable values: translation and rotation return new `Piece`s and
/// leave the original untouched, so a rejected transform never has to be undone.
///
/// # Coordinate System
///
/// - The anchor is the top-left corner of the shape's bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - Coordinates are signed so kicked candidates can be expressed even when they
///   end up off the board (the validator rejects them)
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind, RotationDirection};
///
/// let piece = Piece::spawn(PieceKind::T, 10);
/// let moved = piece.translated(1, 0);
/// let rotated = moved.rotated(RotationDirection::Clockwise);
/// assert_eq!(piece.position().x() + 1, rotated.position().x());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, rotation: PieceRotation, position: PiecePosition) -> Self {
        Self {
            position,
            rotation,
            kind,
        }
    }

    /// Creates a piece in its spawn rotation, horizontally centred on a board of
    /// the given width, with its bounding box touching the top row.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let width = i32::try_from(board_width).unwrap_or(i32::MAX);
        let size = i32::try_from(kind.box_size()).unwrap_or(0);
        Self::new(
            kind,
            PieceRotation::SPAWN,
            PiecePosition::new((width - size) / 2, 0),
        )
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Board coordinates of the four occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .occupied_offsets(self.rotation)
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.translated(dx, dy),
            ..*self
        }
    }

    #[must_use]
    pub fn with_rotation(&self, rotation: PieceRotation) -> Self {
        Self { rotation, ..*self }
    }

    /// Rotates in place around the anchor, without any kick.
    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        self.with_rotation(self.rotation.rotated(direction))
    }
}

impl fmt::Display for Piece {
    /// Format: "kind#rotation@x,y" (e.g., "S#1@4,18")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.x,
            self.position.y
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece {input:?}: {reason}")]
pub struct ParsePieceError {
    input: String,
    reason: &'static str,
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParsePieceError {
            input: s.to_owned(),
            reason,
        };

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| err("missing '#'"))?;
        let (rotation_str, position_str) =
            rest.split_once('@').ok_or_else(|| err("missing '@'"))?;
        let (x_str, y_str) = position_str
            .split_once(',')
            .ok_or_else(|| err("missing ','"))?;

        let mut chars = kind_str.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => PieceKind::from_char(c).ok_or_else(|| err("unknown piece kind"))?,
            _ => return Err(err("piece kind must be a single character")),
        };
        let rotation = rotation_str
            .parse::<u8>()
            .ok()
            .and_then(PieceRotation::from_index)
            .ok_or_else(|| err("rotation must be 0-3"))?;
        let x = x_str.parse().map_err(|_| err("invalid x coordinate"))?;
        let y = y_str.parse().map_err(|_| err("invalid y coordinate"))?;

        Ok(Self::new(kind, rotation, PiecePosition::new(x, y)))
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Anchor position of a piece (top-left of its bounding box).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise ("right")
/// - `2`: 180°
/// - `3`: 270° clockwise ("left")
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);
    pub const RIGHT: Self = Self(1);
    pub const HALF: Self = Self(2);
    pub const LEFT: Self = Self(3);

    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 4 { Some(Self(index)) } else { None }
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        Self((self.0 + direction.quarter_turns()) % 4)
    }

    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

/// Direction of a requested rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
    Half,
}

impl RotationDirection {
    /// Number of clockwise quarter turns equivalent to this direction.
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::Half => 2,
            RotationDirection::CounterClockwise => 3,
        }
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every shape, in declaration order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Edge length of the square bounding box the shape rotates in.
    #[must_use]
    pub const fn box_size(self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    #[must_use]
    pub const fn kick_class(self) -> KickClass {
        match self {
            PieceKind::I => KickClass::I,
            PieceKind::O => KickClass::O,
            _ => KickClass::Jlstz,
        }
    }

    /// Returns an iterator of occupied offsets (relative to the anchor) for the
    /// piece in the given rotation.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        let shape = &PIECE_SHAPES[self as usize][rotation.as_index()];
        (0..4_u8).flat_map(move |dy| {
            (0..4_u8).filter_map(move |dx| {
                shape[usize::from(dy)][usize::from(dx)].then_some((i32::from(dx), i32::from(dy)))
            })
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Occupancy of a shape within its 4×4 bounding box, indexed `[y][x]`.
type PieceShape = [[bool; 4]; 4];

/// Generates all 4 rotation states of a piece shape by rotating 90° clockwise.
///
/// # Arguments
///
/// * `size` - Effective size of the piece (3 for most pieces, 4 for I, 2 for O)
/// * `shape` - Initial piece shape at spawn rotation
const fn shape_rotations(size: usize, shape: &PieceShape) -> [PieceShape; 4] {
    let mut rotates = [*shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, &[EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, &[[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, &[[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
    ]
};
