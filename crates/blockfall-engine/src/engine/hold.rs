use serde::{Deserialize, Serialize};

use crate::PieceKind;

/// Single-shape hold slot with the once-per-lock usage rule.
///
/// The slot is armed again only when the active piece locks, so between a
/// spawn and the following lock at most one swap can happen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HoldSlot {
    held: Option<PieceKind>,
    used: bool,
}

impl HoldSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    /// Returns `true` if the slot has already been used for the current piece.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        !self.used
    }

    /// Stores `active` and returns the previously held shape.
    ///
    /// Returns `None` without touching the slot if it has already been used;
    /// the caller treats that as a no-op. Otherwise the result is
    /// `Some(previous)`, where `previous` is `None` for an empty slot.
    pub fn swap(&mut self, active: PieceKind) -> Option<Option<PieceKind>> {
        if self.used {
            return None;
        }
        self.used = true;
        Some(self.held.replace(active))
    }

    /// Re-arms the slot. Called when the active piece locks.
    pub fn unlock(&mut self) {
        self.used = false;
    }

    /// Empties the slot and re-arms it.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
