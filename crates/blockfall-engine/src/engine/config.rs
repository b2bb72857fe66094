use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, PieceSeed};

/// Width and height of a board, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardSize {
    pub width: usize,
    pub height: usize,
}

impl BoardSize {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// Tunable parameters of a [`GameSession`](crate::GameSession).
///
/// Every field has a default, so a configuration file only needs the values it
/// changes. Durations are plain milliseconds.
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "lock_delay_ms": 300 }"#).unwrap();
/// assert_eq!(config.lock_delay_ms, 300);
/// assert_eq!(config.board_width, 10);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Blocked rows at the bottom of the main board.
    pub reserved_rows: usize,
    /// Time between gravity steps.
    pub gravity_interval_ms: u64,
    /// Time a grounded piece may stay active before it locks.
    pub lock_delay_ms: u64,
    /// Maximum lock countdown restarts per piece from moves and rotations.
    pub lock_reset_limit: u8,
    /// Minimum number of queued pieces kept visible.
    pub min_lookahead: usize,
    pub hold_board: BoardSize,
    pub next_board: BoardSize,
    /// Seed for the 7-bag randomizer. A random seed is drawn when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<PieceSeed>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            reserved_rows: 0,
            gravity_interval_ms: 1000,
            lock_delay_ms: 500,
            lock_reset_limit: 15,
            min_lookahead: 7,
            hold_board: BoardSize::new(6, 4),
            next_board: BoardSize::new(6, 20),
            seed: None,
        }
    }
}

/// Narrowest board every shape fits on.
const MIN_BOARD_WIDTH: usize = 4;

impl EngineConfig {
    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.gravity_interval_ms)
    }

    #[must_use]
    pub fn lock_delay(&self) -> Duration {
        Duration::from_millis(self.lock_delay_ms)
    }

    #[must_use]
    pub fn main_board(&self) -> BoardSize {
        BoardSize::new(self.board_width, self.board_height)
    }

    /// Checks that a session can run with these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The main board needs two rows to spawn any shape; previews hold one
        // piece per slot.
        let boards = [
            ("main", self.main_board(), 2),
            ("hold", self.hold_board, PREVIEW_SLOT_HEIGHT),
            ("next", self.next_board, PREVIEW_SLOT_HEIGHT),
        ];
        for (name, size, min_height) in boards {
            if size.width < MIN_BOARD_WIDTH || size.height < min_height {
                return Err(ConfigError::BoardTooSmall {
                    name,
                    width: size.width,
                    height: size.height,
                    min_width: MIN_BOARD_WIDTH,
                    min_height,
                });
            }
        }
        if self.reserved_rows + 2 > self.board_height {
            return Err(ConfigError::ReservedRowsTooMany {
                reserved_rows: self.reserved_rows,
                height: self.board_height,
            });
        }
        if self.gravity_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "gravity_interval_ms",
            });
        }
        if self.lock_delay_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                name: "lock_delay_ms",
            });
        }
        // The next preview shows queued pieces only, so the queue must always
        // hold enough of them. A valid next board has room for at least one.
        let preview_len = self.next_preview_len();
        if self.min_lookahead < preview_len {
            return Err(ConfigError::LookaheadTooShort {
                min_lookahead: self.min_lookahead,
                preview_len,
            });
        }
        Ok(())
    }

    /// Number of upcoming pieces the next preview board has room for.
    #[must_use]
    pub fn next_preview_len(&self) -> usize {
        self.next_board.height / PREVIEW_SLOT_HEIGHT
    }
}

/// Rows reserved for each piece on the preview boards.
pub(crate) const PREVIEW_SLOT_HEIGHT: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        EngineConfig::default().validate().unwrap();
        assert_eq!(EngineConfig::default().lock_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "board_width": 12,
            "hold_board": { "width": 8, "height": 4 },
            "seed": "0123456789abcdef0123456789abcdef"
        }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.board_width, 12);
        assert_eq!(config.board_height, 20);
        assert_eq!(config.hold_board, BoardSize::new(8, 4));
        assert!(config.seed.is_some());
    }

    #[test]
    fn test_serialization_omits_missing_seed() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        assert!(!json.contains("seed"), "{json}");
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EngineConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let narrow = EngineConfig {
            board_width: 3,
            ..EngineConfig::default()
        };
        assert!(matches!(
            narrow.validate(),
            Err(ConfigError::BoardTooSmall { name: "main", .. })
        ));

        let flat_hold = EngineConfig {
            hold_board: BoardSize::new(6, 0),
            ..EngineConfig::default()
        };
        assert!(matches!(
            flat_hold.validate(),
            Err(ConfigError::BoardTooSmall { name: "hold", .. })
        ));

        let reserved = EngineConfig {
            reserved_rows: 19,
            ..EngineConfig::default()
        };
        assert!(matches!(
            reserved.validate(),
            Err(ConfigError::ReservedRowsTooMany { .. })
        ));

        let no_lock = EngineConfig {
            lock_delay_ms: 0,
            ..EngineConfig::default()
        };
        assert_eq!(
            no_lock.validate(),
            Err(ConfigError::ZeroDuration {
                name: "lock_delay_ms"
            })
        );

        let no_lookahead = EngineConfig {
            min_lookahead: 0,
            ..EngineConfig::default()
        };
        assert_eq!(
            no_lookahead.validate(),
            Err(ConfigError::LookaheadTooShort {
                min_lookahead: 0,
                preview_len: 5,
            })
        );
    }

    #[test]
    fn test_lookahead_must_fill_next_preview() {
        let short = EngineConfig {
            min_lookahead: 1,
            ..EngineConfig::default()
        };
        assert_eq!(
            short.validate(),
            Err(ConfigError::LookaheadTooShort {
                min_lookahead: 1,
                preview_len: 5,
            })
        );

        let exact = EngineConfig {
            min_lookahead: 5,
            ..EngineConfig::default()
        };
        exact.validate().unwrap();

        let one_slot = EngineConfig {
            min_lookahead: 1,
            next_board: BoardSize::new(6, 4),
            ..EngineConfig::default()
        };
        one_slot.validate().unwrap();
    }

    #[test]
    fn test_next_preview_len() {
        assert_eq!(EngineConfig::default().next_preview_len(), 5);
    }
}
