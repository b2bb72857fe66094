use blockfall_engine::{Action, PieceKind};
use serde::{Deserialize, Serialize};

/// Scripted input for a headless run.
///
/// ```json
/// {
///   "pieces": ["I", "O", "T"],
///   "steps": [{ "action": "moveLeft" }, { "wait_ms": 250 }, { "action": "hardDrop" }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    /// Fixed piece sequence, repeated as needed. The 7-bag is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces: Option<Vec<PieceKind>>,
    pub steps: Vec<Step>,
}

/// One script step: either an input action or a pause in engine time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Action { action: Action },
    Wait { wait_ms: u64 },
}
