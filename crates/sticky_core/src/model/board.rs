//! Board domain model.
//!
//! # Responsibility
//! - Define regular boards and the read-only Done board view.
//!
//! # Invariants
//! - Regular boards are user-created, renamable and deletable.
//! - The Done board is synthetic: it has no id in the domain and is never
//!   stored in the regular board collection.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Display name of the synthetic board collecting completed notes.
pub const DONE_BOARD_NAME: &str = "Done";

/// Color token assigned to newly created boards.
pub const DEFAULT_BOARD_COLOR: &str = "bg-black border-2 border-green-500";

/// Color token of the Done board view.
pub const DONE_BOARD_COLOR: &str = "bg-black border-2 border-green-600";

/// Stable identifier of a regular board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub i64);

impl Display for BoardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-created named container for notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    /// Opaque presentation token; core never interprets it.
    pub color: String,
}

impl Board {
    /// Creates a board with the default color token.
    pub fn new(id: BoardId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: DEFAULT_BOARD_COLOR.to_string(),
        }
    }
}

/// Read-only view of the Done board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoneBoard {
    pub name: &'static str,
    pub color: &'static str,
}

impl Default for DoneBoard {
    fn default() -> Self {
        Self {
            name: DONE_BOARD_NAME,
            color: DONE_BOARD_COLOR,
        }
    }
}

/// A reference to a board captured at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRef {
    pub id: BoardId,
    pub name: String,
}
