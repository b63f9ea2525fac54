//! Sticky note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its completion status.
//! - Provide derived projections (location, origin board, overdue state).
//!
//! # Invariants
//! - `board_id` is the board an active note lives on, and the board a
//!   completed note is restored to.
//! - Completion data exists only inside `NoteStatus::Completed`.
//! - Overdue is derived from `now`, never stored.

use crate::model::board::{BoardId, BoardRef};
use crate::timing::countdown::{time_remaining, TimeRemaining};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Color token assigned to notes created without an explicit color.
pub const DEFAULT_NOTE_COLOR: &str = "bg-black border-green-400 text-green-400";

/// Horizontal range used when a note is (re)placed at random.
pub const CANVAS_X_RANGE: Range<f64> = 20.0..320.0;
/// Vertical range used when a note is (re)placed at random.
pub const CANVAS_Y_RANGE: Range<f64> = 20.0..220.0;

/// Stable identifier of a note. Derived from creation time in epoch ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cosmetic 2-D placement on a board canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Picks a random position inside the canvas range.
    pub fn random<G: Rng + ?Sized>(rng: &mut G) -> Self {
        Self {
            x: rng.random_range(CANVAS_X_RANGE),
            y: rng.random_range(CANVAS_Y_RANGE),
        }
    }
}

/// Completion lifecycle of a note.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NoteStatus {
    /// Lives on its board.
    #[default]
    Active,
    /// Lives in the Done view until restored.
    Completed {
        completed_at: DateTime<Utc>,
        /// Name of the origin board when the note was completed.
        original_board_name: String,
    },
}

/// Where a note is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteLocation {
    Board(BoardId),
    Done,
}

/// A single text item with optional due date and completion state.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub board_id: BoardId,
    pub content: String,
    /// Opaque presentation token; core never interprets it.
    pub color: String,
    pub position: Position,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: NoteStatus,
}

impl Note {
    /// Creates an active note with default color at the canvas origin.
    pub fn new(
        id: NoteId,
        board_id: BoardId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            board_id,
            content: content.into(),
            color: DEFAULT_NOTE_COLOR.to_string(),
            position: Position::default(),
            created_at,
            due_date: None,
            status: NoteStatus::Active,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, NoteStatus::Completed { .. })
    }

    /// Returns the view this note is displayed in.
    pub fn location(&self) -> NoteLocation {
        match self.status {
            NoteStatus::Active => NoteLocation::Board(self.board_id),
            NoteStatus::Completed { .. } => NoteLocation::Done,
        }
    }

    /// Returns the origin board snapshot of a completed note.
    pub fn original_board(&self) -> Option<BoardRef> {
        match &self.status {
            NoteStatus::Active => None,
            NoteStatus::Completed {
                original_board_name,
                ..
            } => Some(BoardRef {
                id: self.board_id,
                name: original_board_name.clone(),
            }),
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            NoteStatus::Active => None,
            NoteStatus::Completed { completed_at, .. } => Some(completed_at),
        }
    }

    /// Countdown against the due date, if one is set.
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Option<TimeRemaining> {
        self.due_date.map(|due| time_remaining(due, now))
    }

    /// Due date in the past and not completed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < now)
    }
}
