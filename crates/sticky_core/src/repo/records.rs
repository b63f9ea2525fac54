//! Persisted JSON record layout for boards and notes.
//!
//! # Responsibility
//! - Mirror the on-disk layout: camelCase fields, ISO-8601 timestamps and
//!   the `-1` Done board sentinel.
//! - Convert between records and domain types.
//!
//! # Invariants
//! - The sentinel id never leaves this module; domain code uses
//!   `NoteStatus` and `DoneBoard` instead.
//! - `originalBoardId/originalBoardName` are written only for completed
//!   notes.

use crate::model::board::{Board, BoardId, DoneBoard};
use crate::model::note::{Note, NoteId, NoteStatus, Position, DEFAULT_NOTE_COLOR};
use crate::repo::state_repo::{RepoError, RepoResult};
use crate::timing::input::parse_due_input;
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

/// Board id reserved for the Done board in persisted records.
pub const DONE_BOARD_ID: i64 = -1;

/// Origin name used when a completed note's board has no name on record.
pub const UNKNOWN_BOARD_NAME: &str = "Unknown Board";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done_board: Option<bool>,
}

impl BoardRecord {
    pub fn is_done_board(&self) -> bool {
        self.id == DONE_BOARD_ID || self.is_done_board == Some(true)
    }

    fn done(view: DoneBoard) -> Self {
        Self {
            id: DONE_BOARD_ID,
            name: view.name.to_string(),
            color: view.color.to_string(),
            is_done_board: Some(true),
        }
    }
}

impl From<&Board> for BoardRecord {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id.0,
            name: board.name.clone(),
            color: board.color.clone(),
            is_done_board: None,
        }
    }
}

/// Encodes regular boards followed by the Done board entry.
pub fn boards_to_records(boards: &[Board]) -> Vec<BoardRecord> {
    boards
        .iter()
        .map(BoardRecord::from)
        .chain(std::iter::once(BoardRecord::done(DoneBoard::default())))
        .collect()
}

/// Decodes regular boards, dropping the Done board entry.
pub fn boards_from_records(records: Vec<BoardRecord>) -> Vec<Board> {
    records
        .into_iter()
        .filter(|record| !record.is_done_board())
        .map(|record| Board {
            id: BoardId(record.id),
            name: record.name,
            color: record.color,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: i64,
    pub board_id: i64,
    pub content: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_board_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_board_name: Option<String>,
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        let mut record = Self {
            id: note.id.0,
            board_id: note.board_id.0,
            content: note.content.clone(),
            color: note.color.clone(),
            x: note.position.x,
            y: note.position.y,
            created_at: format_instant(note.created_at),
            due_date: note.due_date.map(format_instant),
            completed: Some(note.is_completed()),
            completed_at: None,
            original_board_id: None,
            original_board_name: None,
        };

        if let NoteStatus::Completed {
            completed_at,
            original_board_name,
        } = &note.status
        {
            record.board_id = DONE_BOARD_ID;
            record.completed_at = Some(format_instant(*completed_at));
            record.original_board_id = Some(note.board_id.0);
            record.original_board_name = Some(original_board_name.clone());
        }

        record
    }
}

impl NoteRecord {
    /// Converts the record into a domain note.
    ///
    /// Gaps left by older writers are repaired in place: a missing
    /// `createdAt` is taken from the creation-time id, a missing
    /// `completedAt` from `createdAt`, and a missing origin board from
    /// `fallback_board`. Every repair is logged.
    ///
    /// # Errors
    /// - `InvalidData` when no creation time can be recovered.
    pub fn into_note(self, fallback_board: BoardId) -> RepoResult<Note> {
        let id = self.id;
        let created_at = match parse_due_input(&self.created_at) {
            Some(at) => at,
            None => {
                let at = DateTime::<Utc>::from_timestamp_millis(id).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "note {id} has unreadable createdAt value `{}`",
                        self.created_at
                    ))
                })?;
                warn_repaired(id, "createdAt");
                at
            }
        };

        // Unreadable due dates only lose the countdown, not the note.
        let due_date = self.due_date.as_deref().and_then(|raw| {
            let parsed = parse_due_input(raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                warn!("event=note_decode module=repo status=degraded note_id={id} field=dueDate");
            }
            parsed
        });

        let (board_id, status) = if self.completed == Some(true) {
            let origin = self.original_board_id.map(BoardId).unwrap_or_else(|| {
                warn_repaired(id, "originalBoardId");
                fallback_board
            });
            let completed_at = self
                .completed_at
                .as_deref()
                .and_then(parse_due_input)
                .unwrap_or_else(|| {
                    warn_repaired(id, "completedAt");
                    created_at
                });
            let status = NoteStatus::Completed {
                completed_at,
                original_board_name: self
                    .original_board_name
                    .unwrap_or_else(|| UNKNOWN_BOARD_NAME.to_string()),
            };
            (origin, status)
        } else if self.board_id == DONE_BOARD_ID {
            warn_repaired(id, "boardId");
            (fallback_board, NoteStatus::Active)
        } else {
            (BoardId(self.board_id), NoteStatus::Active)
        };

        let color = if self.color.is_empty() {
            DEFAULT_NOTE_COLOR.to_string()
        } else {
            self.color
        };

        Ok(Note {
            id: NoteId(id),
            board_id,
            content: self.content,
            color,
            position: Position::new(self.x, self.y),
            created_at,
            due_date,
            status,
        })
    }
}

/// Encodes notes in collection order.
pub fn notes_to_records(notes: &[Note]) -> Vec<NoteRecord> {
    notes.iter().map(NoteRecord::from).collect()
}

/// Decodes notes one record at a time.
///
/// A record that cannot be recovered is dropped on its own; the rest of
/// the collection survives.
pub fn notes_from_records(records: Vec<NoteRecord>, fallback_board: BoardId) -> Vec<Note> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match record.into_note(fallback_board) {
                Ok(note) => Some(note),
                Err(err) => {
                    warn!(
                        "event=note_decode module=repo status=dropped note_id={id} error={err}"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Formats an instant as ISO-8601 UTC with milliseconds, e.g. `2024-01-16T08:30:00.000Z`.
pub fn format_instant(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn warn_repaired(note_id: i64, field: &str) {
    warn!("event=note_decode module=repo status=repaired note_id={note_id} field={field}");
}
