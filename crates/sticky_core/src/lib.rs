//! Core domain logic for the sticky notes organizer.
//! This crate is the single source of truth for board and note invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod timing;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, BoardId, BoardRef, DoneBoard};
pub use model::note::{Note, NoteId, NoteLocation, NoteStatus, Position};
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateKey, StateRepository};
pub use service::board_service::{
    BoardService, BoardServiceError, DueDateEdit, NewNote, ServiceResult, ViewMode,
};
pub use service::completion::{complete_note, uncomplete_note};
pub use timing::countdown::{format_time_remaining, time_remaining, Countdown, TimeRemaining};
pub use timing::input::{format_due_input, parse_due_input};
pub use timing::relative::{format_clock, format_completion_date};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
