//! Board and note use-case service.
//!
//! # Responsibility
//! - Own the in-memory board/note collections and the view state.
//! - Validate preconditions before every mutation.
//! - Mirror changed state to the key-value repository after each mutation.
//!
//! # Invariants
//! - At least one regular board always exists.
//! - Every active note lives on an existing regular board.
//! - A rejected mutation leaves state untouched and writes nothing.
//! - Persistence is best-effort: failures are logged, never returned.

use crate::model::board::{Board, BoardId, DoneBoard};
use crate::model::note::{Note, NoteId, NoteLocation, Position};
use crate::repo::records::{
    boards_from_records, boards_to_records, notes_from_records, notes_to_records, BoardRecord,
    NoteRecord,
};
use crate::repo::state_repo::{read_json, write_json, RepoResult, StateKey, StateRepository};
use crate::service::completion::{complete_note, uncomplete_note};
use crate::service::seed::{seed_boards, seed_notes};
use crate::timing::input::parse_due_input;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Which top-level view the user last had open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Board,
    List,
    Done,
}

/// Errors from board/note service operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardServiceError {
    /// Board name is blank after trim.
    BlankBoardName,
    /// Note content is blank after trim.
    BlankNoteContent,
    /// Target is not a regular board. The Done board is never addressable.
    BoardNotFound(BoardId),
    /// Deleting this board would leave no regular board.
    LastRegularBoard(BoardId),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Operation applies to active notes only.
    NoteCompleted(NoteId),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankBoardName => write!(f, "board name must not be blank"),
            Self::BlankNoteContent => write!(f, "note content must not be blank"),
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::LastRegularBoard(id) => {
                write!(f, "board {id} is the last regular board and cannot be deleted")
            }
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::NoteCompleted(id) => write!(f, "note {id} is completed"),
        }
    }
}

impl Error for BoardServiceError {}

pub type ServiceResult<T> = Result<T, BoardServiceError>;

/// Input for creating a note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewNote {
    pub content: String,
    /// Target board; defaults to the selected board.
    pub board_id: Option<BoardId>,
    pub due_date: Option<DateTime<Utc>>,
    /// Color token; defaults to the standard note color.
    pub color: Option<String>,
}

impl NewNote {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Due-date change applied by `update_note`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDateEdit {
    Keep,
    Set(DateTime<Utc>),
    Clear,
}

impl DueDateEdit {
    /// Maps an edit form field to a due-date change.
    ///
    /// - field absent: `Keep`
    /// - blank input: `Clear` (the due date is removed)
    /// - parseable input: `Set`
    /// - unparseable input: `Keep`
    pub fn from_input(input: Option<&str>) -> Self {
        match input {
            None => Self::Keep,
            Some(raw) if raw.trim().is_empty() => Self::Clear,
            Some(raw) => parse_due_input(raw).map_or(Self::Keep, Self::Set),
        }
    }
}

/// Store object owning boards, notes and view state.
pub struct BoardService<R: StateRepository> {
    repo: R,
    boards: Vec<Board>,
    notes: Vec<Note>,
    selected_board: BoardId,
    view_mode: ViewMode,
    last_issued_id: i64,
}

impl<R: StateRepository> BoardService<R> {
    /// Loads persisted state, falling back to defaults key by key.
    ///
    /// # Side effects
    /// - Writes the repaired state back so storage matches memory.
    /// - Emits `state_load` logging events for missing or invalid keys.
    pub fn load(repo: R, now: DateTime<Utc>) -> Self {
        let mut boards = load_key(&repo, StateKey::Boards, |records: Vec<BoardRecord>| {
            Ok(boards_from_records(records))
        })
        .unwrap_or_else(seed_boards);
        if boards.is_empty() {
            warn!(
                "event=state_load module=service status=fallback key=boards reason=no_regular_board"
            );
            boards = seed_boards();
        }

        let fallback_board = boards[0].id;
        let notes = load_key(&repo, StateKey::Notes, |records: Vec<NoteRecord>| {
            Ok(notes_from_records(records, fallback_board))
        })
        .unwrap_or_else(|| seed_notes(now));

        let selected_board = load_key(&repo, StateKey::SelectedBoard, |id: BoardId| Ok(id))
            .filter(|id| boards.iter().any(|board| board.id == *id))
            .unwrap_or(boards[0].id);

        let view_mode =
            load_key(&repo, StateKey::ViewMode, |mode: ViewMode| Ok(mode)).unwrap_or_default();

        let mut service = Self {
            repo,
            boards,
            notes,
            selected_board,
            view_mode,
            last_issued_id: 0,
        };
        service.rehome_orphaned_notes();
        service.last_issued_id = service.max_known_id();
        service.persist(&StateKey::ALL);

        info!(
            "event=state_load module=service status=ok boards={} notes={} view_mode={:?}",
            service.boards.len(),
            service.notes.len(),
            service.view_mode
        );
        service
    }

    /// Regular boards in creation order. Never empty.
    pub fn regular_boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|board| board.id == id)
    }

    pub fn done_board(&self) -> DoneBoard {
        DoneBoard::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Active notes living on `board_id`.
    pub fn notes_on_board(&self, board_id: BoardId) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|note| note.location() == NoteLocation::Board(board_id))
            .collect()
    }

    /// Completed notes shown in the Done view.
    pub fn done_notes(&self) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|note| note.location() == NoteLocation::Done)
            .collect()
    }

    pub fn overdue_notes(&self, now: DateTime<Utc>) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|note| note.is_overdue(now))
            .collect()
    }

    pub fn selected_board(&self) -> BoardId {
        self.selected_board
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Creates a board and selects it.
    pub fn add_board(
        &mut self,
        name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> ServiceResult<BoardId> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BoardServiceError::BlankBoardName);
        }

        let id = BoardId(self.issue_id(now));
        self.boards.push(Board::new(id, trimmed));
        self.selected_board = id;
        self.persist(&[StateKey::Boards, StateKey::SelectedBoard]);

        info!("event=board_create module=service status=ok board_id={id}");
        Ok(id)
    }

    /// Renames a regular board.
    pub fn rename_board(&mut self, id: BoardId, name: impl Into<String>) -> ServiceResult<()> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BoardServiceError::BlankBoardName);
        }

        let board = self
            .boards
            .iter_mut()
            .find(|board| board.id == id)
            .ok_or(BoardServiceError::BoardNotFound(id))?;
        board.name = trimmed.to_string();
        self.persist(&[StateKey::Boards]);

        debug!("event=board_rename module=service status=ok board_id={id}");
        Ok(())
    }

    /// Deletes a regular board and every active note on it.
    ///
    /// Completed notes that came from this board stay in the Done view and
    /// are re-homed when restored.
    pub fn delete_board(&mut self, id: BoardId) -> ServiceResult<()> {
        if self.board(id).is_none() {
            return Err(BoardServiceError::BoardNotFound(id));
        }
        if self.boards.len() <= 1 {
            return Err(BoardServiceError::LastRegularBoard(id));
        }

        self.boards.retain(|board| board.id != id);
        let before = self.notes.len();
        self.notes.retain(|note| note.location() != NoteLocation::Board(id));
        let cascaded = before - self.notes.len();

        if self.selected_board == id {
            self.selected_board = self.boards[0].id;
        }
        self.persist(&[StateKey::Boards, StateKey::Notes, StateKey::SelectedBoard]);

        info!(
            "event=board_delete module=service status=ok board_id={id} cascaded_notes={cascaded}"
        );
        Ok(())
    }

    /// Creates an active note at a random canvas position.
    pub fn add_note<G: Rng + ?Sized>(
        &mut self,
        new_note: NewNote,
        now: DateTime<Utc>,
        rng: &mut G,
    ) -> ServiceResult<NoteId> {
        if new_note.content.trim().is_empty() {
            return Err(BoardServiceError::BlankNoteContent);
        }
        let board_id = new_note.board_id.unwrap_or(self.selected_board);
        if self.board(board_id).is_none() {
            return Err(BoardServiceError::BoardNotFound(board_id));
        }

        let id = NoteId(self.issue_id(now));
        let mut note = Note::new(id, board_id, new_note.content, now);
        note.position = Position::random(rng);
        note.due_date = new_note.due_date;
        if let Some(color) = new_note.color {
            note.color = color;
        }
        self.notes.push(note);
        self.persist(&[StateKey::Notes]);

        info!("event=note_create module=service status=ok note_id={id} board_id={board_id}");
        Ok(id)
    }

    /// Replaces note content and applies a due-date change.
    pub fn update_note(
        &mut self,
        id: NoteId,
        content: impl Into<String>,
        due: DueDateEdit,
    ) -> ServiceResult<()> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(BoardServiceError::BlankNoteContent);
        }

        let note = self.note_mut(id)?;
        note.content = content;
        match due {
            DueDateEdit::Keep => {}
            DueDateEdit::Set(at) => note.due_date = Some(at),
            DueDateEdit::Clear => note.due_date = None,
        }
        self.persist(&[StateKey::Notes]);

        debug!("event=note_update module=service status=ok note_id={id} due_edit={due:?}");
        Ok(())
    }

    /// Drops an active note onto a regular board at `position`.
    pub fn move_note(
        &mut self,
        id: NoteId,
        board_id: BoardId,
        position: Position,
    ) -> ServiceResult<()> {
        if self.board(board_id).is_none() {
            return Err(BoardServiceError::BoardNotFound(board_id));
        }
        let note = self.note_mut(id)?;
        if note.is_completed() {
            return Err(BoardServiceError::NoteCompleted(id));
        }

        note.board_id = board_id;
        note.position = position;
        self.persist(&[StateKey::Notes]);

        debug!("event=note_move module=service status=ok note_id={id} board_id={board_id}");
        Ok(())
    }

    pub fn delete_note(&mut self, id: NoteId) -> ServiceResult<()> {
        let index = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(BoardServiceError::NoteNotFound(id))?;
        self.notes.remove(index);
        self.persist(&[StateKey::Notes]);

        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Completes an active note or restores a completed one.
    ///
    /// A note restored to a board deleted in the meantime lands on the
    /// first regular board.
    pub fn toggle_completion<G: Rng + ?Sized>(
        &mut self,
        id: NoteId,
        now: DateTime<Utc>,
        rng: &mut G,
    ) -> ServiceResult<()> {
        let index = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(BoardServiceError::NoteNotFound(id))?;

        let note = self.notes[index].clone();
        let toggled = if note.is_completed() {
            let mut restored = uncomplete_note(note, rng);
            if self.board(restored.board_id).is_none() {
                warn!(
                    "event=note_restore module=service status=rehomed note_id={} missing_board_id={}",
                    id, restored.board_id
                );
                restored.board_id = self.boards[0].id;
            }
            restored
        } else {
            complete_note(note, &self.boards, now, rng)
        };

        let completed = toggled.is_completed();
        self.notes[index] = toggled;
        self.persist(&[StateKey::Notes]);

        info!("event=note_toggle module=service status=ok note_id={id} completed={completed}");
        Ok(())
    }

    /// Selects a regular board.
    pub fn select_board(&mut self, id: BoardId) -> ServiceResult<()> {
        if self.board(id).is_none() {
            return Err(BoardServiceError::BoardNotFound(id));
        }
        self.selected_board = id;
        self.persist(&[StateKey::SelectedBoard]);
        Ok(())
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.persist(&[StateKey::ViewMode]);
    }

    /// Drops all boards and notes and restores the seed dataset.
    ///
    /// The view mode is kept.
    pub fn clear_all(&mut self, now: DateTime<Utc>) {
        for key in [StateKey::Boards, StateKey::Notes, StateKey::SelectedBoard] {
            if let Err(err) = self.repo.remove(key) {
                error!(
                    "event=state_clear module=service status=error key={key} error={err}"
                );
            }
        }

        self.boards = seed_boards();
        self.notes = seed_notes(now);
        self.selected_board = self.boards[0].id;
        self.last_issued_id = self.last_issued_id.max(self.max_known_id());
        self.persist(&[StateKey::Boards, StateKey::Notes, StateKey::SelectedBoard]);

        info!("event=state_clear module=service status=ok");
    }

    fn note_mut(&mut self, id: NoteId) -> ServiceResult<&mut Note> {
        self.notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(BoardServiceError::NoteNotFound(id))
    }

    /// Issues a creation-time id that is unique among boards and notes.
    fn issue_id(&mut self, now: DateTime<Utc>) -> i64 {
        let id = now.timestamp_millis().max(self.last_issued_id + 1);
        self.last_issued_id = id;
        id
    }

    fn max_known_id(&self) -> i64 {
        let board_max = self.boards.iter().map(|board| board.id.0);
        let note_max = self.notes.iter().map(|note| note.id.0);
        board_max.chain(note_max).max().unwrap_or(0)
    }

    fn rehome_orphaned_notes(&mut self) {
        let fallback = self.boards[0].id;
        let known: Vec<BoardId> = self.boards.iter().map(|board| board.id).collect();
        for note in self.notes.iter_mut() {
            if !note.is_completed() && !known.contains(&note.board_id) {
                warn!(
                    "event=state_load module=service status=rehomed note_id={} missing_board_id={}",
                    note.id, note.board_id
                );
                note.board_id = fallback;
            }
        }
    }

    fn persist(&self, keys: &[StateKey]) {
        for key in keys {
            let result = match key {
                StateKey::Boards => {
                    write_json(&self.repo, *key, &boards_to_records(&self.boards))
                }
                StateKey::Notes => write_json(&self.repo, *key, &notes_to_records(&self.notes)),
                StateKey::SelectedBoard => write_json(&self.repo, *key, &self.selected_board),
                StateKey::ViewMode => write_json(&self.repo, *key, &self.view_mode),
            };

            match result {
                Ok(()) => debug!("event=state_save module=service status=ok key={key}"),
                Err(err) => {
                    error!("event=state_save module=service status=error key={key} error={err}")
                }
            }
        }
    }
}

/// Reads one key, decoding it with `convert`.
///
/// Returns `None` when the key is missing or unusable; the caller picks the
/// fallback.
fn load_key<R, T, U>(
    repo: &R,
    key: StateKey,
    convert: impl FnOnce(T) -> RepoResult<U>,
) -> Option<U>
where
    R: StateRepository,
    T: serde::de::DeserializeOwned,
{
    match read_json::<R, T>(repo, key).and_then(|value| value.map(convert).transpose()) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            info!("event=state_load module=service status=missing key={key}");
            None
        }
        Err(err) => {
            warn!("event=state_load module=service status=fallback key={key} error={err}");
            None
        }
    }
}
