use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use sticky_core::db::{open_db, open_db_in_memory};
use sticky_core::{
    BoardId, BoardService, NewNote, NoteId, NoteLocation, RepoError, RepoResult,
    SqliteStateRepository, StateKey, StateRepository, ViewMode,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

fn stored_json(repo: &SqliteStateRepository<'_>, key: StateKey) -> Value {
    let text = repo.get(key).unwrap().expect("key should be persisted");
    serde_json::from_str(&text).unwrap()
}

#[test]
fn load_writes_full_layout_including_done_board() {
    let conn = open_db_in_memory().unwrap();
    let _service = BoardService::load(SqliteStateRepository::try_new(&conn).unwrap(), now());

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let boards = stored_json(&repo, StateKey::Boards);
    let boards = boards.as_array().unwrap();
    assert_eq!(boards.len(), 3);
    assert_eq!(boards[2]["id"], -1);
    assert_eq!(boards[2]["name"], "Done");
    assert_eq!(boards[2]["isDoneBoard"], true);

    assert_eq!(stored_json(&repo, StateKey::Notes).as_array().unwrap().len(), 3);
    assert_eq!(stored_json(&repo, StateKey::SelectedBoard), 1);
    assert_eq!(stored_json(&repo, StateKey::ViewMode), "board");
}

#[test]
fn state_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stickynotes.db");
    let mut rng = StdRng::seed_from_u64(11);

    let (board_id, note_id) = {
        let conn = open_db(&path).unwrap();
        let mut service =
            BoardService::load(SqliteStateRepository::try_new(&conn).unwrap(), now());
        let board_id = service.add_board("Errands", now()).unwrap();
        let note_id = service
            .add_note(NewNote::new("Buy stamps"), now(), &mut rng)
            .unwrap();
        service.toggle_completion(note_id, now(), &mut rng).unwrap();
        service.set_view_mode(ViewMode::Done);
        (board_id, note_id)
    };

    let conn = open_db(&path).unwrap();
    let service = BoardService::load(SqliteStateRepository::try_new(&conn).unwrap(), now());

    assert_eq!(service.board(board_id).unwrap().name, "Errands");
    assert_eq!(service.selected_board(), board_id);
    assert_eq!(service.view_mode(), ViewMode::Done);
    let note = service.note(note_id).unwrap();
    assert_eq!(note.location(), NoteLocation::Done);
    assert_eq!(note.original_board().unwrap().id, board_id);
    assert_eq!(note.original_board().unwrap().name, "Errands");
    assert_eq!(note.completed_at(), Some(now()));
}

#[test]
fn corrupt_value_falls_back_per_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    repo.put(
        StateKey::Boards,
        r#"[{"id":5,"name":"Kept"},{"id":-1,"name":"Done","isDoneBoard":true}]"#,
    )
    .unwrap();
    repo.put(StateKey::Notes, "{not json").unwrap();
    repo.put(StateKey::ViewMode, "\"gallery\"").unwrap();

    let service = BoardService::load(repo, now());

    assert_eq!(service.regular_boards().len(), 1);
    assert_eq!(service.regular_boards()[0].name, "Kept");
    assert_eq!(service.view_mode(), ViewMode::Board);
    assert_eq!(service.selected_board(), BoardId(5));
    // Seed notes point at boards 1 and 2, which do not exist here.
    assert_eq!(service.notes().len(), 3);
    assert!(service
        .notes()
        .iter()
        .all(|note| note.location() == NoteLocation::Board(BoardId(5))));
}

#[test]
fn completed_note_without_origin_does_not_cost_the_other_notes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    repo.put(
        StateKey::Boards,
        r#"[{"id":4,"name":"Home"},{"id":-1,"name":"Done","isDoneBoard":true}]"#,
    )
    .unwrap();
    repo.put(
        StateKey::Notes,
        r#"[
            {"id":10,"boardId":4,"content":"water plants","createdAt":"2025-03-01T08:00:00.000Z"},
            {"id":11,"boardId":4,"content":"call plumber","createdAt":"2025-03-02T08:00:00.000Z"},
            {"id":12,"boardId":-1,"content":"old chore","createdAt":"2025-03-03T08:00:00.000Z",
             "completed":true}
        ]"#,
    )
    .unwrap();

    let mut service = BoardService::load(repo, now());
    let contents: Vec<&str> = service
        .notes()
        .iter()
        .map(|note| note.content.as_str())
        .collect();
    assert_eq!(contents, ["water plants", "call plumber", "old chore"]);

    let orphan = service.note(NoteId(12)).unwrap();
    assert_eq!(orphan.location(), NoteLocation::Done);
    assert_eq!(orphan.original_board().unwrap().id, BoardId(4));
    assert_eq!(orphan.original_board().unwrap().name, "Unknown Board");

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    let stored = stored_json(&repo, StateKey::Notes);
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0]["content"], "water plants");
    assert_eq!(stored[2]["originalBoardId"], 4);

    let mut rng = StdRng::seed_from_u64(3);
    service.toggle_completion(NoteId(12), now(), &mut rng).unwrap();
    assert_eq!(
        service.note(NoteId(12)).unwrap().location(),
        NoteLocation::Board(BoardId(4))
    );
}

#[test]
fn stale_selection_falls_back_to_first_regular_board() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    repo.put(StateKey::SelectedBoard, "-1").unwrap();

    let service = BoardService::load(repo, now());
    assert_eq!(service.selected_board(), BoardId(1));
}

#[test]
fn board_list_with_only_done_entry_is_reseeded() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    repo.put(
        StateKey::Boards,
        r#"[{"id":-1,"name":"Done","isDoneBoard":true}]"#,
    )
    .unwrap();

    let service = BoardService::load(repo, now());
    assert_eq!(service.regular_boards().len(), 2);
}

/// Accepts reads, fails every write.
struct ReadOnlyRepo {
    values: RefCell<HashMap<StateKey, String>>,
}

impl StateRepository for ReadOnlyRepo {
    fn get(&self, key: StateKey) -> RepoResult<Option<String>> {
        Ok(self.values.borrow().get(&key).cloned())
    }

    fn put(&self, _key: StateKey, _value: &str) -> RepoResult<()> {
        Err(RepoError::InvalidData("storage is read-only".to_string()))
    }

    fn remove(&self, _key: StateKey) -> RepoResult<()> {
        Err(RepoError::InvalidData("storage is read-only".to_string()))
    }
}

#[test]
fn write_failures_do_not_abort_mutations() {
    let repo = ReadOnlyRepo {
        values: RefCell::new(HashMap::new()),
    };
    let mut service = BoardService::load(repo, now());
    let mut rng = StdRng::seed_from_u64(5);

    let board = service.add_board("Offline", now()).unwrap();
    let note = service
        .add_note(NewNote::new("still works"), now(), &mut rng)
        .unwrap();
    service.clear_all(now());

    assert!(service.board(board).is_none());
    assert!(service.note(note).is_none());
    assert_eq!(service.regular_boards().len(), 2);
}
