//! Default dataset used on first start and after a reset.

use crate::model::board::{Board, BoardId};
use crate::model::note::{Note, NoteId, Position};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Boards created when no usable board state is persisted.
pub fn seed_boards() -> Vec<Board> {
    vec![
        Board::new(BoardId(1), "Marketing Campaign"),
        Board::new(BoardId(2), "Product Development"),
    ]
}

/// Notes created when no usable note state is persisted.
///
/// Due dates are relative to `now` so the seed always shows live countdowns.
pub fn seed_notes(now: DateTime<Utc>) -> Vec<Note> {
    let mut review = Note::new(
        NoteId(1),
        BoardId(1),
        "Review Q4 marketing budget",
        seed_date(2024, 1, 15),
    );
    review.position = Position::new(20.0, 20.0);
    review.due_date = Some(now + Duration::days(2));

    let mut schedule = Note::new(
        NoteId(2),
        BoardId(1),
        "Schedule social media posts",
        seed_date(2024, 1, 16),
    );
    schedule.position = Position::new(180.0, 40.0);
    schedule.due_date = Some(now + Duration::days(5));

    let mut feedback = Note::new(
        NoteId(3),
        BoardId(2),
        "User testing feedback review",
        seed_date(2024, 1, 17),
    );
    feedback.position = Position::new(30.0, 60.0);

    vec![review, schedule, feedback]
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
