//! Note completion and restoration transforms.
//!
//! # Responsibility
//! - Move a note into the Done view with an origin board snapshot.
//! - Restore a completed note to its origin board.
//!
//! # Invariants
//! - Both transforms are pure apart from the injected `now` and RNG.
//! - `uncomplete_note(complete_note(n))` equals `n` except for `position`.

use crate::model::board::Board;
use crate::model::note::{Note, NoteStatus, Position};
use crate::repo::records::UNKNOWN_BOARD_NAME;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Marks `note` completed, snapshotting the name of the board it is on.
///
/// Falls back to `"Unknown Board"` when that board is no longer in
/// `boards`. An already completed note is returned unchanged.
pub fn complete_note<G: Rng + ?Sized>(
    note: Note,
    boards: &[Board],
    now: DateTime<Utc>,
    rng: &mut G,
) -> Note {
    if note.is_completed() {
        return note;
    }

    let original_board_name = boards
        .iter()
        .find(|board| board.id == note.board_id)
        .map(|board| board.name.clone())
        .unwrap_or_else(|| UNKNOWN_BOARD_NAME.to_string());

    Note {
        status: NoteStatus::Completed {
            completed_at: now,
            original_board_name,
        },
        position: Position::random(rng),
        ..note
    }
}

/// Restores a completed note to its origin board.
///
/// An active note has no origin to return to and is returned unchanged.
pub fn uncomplete_note<G: Rng + ?Sized>(note: Note, rng: &mut G) -> Note {
    if !note.is_completed() {
        return note;
    }

    Note {
        status: NoteStatus::Active,
        position: Position::random(rng),
        ..note
    }
}

#[cfg(test)]
mod tests {
    use super::{complete_note, uncomplete_note};
    use crate::model::board::{Board, BoardId};
    use crate::model::note::{Note, NoteId, NoteLocation, Position};
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (Note, Vec<Board>) {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let mut note = Note::new(NoteId(1), BoardId(1), "Review budget", created);
        note.position = Position::new(20.0, 20.0);
        note.due_date = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        (note, vec![Board::new(BoardId(1), "Marketing Campaign")])
    }

    #[test]
    fn complete_snapshots_origin_and_moves_to_done() {
        let (note, boards) = fixture();
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 10, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let completed = complete_note(note, &boards, now, &mut rng);

        assert_eq!(completed.location(), NoteLocation::Done);
        assert_eq!(completed.completed_at(), Some(now));
        let origin = completed.original_board().unwrap();
        assert_eq!(origin.id, BoardId(1));
        assert_eq!(origin.name, "Marketing Campaign");
    }

    #[test]
    fn complete_uses_fallback_name_for_missing_board() {
        let (note, _) = fixture();
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 10, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(2);

        let completed = complete_note(note, &[], now, &mut rng);
        assert_eq!(completed.original_board().unwrap().name, "Unknown Board");
    }

    #[test]
    fn round_trip_restores_everything_but_position() {
        let (note, boards) = fixture();
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 10, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let completed = complete_note(note.clone(), &boards, now, &mut rng);
        let restored = uncomplete_note(completed, &mut rng);

        assert_eq!(
            Note {
                position: note.position,
                ..restored
            },
            note
        );
    }

    #[test]
    fn uncomplete_on_active_note_is_noop() {
        let (note, _) = fixture();
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(uncomplete_note(note.clone(), &mut rng), note);
    }

    #[test]
    fn complete_twice_keeps_first_completion() {
        let (note, boards) = fixture();
        let first = Utc.with_ymd_and_hms(2024, 1, 20, 10, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 21, 10, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let once = complete_note(note, &boards, first, &mut rng);
        let twice = complete_note(once.clone(), &boards, second, &mut rng);
        assert_eq!(twice, once);
    }
}
