//! Domain model for boards and sticky notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the Done view an explicit note status instead of a board row.
//!
//! # Invariants
//! - Every board and note is identified by a unique integer id.
//! - A note carries an origin board name if and only if it is completed.

pub mod board;
pub mod note;
