//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value contract used to mirror application state.
//! - Own the persisted JSON record layout and its domain conversions.
//!
//! # Invariants
//! - Values are stored as JSON text under fixed `StateKey` names.
//! - Read paths reject invalid persisted records instead of masking them;
//!   recovery policy belongs to the service layer.

pub mod records;
pub mod state_repo;
