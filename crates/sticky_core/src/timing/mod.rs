//! Pure time computations and display formatting.
//!
//! # Responsibility
//! - Compute countdowns against due instants.
//! - Render countdowns, relative completion dates and clock lines.
//! - Convert due-date form input to instants and back.
//!
//! # Invariants
//! - Every function takes `now` explicitly; nothing here reads the clock.
//! - Instants are compared as absolute UTC values with no time zone
//!   adjustment; only calendar rendering uses local time.

pub mod countdown;
pub mod input;
pub mod relative;
