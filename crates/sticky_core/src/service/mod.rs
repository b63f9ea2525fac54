//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate domain transforms and repository writes into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod board_service;
pub mod completion;
pub mod seed;
