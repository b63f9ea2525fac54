//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a state database and print boards, notes and countdowns.
//! - Keep output deterministic apart from the clock line.
//!
//! Usage: `sticky_cli [DB_PATH]` (defaults to `stickynotes.sqlite3`).

use chrono::{Local, Utc};
use log::error;
use std::process::ExitCode;
use sticky_core::db::open_db;
use sticky_core::{
    format_clock, format_completion_date, BoardService, Countdown, SqliteStateRepository,
};

const DEFAULT_DB_FILE_NAME: &str = "stickynotes.sqlite3";

fn main() -> ExitCode {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_FILE_NAME.to_string());

    if let Ok(cwd) = std::env::current_dir() {
        let log_dir = cwd.join("logs");
        if let Err(err) = sticky_core::init_logging(
            sticky_core::default_log_level(),
            &log_dir.to_string_lossy(),
        ) {
            eprintln!("logging disabled: {err}");
        }
    }

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=cli_open module=cli status=error path={db_path} error={err}");
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteStateRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("failed to prepare state store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let now = Utc::now();
    let service = BoardService::load(repo, now);

    println!("sticky_core version={}", sticky_core::core_version());
    println!("{}", format_clock(&now.with_timezone(&Local)));

    for board in service.regular_boards() {
        let marker = if board.id == service.selected_board() {
            "*"
        } else {
            " "
        };
        println!("{marker} [{}] {}", board.id, board.name);
        for note in service.notes_on_board(board.id) {
            match note.due_date {
                Some(due) => println!("    - {} {}", note.content, Countdown::new(due, now)),
                None => println!("    - {}", note.content),
            }
        }
    }

    let done = service.done_notes();
    println!("  [{}] {} completed", service.done_board().name, done.len());
    for note in done {
        let when = note
            .completed_at()
            .map(|at| format_completion_date(at, now))
            .unwrap_or_default();
        let origin = note
            .original_board()
            .map(|board| board.name)
            .unwrap_or_default();
        println!("    - {} ({origin}, {when})", note.content);
    }

    ExitCode::SUCCESS
}
