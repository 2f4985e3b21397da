//! Core library surface for the Bookshelf Manager TUI application.
//!
//! The public modules exposed here keep the API intentionally small so the
//! `bin` target and the tests can reuse the same pieces without going
//! through the terminal.
pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer, used by `main.rs` to
/// initialize the embedded SQLite store and preload data.
pub use db::{ensure_schema, fetch_books};

/// The sole domain type passed between layers.
pub use models::Book;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
