//! Binary entry point that glues the SQLite-backed book list to the TUI:
//! bring up the database, hydrate the initial app state, and drive the
//! Ratatui event loop until the user exits.
use bookshelf_manager::{ensure_schema, fetch_books, run_app, App};

/// Initialize persistence, load the current book list, and launch the
/// event loop. Returning a `Result` bubbles fatal store problems (for
/// example an unwritable data directory) up to the terminal.
fn main() -> anyhow::Result<()> {
    let conn = ensure_schema()?;
    let books = fetch_books(&conn)?;

    let mut app = App::new(conn, books);
    run_app(&mut app)
}
