use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bookshelf-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "books.sqlite";

/// Ensure the database file exists, create the schema if it is missing, and
/// return a live connection. Called exactly once at startup; the connection
/// lives for the rest of the process and is released at exit.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    apply_schema(&conn)?;

    Ok(conn)
}

/// Create the `books` table when absent. Split out from [`ensure_schema`] so
/// tests can run the same DDL against an in-memory connection.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            year INTEGER
        )",
        [],
    )
    .context("failed to create books table")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn apply_schema_is_idempotent_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("books.sqlite");

        let conn = Connection::open(&path).unwrap();
        apply_schema(&conn).unwrap();
        // A second run must not complain about the existing table.
        apply_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO books (title, author, year) VALUES ('Dune', 'Herbert', 1965)",
            [],
        )
        .unwrap();
        drop(conn);

        // Reopening the same file sees the persisted row.
        let reopened = Connection::open(&path).unwrap();
        let count: i64 = reopened
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
