use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::Book;

/// Retrieve every book in storage order. The caller replaces its in-memory
/// list wholesale with the result; nothing is cached between calls.
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare("SELECT id, title, author, year FROM books")
        .context("failed to prepare book query")?;

    let books = stmt
        .query_map([], |row| {
            Ok(Book {
                id: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                year: row.get(3)?,
            })
        })
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    Ok(books)
}

/// Fetch a single book by id. The edit flow uses this to populate the modal
/// with the store's current values rather than whatever the list last
/// rendered. Returns `None` when the id no longer exists.
pub fn fetch_book(conn: &Connection, id: i64) -> Result<Option<Book>> {
    conn.query_row(
        "SELECT id, title, author, year FROM books WHERE id = ?1",
        params![id],
        |row| {
            Ok(Book {
                id: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                year: row.get(3)?,
            })
        },
    )
    .optional()
    .context("failed to fetch book")
}

/// Insert a new book row, returning the hydrated struct with the id SQLite
/// assigned. Callers are expected to have validated that `title` and
/// `author` are non-empty.
pub fn create_book(conn: &Connection, title: &str, author: &str, year: Option<i64>) -> Result<Book> {
    conn.execute(
        "INSERT INTO books (title, author, year) VALUES (?1, ?2, ?3)",
        params![title, author, year],
    )
    .context("failed to insert book")?;

    let id = conn.last_insert_rowid();
    Ok(Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        year,
    })
}

/// Overwrite the book matching `id` with the given field values. The id
/// itself never changes. An unknown id updates zero rows, which is not an
/// error: the record set is simply left as it was.
pub fn update_book(
    conn: &Connection,
    id: i64,
    title: &str,
    author: &str,
    year: Option<i64>,
) -> Result<()> {
    conn.execute(
        "UPDATE books SET title = ?1, author = ?2, year = ?3 WHERE id = ?4",
        params![title, author, year, id],
    )
    .context("failed to update book")?;

    Ok(())
}

/// Remove the book matching `id`. Deleting an id that is already gone is a
/// no-op, so the delete action stays idempotent.
pub fn delete_book(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM books WHERE id = ?1", params![id])
        .context("failed to delete book")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_round_trips_through_fetch() {
        let conn = test_conn();

        let created = create_book(&conn, "T", "A", Some(2020)).unwrap();

        let books = fetch_books(&conn).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, created.id);
        assert_eq!(books[0].title, "T");
        assert_eq!(books[0].author, "A");
        assert_eq!(books[0].year, Some(2020));
    }

    #[test]
    fn insert_accepts_absent_year() {
        let conn = test_conn();

        create_book(&conn, "Untitled", "Anon", None).unwrap();

        let books = fetch_books(&conn).unwrap();
        assert_eq!(books[0].year, None);
    }

    #[test]
    fn fetch_book_returns_none_for_unknown_id() {
        let conn = test_conn();
        let book = create_book(&conn, "Dune", "Herbert", Some(1965)).unwrap();

        assert!(fetch_book(&conn, book.id).unwrap().is_some());
        assert!(fetch_book(&conn, book.id + 100).unwrap().is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let conn = test_conn();
        let keep = create_book(&conn, "1984", "Orwell", Some(1949)).unwrap();
        let gone = create_book(&conn, "Dune", "Herbert", Some(1965)).unwrap();

        delete_book(&conn, gone.id).unwrap();
        let after_first = fetch_books(&conn).unwrap();
        assert_eq!(after_first.len(), 1);

        // Second delete of the same id leaves the store unchanged.
        delete_book(&conn, gone.id).unwrap();
        assert_eq!(fetch_books(&conn).unwrap(), after_first);
        assert_eq!(after_first[0].id, keep.id);
    }

    #[test]
    fn update_preserves_id() {
        let conn = test_conn();
        let book = create_book(&conn, "1984", "Orwell", Some(1949)).unwrap();

        update_book(&conn, book.id, "1984", "Orwell", Some(1950)).unwrap();

        let books = fetch_books(&conn).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, book.id);
        assert_eq!(books[0].year, Some(1950));
    }

    #[test]
    fn unknown_id_update_and_delete_are_noops() {
        let conn = test_conn();
        create_book(&conn, "Dune", "Herbert", Some(1965)).unwrap();
        let before = fetch_books(&conn).unwrap();

        update_book(&conn, 9999, "Ghost", "Nobody", None).unwrap();
        delete_book(&conn, 9999).unwrap();

        assert_eq!(fetch_books(&conn).unwrap(), before);
    }

    #[test]
    fn crud_scenario_matches_expected_sequence() {
        let conn = test_conn();

        let dune = create_book(&conn, "Dune", "Herbert", Some(1965)).unwrap();
        let orwell = create_book(&conn, "1984", "Orwell", Some(1949)).unwrap();
        assert_eq!(fetch_books(&conn).unwrap().len(), 2);

        delete_book(&conn, dune.id).unwrap();
        let remaining = fetch_books(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "1984");

        update_book(&conn, orwell.id, "1984", "Orwell", Some(1950)).unwrap();
        let updated = fetch_books(&conn).unwrap();
        assert_eq!(updated[0].id, orwell.id);
        assert_eq!(updated[0].summary(), "1984 | Orwell | 1950");
    }
}
