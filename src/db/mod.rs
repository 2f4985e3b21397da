//! Persistence module split across logical submodules.

mod books;
mod connection;

pub use books::{create_book, delete_book, fetch_book, fetch_books, update_book};
pub use connection::{apply_schema, ensure_schema};
