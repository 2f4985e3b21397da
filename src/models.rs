//! Domain model shared by the persistence and presentation layers. The type
//! stays a plain data holder mirroring the SQLite schema so the other layers
//! can focus on queries and rendering.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One book entry as it exists in the store.
pub struct Book {
    /// Primary key assigned by SQLite on insert. The UI only needs display
    /// data, but the edit and delete flows bubble the id back to the
    /// persistence layer, so every row carries it.
    pub id: i64,
    /// Title shown in the list. Required, never empty once persisted.
    pub title: String,
    /// Author shown in the list. Required, never empty once persisted.
    pub author: String,
    /// Publication year. Optional; stored as a nullable column.
    pub year: Option<i64>,
}

impl Book {
    /// Compose the `title | author | year` summary used for list rows. An
    /// absent year renders as a dash so rows keep a uniform shape.
    pub fn summary(&self) -> String {
        match self.year {
            Some(year) => format!("{} | {} | {}", self.title, self.author, year),
            None => format!("{} | {} | -", self.title, self.author),
        }
    }
}

impl fmt::Display for Book {
    /// Display mirrors `summary` so the type drops straight into Ratatui
    /// widgets that consume strings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_includes_year_when_present() {
        let book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            year: Some(1965),
        };
        assert_eq!(book.summary(), "Dune | Herbert | 1965");
    }

    #[test]
    fn summary_dashes_out_missing_year() {
        let book = Book {
            id: 2,
            title: "Untitled".to_string(),
            author: "Anon".to_string(),
            year: None,
        };
        assert_eq!(book.summary(), "Untitled | Anon | -");
    }
}
