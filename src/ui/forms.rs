use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::models::Book;

/// Validation failures surfaced inside the modal. Both the add and the edit
/// flow go through the same checks, so the two cannot drift apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum FormError {
    #[error("Title is required.")]
    MissingTitle,
    #[error("Author is required.")]
    MissingAuthor,
    #[error("Year must be a whole number.")]
    InvalidYear,
}

/// Fields available within the book form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
}

/// State for the single reusable modal form. The add flow starts from
/// `default()`; the edit flow seeds it with [`BookForm::from_book`].
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl BookForm {
    /// Populate the form from a book's current stored values when editing.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.map(|y| y.to_string()).unwrap_or_default(),
            active: BookField::Title,
            error: None,
        }
    }

    /// Cycle focus across the three fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Title,
        };
    }

    /// Append a character to the active field. The year field only accepts
    /// decimal digits, so non-numeric years cannot be typed in the first
    /// place; [`BookForm::parse_inputs`] re-checks anyway.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookField::Year => {
                if ch.is_ascii_digit() {
                    self.year.push(ch);
                    true
                } else {
                    false
                }
            }
            BookField::Title => {
                if !ch.is_control() {
                    self.title.push(ch);
                    true
                } else {
                    false
                }
            }
            BookField::Author => {
                if !ch.is_control() {
                    self.author.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
        }
    }

    /// Validate the inputs and return typed values ready for persistence.
    /// An empty year field means the year is simply absent; non-numeric
    /// text is rejected rather than silently dropped.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, Option<i64>), FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }

        let author = self.author.trim();
        if author.is_empty() {
            return Err(FormError::MissingAuthor);
        }

        let year_raw = self.year.trim();
        let year = if year_raw.is_empty() {
            None
        } else {
            Some(year_raw.parse::<i64>().map_err(|_| FormError::InvalidYear)?)
        };

        Ok((title.to_string(), author.to_string(), year))
    }

    /// Render a single styled line for the modal form.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let (value, is_active) = match field {
            BookField::Title => (&self.title, self.active == BookField::Title),
            BookField::Author => (&self.author, self.active == BookField::Author),
            BookField::Year => (&self.year, self.active == BookField::Year),
        };

        let placeholder = match field {
            BookField::Title | BookField::Author => "<required>",
            BookField::Year => "<optional>",
        };

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count of the requested field, used for cursor placement.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        match field {
            BookField::Title => self.title.chars().count(),
            BookField::Author => self.author.chars().count(),
            BookField::Year => self.year.chars().count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> BookForm {
        BookForm {
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            year: "1965".to_string(),
            ..BookForm::default()
        }
    }

    #[test]
    fn parse_accepts_complete_inputs() {
        let form = filled_form();
        let (title, author, year) = form.parse_inputs().unwrap();
        assert_eq!(title, "Dune");
        assert_eq!(author, "Herbert");
        assert_eq!(year, Some(1965));
    }

    #[test]
    fn parse_rejects_empty_title() {
        let mut form = filled_form();
        form.title = "   ".to_string();
        assert_eq!(form.parse_inputs().unwrap_err(), FormError::MissingTitle);
    }

    #[test]
    fn parse_rejects_empty_author() {
        let mut form = filled_form();
        form.author.clear();
        assert_eq!(form.parse_inputs().unwrap_err(), FormError::MissingAuthor);
    }

    #[test]
    fn parse_treats_empty_year_as_absent() {
        let mut form = filled_form();
        form.year.clear();
        let (_, _, year) = form.parse_inputs().unwrap();
        assert_eq!(year, None);
    }

    #[test]
    fn parse_rejects_non_numeric_year() {
        let mut form = filled_form();
        form.year = "abc".to_string();
        assert_eq!(form.parse_inputs().unwrap_err(), FormError::InvalidYear);
    }

    #[test]
    fn year_field_only_accepts_digits() {
        let mut form = BookForm::default();
        form.active = BookField::Year;
        assert!(form.push_char('1'));
        assert!(!form.push_char('x'));
        assert_eq!(form.year, "1");
    }

    #[test]
    fn from_book_round_trips_field_values() {
        let book = Book {
            id: 7,
            title: "1984".to_string(),
            author: "Orwell".to_string(),
            year: None,
        };
        let form = BookForm::from_book(&book);
        assert_eq!(form.title, "1984");
        assert_eq!(form.author, "Orwell");
        assert_eq!(form.year, "");
    }
}
