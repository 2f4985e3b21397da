use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{create_book, delete_book, fetch_book, fetch_books, update_book};
use crate::models::Book;

use super::forms::{BookField, BookForm};
use super::helpers::centered_rect;

/// Footer space reserved for status messages and key hints.
const FOOTER_HEIGHT: u16 = 3;

/// Modal state layered over the book list. Only one modal exists; opening
/// it for another record replaces the previous binding entirely, so the
/// edited id lives here as explicit state rather than in a captured
/// callback.
enum Mode {
    Normal,
    AddingBook(BookForm),
    EditingBook { id: i64, form: BookForm },
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. `books` is a transient snapshot of the store:
/// every mutation goes through the persistence layer and is followed by
/// [`App::reload_books`], which discards the old snapshot wholesale.
pub struct App {
    conn: Connection,
    books: Vec<Book>,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(conn: Connection, books: Vec<Book>) -> Self {
        Self {
            conn,
            books,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Dispatch one key press. Returns `true` when the application should
    /// exit. Persistence errors bubble out of here and terminate the event
    /// loop; only validation problems stay inside the modal.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::EditingBook { id, form } => self.handle_edit_book(code, id, form)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char('a') | KeyCode::Char('+') => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                return self.open_edit();
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.delete_selected()?;
            }
            _ => {}
        }

        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            // Validation failures stay inside the modal; anything the store
            // itself reports is fatal and propagates.
            KeyCode::Enter => match form.parse_inputs() {
                Ok((title, author, year)) => {
                    self.save_new_book(&title, &author, year)?;
                    keep_open = false;
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_book(&mut self, code: KeyCode, id: i64, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok((title, author, year)) => {
                    self.save_existing_book(id, &title, &author, year)?;
                    keep_open = false;
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingBook { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Open the edit modal for the selected row, seeding the form from the
    /// store's current values rather than the rendered snapshot. A record
    /// that vanished since the last render just refreshes the list.
    fn open_edit(&mut self) -> Result<Mode> {
        let Some(id) = self.books.get(self.selected).map(|book| book.id) else {
            self.set_status("No book selected.", StatusKind::Error);
            return Ok(Mode::Normal);
        };

        match fetch_book(&self.conn, id)? {
            Some(book) => {
                self.clear_status();
                Ok(Mode::EditingBook {
                    id: book.id,
                    form: BookForm::from_book(&book),
                })
            }
            None => {
                self.set_status("Book no longer exists.", StatusKind::Error);
                self.reload_books()?;
                Ok(Mode::Normal)
            }
        }
    }

    /// Delete the selected row immediately, without a confirmation prompt.
    fn delete_selected(&mut self) -> Result<()> {
        let Some(book) = self.books.get(self.selected).cloned() else {
            self.set_status("No book selected.", StatusKind::Error);
            return Ok(());
        };

        delete_book(&self.conn, book.id)?;
        self.reload_books()?;
        self.set_status(format!("Deleted \"{}\".", book.title), StatusKind::Info);
        Ok(())
    }

    fn save_new_book(&mut self, title: &str, author: &str, year: Option<i64>) -> Result<()> {
        let created = create_book(&self.conn, title, author, year)?;
        self.reload_books()?;
        self.set_status(format!("Added \"{}\".", created.title), StatusKind::Info);
        Ok(())
    }

    fn save_existing_book(&mut self, id: i64, title: &str, author: &str, year: Option<i64>) -> Result<()> {
        update_book(&self.conn, id, title, author, year)?;
        self.reload_books()?;
        self.set_status(format!("Saved \"{title}\"."), StatusKind::Info);
        Ok(())
    }

    /// Replace the rendered snapshot with a fresh read of the whole table
    /// and clamp the selection into the new bounds.
    fn reload_books(&mut self) -> Result<()> {
        self.books = fetch_books(&self.conn)?;
        if self.books.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.books.len() {
            self.selected = self.books.len() - 1;
        }
        Ok(())
    }

    fn move_selection(&mut self, delta: isize) {
        if self.books.is_empty() {
            return;
        }
        let last = self.books.len() - 1;
        self.selected = match delta {
            d if d < 0 => self.selected.saturating_sub(d.unsigned_abs()),
            d => (self.selected + d as usize).min(last),
        };
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_book_list(frame, content_area);

        // Only paint the footer when the layout actually split; on a
        // footer-height terminal both rects are the full area and the
        // footer would cover the list.
        if area.height > footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, "Add Book", form),
            Mode::EditingBook { form, .. } => self.draw_book_form(frame, area, "Edit Book", form),
            Mode::Normal => {}
        }
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Books");

        if self.books.is_empty() {
            let message = Paragraph::new("No books yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .books
            .iter()
            .map(|book| ListItem::new(Line::from(book.summary())))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = Line::from(Span::styled(
            "[a] add • [e] edit • [d] delete • ↑/↓ select • [q] quit",
            Style::default().fg(Color::Gray),
        ));

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let title_line = form.build_line("Title", BookField::Title);
        let author_line = form.build_line("Author", BookField::Author);
        let year_line = form.build_line("Year", BookField::Year);

        let mut lines = vec![title_line, author_line, year_line, Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            BookField::Title => ("Title: ".len() as u16, 0),
            BookField::Author => ("Author: ".len() as u16, 1),
            BookField::Year => ("Year: ".len() as u16, 2),
        };
        frame.set_cursor_position((
            inner.x + prefix + form.value_len(form.active) as u16,
            inner.y + row,
        ));
    }
}
