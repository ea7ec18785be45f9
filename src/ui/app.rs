use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::db::Store;

use super::forms::{ConfirmUserDelete, FormField, UserForm};
use super::helpers::{centered_rect, cursor_offset, key_hints, metric_card};
use super::view::Snapshot;

const TITLE_HEIGHT: u16 = 2;
const FOOTER_HEIGHT: u16 = 2;
/// Share of the width given to the "New user" sidebar.
const SIDEBAR_PERCENT: u16 = 32;
const DELETE_PANEL_HEIGHT: u16 = 4;
const STATS_PANEL_HEIGHT: u16 = 5;
/// Rows skipped by PageUp / PageDown in the user table.
const PAGE_STEP: isize = 5;
pub(crate) const EMPTY_PLACEHOLDER: &str = "No users in the database yet.";

/// Which part of the screen receives typed keys.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Focus {
    Form,
    Records,
}

/// Modal state layered over the main screen.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmUserDelete),
}

/// A message shown next to the control that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Severity levels used for inline messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Success => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Interaction state for the single screen. Record data is not kept here: the
/// caller passes a fresh `Snapshot` into every draw and key handler.
pub struct App {
    store: Store,
    form: UserForm,
    focus: Focus,
    selected: usize,
    mode: Mode,
    form_message: Option<StatusMessage>,
    delete_message: Option<StatusMessage>,
}

impl App {
    /// Wrap the store and make sure its table exists. A failed initialization
    /// is reported on screen; the app still starts.
    pub fn new(store: Store) -> Self {
        let form_message = match store.initialize() {
            Ok(()) => {
                info!(path = %store.path().display(), "database initialized");
                StatusMessage {
                    text: "Database initialized.".to_string(),
                    kind: StatusKind::Info,
                }
            }
            Err(err) => StatusMessage {
                text: format!("Error while initializing the database: {err}"),
                kind: StatusKind::Error,
            },
        };

        Self {
            store,
            form: UserForm::default(),
            focus: Focus::Form,
            selected: 0,
            mode: Mode::Normal,
            form_message: Some(form_message),
            delete_message: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Dispatch one key press against the snapshot currently on screen.
    /// Returns `true` when the user asked to quit. The caller is expected to
    /// reload the snapshot afterwards.
    pub fn handle_key(&mut self, code: KeyCode, snapshot: &Snapshot) -> bool {
        let mut exit = false;
        if snapshot.is_empty() && self.focus == Focus::Records {
            self.focus = Focus::Form;
        }
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => match self.focus {
                Focus::Form => self.handle_form_key(code, snapshot, &mut exit),
                Focus::Records => self.handle_records_key(code, snapshot, &mut exit),
            },
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        exit
    }

    fn handle_form_key(&mut self, code: KeyCode, snapshot: &Snapshot, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Tab => match self.form.active {
                FormField::Username => self.form.focus(FormField::Email),
                FormField::Email => self.focus_records(snapshot),
            },
            KeyCode::BackTab => match self.form.active {
                FormField::Username => self.focus_records(snapshot),
                FormField::Email => self.form.focus(FormField::Username),
            },
            KeyCode::Down => self.form.focus(FormField::Email),
            KeyCode::Up => self.form.focus(FormField::Username),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(ch) => {
                self.form.push_char(ch);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_records_key(
        &mut self,
        code: KeyCode,
        snapshot: &Snapshot,
        exit: &mut bool,
    ) -> Mode {
        let len = snapshot.records.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Tab => {
                self.focus = Focus::Form;
                self.form.focus(FormField::Username);
            }
            KeyCode::BackTab => {
                self.focus = Focus::Form;
                self.form.focus(FormField::Email);
            }
            KeyCode::Up => self.move_selection(-1, len),
            KeyCode::Down => self.move_selection(1, len),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP, len),
            KeyCode::PageDown => self.move_selection(PAGE_STEP, len),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = len.saturating_sub(1),
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some((_, record)) = snapshot.clamped(self.selected) {
                    self.delete_message = None;
                    return Mode::ConfirmDelete(ConfirmUserDelete {
                        record: record.clone(),
                    });
                }
                self.set_delete_message("No user selected.", StatusKind::Warning);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmUserDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_delete_message("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    /// Presence-check the form and hand it to the store. Store failures keep
    /// the typed values so the user can correct and resubmit.
    fn submit_form(&mut self) {
        let (username, email) = match self.form.parse_inputs() {
            Ok(values) => values,
            Err(err) => {
                self.set_form_message(err.to_string(), StatusKind::Warning);
                return;
            }
        };

        match self.store.create(&username, &email) {
            Ok(id) => {
                info!(id, %username, "user added");
                self.form.clear();
                self.set_form_message(format!("User added: {username}"), StatusKind::Success);
            }
            Err(err) => {
                self.set_form_message(
                    format!("Error while adding user: {err}"),
                    StatusKind::Error,
                );
            }
        }
    }

    fn perform_delete(&mut self, confirm: &ConfirmUserDelete) {
        match self.store.delete_by_id(confirm.record.id) {
            Ok(_) => {
                info!(id = confirm.record.id, "user deleted");
                self.set_delete_message("User deleted.", StatusKind::Success);
            }
            Err(err) => {
                self.set_delete_message(
                    format!("Error while deleting user: {err}"),
                    StatusKind::Error,
                );
            }
        }
    }

    fn focus_records(&mut self, snapshot: &Snapshot) {
        if snapshot.is_empty() {
            self.form.focus(FormField::Username);
        } else {
            self.focus = Focus::Records;
        }
    }

    fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let current = self.selected.min(len - 1) as isize;
        self.selected = (current + delta).clamp(0, len as isize - 1) as usize;
    }

    fn set_form_message<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.form_message = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn set_delete_message<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.delete_message = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub fn form_message(&self) -> Option<&StatusMessage> {
        self.form_message.as_ref()
    }

    pub fn delete_message(&self) -> Option<&StatusMessage> {
        self.delete_message.as_ref()
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.mode, Mode::ConfirmDelete(_))
    }

    pub fn draw(&self, frame: &mut Frame, snapshot: &Snapshot) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TITLE_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_title(frame, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(SIDEBAR_PERCENT),
                Constraint::Percentage(100 - SIDEBAR_PERCENT),
            ])
            .split(chunks[1]);

        self.draw_form(frame, body[0]);
        self.draw_main(frame, body[1], snapshot);
        self.draw_footer(frame, chunks[2]);

        if let Mode::ConfirmDelete(confirm) = &self.mode {
            self.draw_confirm_delete(frame, area, confirm);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            "User Registry",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(title, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Form && !self.is_confirming();
        let mut block = Block::default().title("New user").borders(Borders::ALL);
        if focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines = vec![
            self.form.build_line(FormField::Username, focused),
            self.form.build_line(FormField::Email, focused),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to add user",
                Style::default().fg(Color::Gray),
            )),
        ];
        if let Some(message) = &self.form_message {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                message.text.clone(),
                message.kind.style(),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if focused && inner.width > 0 && inner.height > 1 {
            let field = self.form.active;
            let row = match field {
                FormField::Username => 0,
                FormField::Email => 1,
            };
            let prefix = format!("{}: ", field.label()).len();
            let offset = cursor_offset(prefix, self.form.value_len(field), inner.width);
            frame.set_cursor_position((inner.x + offset, inner.y + row));
        }
    }

    fn draw_main(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        if snapshot.is_empty() {
            let block = Block::default().title("Users").borders(Borders::ALL);
            let message = match &snapshot.load_error {
                Some(err) => Line::from(Span::styled(err.clone(), StatusKind::Error.style())),
                None => Line::from(Span::styled(EMPTY_PLACEHOLDER, StatusKind::Info.style())),
            };
            let paragraph = Paragraph::new(message)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),
                Constraint::Length(DELETE_PANEL_HEIGHT),
                Constraint::Length(STATS_PANEL_HEIGHT),
            ])
            .split(area);

        self.draw_table(frame, chunks[0], snapshot);
        self.draw_delete_panel(frame, chunks[1], snapshot);
        self.draw_stats(frame, chunks[2], snapshot);
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let header = Row::new(["ID", "Username", "Email", "Created at"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = snapshot.records.iter().map(|record| {
            Row::new([
                Cell::from(record.id.to_string()),
                Cell::from(record.username.clone()),
                Cell::from(record.email.clone()),
                Cell::from(record.created_at.clone()),
            ])
        });

        let mut block = Block::default().title("Users").borders(Borders::ALL);
        if self.focus == Focus::Records {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Fill(1),
                Constraint::Fill(2),
                Constraint::Length(19),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("> ");

        let mut state = TableState::default();
        state.select(snapshot.clamped(self.selected).map(|(index, _)| index));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_delete_panel(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let block = Block::default().title("Delete user").borders(Borders::ALL);

        let mut selector = vec![Span::raw("Select user: ")];
        if let Some((index, record)) = snapshot.clamped(self.selected) {
            selector.push(Span::styled(
                record.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            selector.push(Span::styled(
                format!("  ({}/{})", index + 1, snapshot.records.len()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let message = match &self.delete_message {
            Some(message) => Line::from(Span::styled(message.text.clone(), message.kind.style())),
            None => Line::from(""),
        };

        let paragraph = Paragraph::new(vec![Line::from(selector), message]).block(block);
        frame.render_widget(paragraph, area);
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let Some(metrics) = &snapshot.metrics else {
            return;
        };

        let block = Block::default().title("Statistics").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);

        frame.render_widget(metric_card("Total users", metrics.total.to_string()), cards[0]);
        frame.render_widget(
            metric_card("Latest registration", metrics.latest_username.clone()),
            cards[1],
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let hints = match (&self.mode, self.focus) {
            (Mode::ConfirmDelete(_), _) => key_hints(&[("Y", "Confirm"), ("N/Esc", "Cancel")]),
            (Mode::Normal, Focus::Form) => key_hints(&[
                ("Enter", "Add user"),
                ("Tab", "Next field"),
                ("Esc", "Quit"),
            ]),
            (Mode::Normal, Focus::Records) => key_hints(&[
                ("↑/↓", "Select"),
                ("D", "Delete"),
                ("Tab", "Form"),
                ("Q", "Quit"),
            ]),
        };

        frame.render_widget(Paragraph::new(hints), inner);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmUserDelete) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete {}?", confirm.record)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
