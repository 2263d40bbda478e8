//! Applications board screen: five status columns, card moves, the notes
//! editor and the cover letter popup. Network work is handed back to the
//! event loop as a [`BoardAction`].

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::i18n::Translator;
use crate::kanban::{KanbanController, NotesDraft};
use crate::models::{ApplicationRecord, ApplicationStatus, ApplicationUpdate};
use crate::tui::{Palette, centered, truncate};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    Refresh,
    /// Send the update, then re-fetch the board.
    Update {
        job_id: i64,
        update: ApplicationUpdate,
    },
    Remove {
        job_id: i64,
    },
    CoverLetter {
        job_id: i64,
    },
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Notes,
    DateApplied,
    Reminder,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Notes => Field::DateApplied,
            Field::DateApplied => Field::Reminder,
            Field::Reminder => Field::Notes,
        }
    }
}

#[derive(Debug)]
struct NotesEditor {
    job_id: i64,
    title: String,
    draft: NotesDraft,
    field: Field,
    error: Option<String>,
}

impl NotesEditor {
    fn value_mut(&mut self) -> &mut String {
        match self.field {
            Field::Notes => &mut self.draft.notes,
            Field::DateApplied => &mut self.draft.date_applied,
            Field::Reminder => &mut self.draft.reminder_date,
        }
    }
}

#[derive(Debug)]
struct LetterPopup {
    job_id: i64,
    title: String,
    text: Option<String>,
    scroll: u16,
}

#[derive(Debug, Default)]
pub struct BoardScreen {
    kanban: KanbanController,
    column: usize,
    row: usize,
    loaded: bool,
    loading: bool,
    editor: Option<NotesEditor>,
    letter: Option<LetterPopup>,
}

impl BoardScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    pub fn load_failed(&mut self) {
        self.loading = false;
    }

    pub fn replace(&mut self, applications: Vec<ApplicationRecord>) {
        self.kanban.replace(applications);
        self.loaded = true;
        self.loading = false;
        self.clamp_row();
    }

    /// Fill the open cover letter popup. A letter for a popup that has since
    /// been closed is dropped.
    pub fn show_letter(&mut self, job_id: i64, text: String) {
        if let Some(popup) = self.letter.as_mut().filter(|p| p.job_id == job_id) {
            popup.text = Some(text);
        }
    }

    pub fn help_key(&self) -> &'static str {
        if self.editor.is_some() {
            "help-notes"
        } else if self.letter.is_some() {
            "help-letter"
        } else {
            "help-board"
        }
    }

    fn status(&self) -> ApplicationStatus {
        ApplicationStatus::ALL[self.column]
    }

    /// Job ids in the focused column, in board order.
    fn column_ids(&self) -> Vec<i64> {
        let status = self.status();
        self.kanban
            .applications()
            .iter()
            .filter(|a| a.status == status)
            .map(|a| a.job_id)
            .collect()
    }

    fn current(&self) -> Option<&ApplicationRecord> {
        let id = *self.column_ids().get(self.row)?;
        self.kanban.find(id)
    }

    fn clamp_row(&mut self) {
        let len = self.column_ids().len();
        if self.row >= len {
            self.row = len.saturating_sub(1);
        }
    }

    fn focus(&mut self, column: usize) {
        self.column = column.min(ApplicationStatus::ALL.len() - 1);
        self.clamp_row();
    }

    /// Move the focused card into `target`; focus follows the card.
    fn move_card(&mut self, target: usize, today: NaiveDate) -> Option<BoardAction> {
        let status = *ApplicationStatus::ALL.get(target)?;
        let job_id = self.current()?.job_id;
        if status == self.status() {
            return None;
        }
        let update = self.kanban.plan_move(job_id, status, today);
        self.column = target;
        self.row = self
            .kanban
            .applications()
            .iter()
            .filter(|a| a.status == status)
            .count();
        Some(BoardAction::Update { job_id, update })
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        t: &Translator,
        today: NaiveDate,
    ) -> Option<BoardAction> {
        if let Some(popup) = self.letter.as_mut() {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('c') => self.letter = None,
                KeyCode::Down | KeyCode::Char('j') => popup.scroll = popup.scroll.saturating_add(1),
                KeyCode::Up | KeyCode::Char('k') => popup.scroll = popup.scroll.saturating_sub(1),
                _ => {}
            }
            return None;
        }

        if let Some(editor) = self.editor.as_mut() {
            match key.code {
                KeyCode::Esc => self.editor = None,
                KeyCode::Tab => editor.field = editor.field.next(),
                KeyCode::BackTab => editor.field = editor.field.next().next(),
                KeyCode::Backspace => {
                    editor.value_mut().pop();
                }
                KeyCode::Char(c) => editor.value_mut().push(c),
                KeyCode::Enter => match editor.draft.to_update() {
                    Ok(update) => {
                        let job_id = editor.job_id;
                        self.editor = None;
                        return Some(BoardAction::Update { job_id, update });
                    }
                    Err(err) => editor.error = Some(err.to_string()),
                },
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(BoardAction::Back),
            KeyCode::Left | KeyCode::Char('h') => self.focus(self.column.saturating_sub(1)),
            KeyCode::Right | KeyCode::Char('l') => self.focus(self.column + 1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.row + 1 < self.column_ids().len() {
                    self.row += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.row = self.row.saturating_sub(1),
            KeyCode::Char('H') => {
                let target = self.column.checked_sub(1)?;
                return self.move_card(target, today);
            }
            KeyCode::Char('L') => return self.move_card(self.column + 1, today),
            KeyCode::Char(c @ '1'..='5') => {
                let target = c as usize - '1' as usize;
                return self.move_card(target, today);
            }
            KeyCode::Char('e') => {
                let app = self.current()?;
                let editor = NotesEditor {
                    job_id: app.job_id,
                    title: app.title.clone(),
                    draft: NotesDraft::from_record(app),
                    field: Field::Notes,
                    error: None,
                };
                self.editor = Some(editor);
            }
            KeyCode::Char('c') => {
                let app = self.current()?;
                let popup = LetterPopup {
                    job_id: app.job_id,
                    title: format!("{} · {}", t.t("modal-cover-letter"), app.title),
                    text: None,
                    scroll: 0,
                };
                let job_id = popup.job_id;
                self.letter = Some(popup);
                return Some(BoardAction::CoverLetter { job_id });
            }
            KeyCode::Char('x') => {
                let job_id = self.current()?.job_id;
                return Some(BoardAction::Remove { job_id });
            }
            KeyCode::Char('r') => return Some(BoardAction::Refresh),
            _ => {}
        }
        None
    }

    pub(crate) fn draw(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        t: &Translator,
        today: NaiveDate,
        p: &Palette,
    ) {
        if !self.loaded {
            let text = if self.loading { t.t("loading") } else { String::new() };
            frame.render_widget(
                Paragraph::new(Span::styled(text, Style::default().fg(p.dim)))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }

        let board = self.kanban.board(t, today);
        if board.empty {
            let body = Text::from(vec![
                Line::from(""),
                Line::from(Span::styled(
                    t.t("kanban-empty-title"),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(t.t("kanban-empty-text"), Style::default().fg(p.dim))),
            ]);
            frame.render_widget(
                Paragraph::new(body)
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 5); 5])
            .split(area);

        for (idx, column) in board.columns.iter().enumerate() {
            let focused = idx == self.column;
            let width = chunks[idx].width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = column
                .cards
                .iter()
                .map(|card| {
                    let mut lines = vec![Line::from(Span::styled(
                        truncate(&card.title, width),
                        Style::default().add_modifier(Modifier::BOLD),
                    ))];
                    if !card.subtitle.is_empty() {
                        lines.push(Line::from(Span::styled(
                            truncate(&card.subtitle, width),
                            Style::default().fg(p.dim),
                        )));
                    }
                    lines.push(Line::from(Span::styled(
                        truncate(&card.dates, width),
                        Style::default().fg(p.dim),
                    )));
                    if let Some(notes) = &card.notes {
                        lines.push(Line::from(Span::styled(
                            truncate(notes, width),
                            Style::default().add_modifier(Modifier::ITALIC),
                        )));
                    }
                    if let Some(reminder) = &card.reminder {
                        let color = if reminder.overdue { p.bad } else { p.warn };
                        lines.push(Line::from(Span::styled(
                            truncate(&reminder.text, width),
                            Style::default().fg(color),
                        )));
                    }
                    lines.push(Line::from(""));
                    ListItem::new(lines)
                })
                .collect();

            let border = if focused { p.accent } else { p.dim };
            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border))
                        .title(format!(" {} ({}) ", column.title, column.cards.len())),
                )
                .highlight_style(Style::default().bg(p.selection));

            let mut state = ListState::default();
            if focused && !column.cards.is_empty() {
                state.select(Some(self.row));
            }
            frame.render_stateful_widget(list, chunks[idx], &mut state);
        }

        if let Some(editor) = &self.editor {
            draw_editor(frame, area, editor, t, p);
        }
        if let Some(popup) = &self.letter {
            draw_letter(frame, area, popup, t, p);
        }
    }
}

fn draw_editor(frame: &mut Frame, area: Rect, editor: &NotesEditor, t: &Translator, p: &Palette) {
    let popup = centered(area, 60, 12);
    let field = |label: String, value: &str, placeholder: String, active: bool| {
        let label_style = if active {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.dim)
        };
        let value = if value.is_empty() && !active {
            Span::styled(placeholder, Style::default().fg(p.dim))
        } else if active {
            Span::styled(format!("{value}_"), Style::default().bg(p.selection))
        } else {
            Span::raw(value.to_string())
        };
        vec![Line::from(Span::styled(label, label_style)), Line::from(value), Line::from("")]
    };

    let mut lines = Vec::new();
    lines.extend(field(
        t.t("btn-notes"),
        &editor.draft.notes,
        t.t("notes-placeholder"),
        editor.field == Field::Notes,
    ));
    lines.extend(field(
        t.t("label-date-applied"),
        &editor.draft.date_applied,
        "YYYY-MM-DD".into(),
        editor.field == Field::DateApplied,
    ));
    lines.extend(field(
        t.t("label-reminder"),
        &editor.draft.reminder_date,
        "YYYY-MM-DD".into(),
        editor.field == Field::Reminder,
    ));
    if let Some(err) = &editor.error {
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(p.bad))));
    }

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} · {} ", t.t("modal-edit-notes"), editor.title))
                .style(Style::default().bg(p.bg).fg(p.text)),
        ),
        popup,
    );
}

fn draw_letter(frame: &mut Frame, area: Rect, popup: &LetterPopup, t: &Translator, p: &Palette) {
    let rect = centered(area, 70, area.height.saturating_sub(2));
    let width = rect.width.saturating_sub(2).max(20) as usize;
    let text = match &popup.text {
        Some(letter) => Text::from(
            letter
                .lines()
                .flat_map(|line| {
                    if line.is_empty() {
                        vec![Line::from("")]
                    } else {
                        textwrap::wrap(line, width)
                            .into_iter()
                            .map(|l| Line::from(l.into_owned()))
                            .collect()
                    }
                })
                .collect::<Vec<_>>(),
        ),
        None => Text::from(Span::styled(t.t("generating-letter"), Style::default().fg(p.dim))),
    };

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text).scroll((popup.scroll, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", popup.title))
                .style(Style::default().bg(p.bg).fg(p.text)),
        ),
        rect,
    );
}
