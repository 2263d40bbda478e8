//! Terminal browser. The job feed and the applications board share one
//! event loop; network calls run as tokio tasks and report back over a
//! channel that the loop drains between frames.

use anyhow::Result;
use chrono::Local;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::future::Future;
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::api::ApiClient;
use crate::board::{BoardAction, BoardScreen};
use crate::breakdown::{Tone, breakdown_view};
use crate::card::{self, JobCardView, ScoreTier, save_label};
use crate::config::Config;
use crate::error::ApiError;
use crate::feed::{FeedController, FeedView, LoadOutcome, LoadTicket};
use crate::filters::{ChipRow, Facet, facet_chips};
use crate::i18n::Translator;
use crate::kanban;
use crate::models::{
    AgeTier, ApplicationRecord, FilterCounts, FitAnalysis, JobsPage, SaveStatus, ScrapeResponse,
    Stats,
};
use crate::prefs::PreferenceStore;
use crate::status;

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
const NOTICE_TTL: Duration = Duration::from_secs(5);
const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Feed,
    Board,
}

/// Colors for the current theme.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub bg: Color,
    pub text: Color,
    pub dim: Color,
    pub selection: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub good: Color,
    pub warn: Color,
    pub bad: Color,
}

impl Palette {
    pub(crate) fn new(dark: bool, ukraine: bool) -> Self {
        let (bg, text, selection) = if dark {
            (
                Color::Rgb(0x1A, 0x1B, 0x26),
                Color::Rgb(0xE0, 0xE0, 0xE0),
                Color::Rgb(0x33, 0x36, 0x4A),
            )
        } else {
            (
                Color::Rgb(0xFA, 0xFA, 0xFA),
                Color::Rgb(0x20, 0x20, 0x20),
                Color::Rgb(0xDD, 0xE4, 0xF0),
            )
        };
        let (accent, accent_alt) = match (ukraine, dark) {
            (true, _) => (Color::Rgb(0x00, 0x57, 0xB7), Color::Rgb(0xFF, 0xD7, 0x00)),
            (false, true) => (Color::Rgb(0x7A, 0xA2, 0xF7), Color::Rgb(0xBB, 0x9A, 0xF7)),
            (false, false) => (Color::Rgb(0x1E, 0x66, 0xF5), Color::Rgb(0x88, 0x39, 0xEF)),
        };
        Palette {
            bg,
            text,
            dim: Color::Rgb(0x80, 0x80, 0x80),
            selection,
            accent,
            accent_alt,
            good: Color::Rgb(0x2E, 0xA0, 0x43),
            warn: Color::Rgb(0xE6, 0x8A, 0x00),
            bad: Color::Rgb(0xD7, 0x3A, 0x49),
        }
    }

    fn tier(&self, tier: ScoreTier) -> Color {
        match tier {
            ScoreTier::High => self.good,
            ScoreTier::Medium => self.warn,
            ScoreTier::Low => self.dim,
        }
    }

    fn age(&self, tier: AgeTier) -> Color {
        match tier {
            AgeTier::Green => self.good,
            AgeTier::Orange => self.warn,
            AgeTier::Grey => self.dim,
        }
    }

    fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Positive => self.good,
            Tone::Negative => self.bad,
        }
    }
}

/// Results coming back from background tasks.
enum Msg {
    Jobs(LoadTicket, Result<JobsPage, ApiError>),
    Filters(Result<FilterCounts, ApiError>),
    Stats(Result<Stats, ApiError>),
    Fit(i64, Result<FitAnalysis, ApiError>),
    Saved(i64, Result<SaveStatus, ApiError>),
    Hidden(i64, Result<(), ApiError>),
    MarkedSeen(Result<(), ApiError>),
    Scraped(Result<ScrapeResponse, ApiError>),
    Applications(Result<Vec<ApplicationRecord>, ApiError>),
    Letter(i64, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Search,
    Facets { facet: Facet, cursor: usize },
    Breakdown,
}

struct Notice {
    text: String,
    error: bool,
    shown_at: Instant,
}

struct App {
    api: ApiClient,
    handle: Handle,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
    prefs: PreferenceStore,
    t: Translator,
    palette: Palette,
    home_encoded: String,
    home_city: String,
    screen: Screen,
    feed: FeedController,
    counts: FilterCounts,
    stats: Option<Stats>,
    selected: usize,
    list_state: ListState,
    scroll_offset: u16,
    mode: Mode,
    search_draft: String,
    search_due: Option<Instant>,
    scraping: bool,
    board: BoardScreen,
    notice: Option<Notice>,
    quit: bool,
}

impl App {
    fn new(api: ApiClient, config: &Config, prefs: PreferenceStore, screen: Screen) -> Self {
        let (tx, rx) = unbounded_channel();
        let current = prefs.prefs().clone();
        let mut feed = FeedController::new(config.page_size);
        feed.set_exclude_non_local(current.exclude_dutch);

        Self {
            api,
            handle: Handle::current(),
            tx,
            rx,
            t: Translator::new(current.language),
            palette: Palette::new(current.dark_mode, current.ukraine_active()),
            prefs,
            home_encoded: card::encode_home(&config.home_address),
            home_city: config.home_city.clone(),
            screen,
            feed,
            counts: FilterCounts::default(),
            stats: None,
            selected: 0,
            list_state: ListState::default(),
            scroll_offset: 0,
            mode: Mode::Normal,
            search_draft: String::new(),
            search_due: None,
            scraping: false,
            board: BoardScreen::new(),
            notice: None,
            quit: false,
        }
    }

    fn start(&mut self) {
        self.load_jobs(false);
        self.refresh_counts();
        if self.screen == Screen::Board {
            self.refresh_board();
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Msg> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            // the receiver is gone once the UI has exited
            let _ = tx.send(task.await);
        });
    }

    fn load_jobs(&mut self, append: bool) {
        let ticket = if append {
            match self.feed.load_more() {
                Some(ticket) => ticket,
                None => return,
            }
        } else {
            self.selected = 0;
            self.scroll_offset = 0;
            self.feed.begin_load(false)
        };
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.jobs(&ticket.query).await;
            Msg::Jobs(ticket, result)
        });
    }

    /// Facet counts and header stats.
    fn refresh_counts(&mut self) {
        let api = self.api.clone();
        self.spawn(async move { Msg::Filters(api.filters().await) });
        let api = self.api.clone();
        self.spawn(async move { Msg::Stats(api.stats().await) });
    }

    fn refresh_board(&mut self) {
        self.board.set_loading();
        let api = self.api.clone();
        self.spawn(async move { Msg::Applications(api.applications().await) });
    }

    fn current_job_id(&self) -> Option<i64> {
        self.feed.jobs().get(self.selected).map(|j| j.id)
    }

    fn info(&mut self, text: String) {
        self.notice = Some(Notice {
            text,
            error: false,
            shown_at: Instant::now(),
        });
    }

    fn error(&mut self, text: String) {
        self.notice = Some(Notice {
            text,
            error: true,
            shown_at: Instant::now(),
        });
    }

    fn clamp_selection(&mut self) {
        let len = self.feed.jobs().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn handle_msg(&mut self, msg: Msg) {
        match msg {
            Msg::Jobs(ticket, result) => match self.feed.apply(&ticket, result) {
                LoadOutcome::Applied { shown, total } => {
                    tracing::debug!(shown, total, append = ticket.append, "feed updated");
                    self.clamp_selection();
                }
                LoadOutcome::Stale => {}
                LoadOutcome::Failed(summary) => {
                    // a failed first page is shown in place of the list
                    if ticket.append {
                        self.error(self.t.t_with("feed-error", &[("error", summary.as_str())]));
                    }
                }
            },
            Msg::Filters(Ok(counts)) => self.counts = counts,
            Msg::Stats(Ok(stats)) => {
                self.scraping |= stats.scraping;
                self.stats = Some(stats);
            }
            Msg::Filters(Err(err)) | Msg::Stats(Err(err)) => {
                tracing::warn!(error = %err, "header refresh failed");
                self.error(err.summary());
            }
            Msg::Fit(job_id, result) => {
                if let Err(err) = &result {
                    tracing::warn!(job_id, error = %err, "fit analysis failed");
                }
                self.feed.finish_fit(job_id, result.ok());
            }
            Msg::Saved(job_id, Ok(status)) => {
                self.feed.record_save(job_id, status);
                self.info(save_label(&self.t, Some(status)));
            }
            Msg::Saved(job_id, Err(err)) => {
                tracing::warn!(job_id, error = %err, "save failed");
                self.error(err.summary());
            }
            Msg::Hidden(_, Ok(())) => self.refresh_counts(),
            Msg::Hidden(job_id, Err(err)) => {
                tracing::warn!(job_id, error = %err, "hide failed");
                self.error(err.summary());
            }
            Msg::MarkedSeen(Ok(())) => {
                self.info(self.t.t("marked-seen"));
                self.load_jobs(false);
                self.refresh_counts();
            }
            Msg::MarkedSeen(Err(err)) => self.error(err.summary()),
            Msg::Scraped(result) => {
                self.scraping = false;
                let text = status::scrape_message(&result, &self.t);
                match result {
                    Ok(_) => {
                        self.info(text);
                        self.load_jobs(false);
                        self.refresh_counts();
                    }
                    Err(_) => self.error(text),
                }
            }
            Msg::Applications(Ok(list)) => self.board.replace(list),
            Msg::Applications(Err(err)) => {
                tracing::warn!(error = %err, "applications request failed");
                self.board.load_failed();
                self.error(err.summary());
            }
            Msg::Letter(job_id, text) => self.board.show_letter(job_id, text),
        }
    }

    fn tick(&mut self) {
        if self.search_due.is_some_and(|due| Instant::now() >= due) {
            self.apply_search();
        }
        if self
            .notice
            .as_ref()
            .is_some_and(|n| !n.error && n.shown_at.elapsed() >= NOTICE_TTL)
        {
            self.notice = None;
        }
    }

    fn apply_search(&mut self) {
        self.search_due = None;
        if self.search_draft.trim() != self.feed.filters().search() {
            let draft = self.search_draft.clone();
            self.feed.set_search(&draft);
            self.load_jobs(false);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        match self.screen {
            Screen::Feed => self.feed_key(key),
            Screen::Board => {
                let today = Local::now().date_naive();
                if let Some(action) = self.board.handle_key(key, &self.t, today) {
                    self.board_action(action);
                }
            }
        }
    }

    fn board_action(&mut self, action: BoardAction) {
        match action {
            BoardAction::Refresh => self.refresh_board(),
            BoardAction::Update { job_id, update } => {
                let api = self.api.clone();
                self.spawn(async move {
                    let result = match api.update_application(job_id, &update).await {
                        Ok(()) => api.applications().await,
                        Err(err) => Err(err),
                    };
                    Msg::Applications(result)
                });
            }
            BoardAction::Remove { job_id } => {
                let api = self.api.clone();
                self.spawn(async move {
                    let result = match api.remove_application(job_id).await {
                        Ok(()) => api.applications().await,
                        Err(err) => Err(err),
                    };
                    Msg::Applications(result)
                });
            }
            BoardAction::CoverLetter { job_id } => {
                let api = self.api.clone();
                let t = self.t;
                self.spawn(async move {
                    let text = kanban::cover_letter(&api, job_id, &t).await;
                    Msg::Letter(job_id, text)
                });
            }
            BoardAction::Back => {
                self.screen = Screen::Feed;
            }
        }
    }

    fn feed_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Search => self.search_key(key),
            Mode::Facets { facet, cursor } => self.facet_key(key, facet, cursor),
            Mode::Breakdown => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q')) {
                    self.mode = Mode::Normal;
                }
            }
            Mode::Normal => self.normal_key(key),
        }
    }

    fn normal_key(&mut self, key: KeyEvent) {
        let prev_selected = self.selected;
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Esc => self.notice = None,
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.feed.jobs().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(3);
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
            }
            KeyCode::Enter => {
                if let Some(job) = self.current_job_id().and_then(|id| self.feed.job(id)).cloned() {
                    if self.feed.toggle_fit(job.id) == card::FitToggle::Fetch {
                        let api = self.api.clone();
                        self.spawn(async move {
                            let result = api.fit(&job).await;
                            Msg::Fit(job.id, result)
                        });
                    }
                }
            }
            KeyCode::Char('b') => {
                let has_breakdown = self
                    .current_job_id()
                    .and_then(|id| self.feed.job(id))
                    .and_then(|job| breakdown_view(job, &self.t))
                    .is_some();
                if has_breakdown {
                    self.mode = Mode::Breakdown;
                } else {
                    self.info(self.t.t("no-breakdown"));
                }
            }
            KeyCode::Char('s') => {
                // repeat saves still hit the server, which answers "exists"
                if let Some(job_id) = self.current_job_id() {
                    let api = self.api.clone();
                    self.spawn(async move { Msg::Saved(job_id, api.save_application(job_id).await) });
                }
            }
            KeyCode::Char('h') => {
                if let Some(job) = self.current_job_id().and_then(|id| self.feed.remove_job(id)) {
                    self.clamp_selection();
                    self.info(self.t.t_with("hidden-job", &[("title", job.title.as_str())]));
                    let api = self.api.clone();
                    self.spawn(async move { Msg::Hidden(job.id, api.hide_job(job.id).await) });
                }
            }
            KeyCode::Char('/') => {
                self.search_draft = self.feed.filters().search().to_string();
                self.mode = Mode::Search;
            }
            KeyCode::Char('f') => {
                self.mode = Mode::Facets {
                    facet: Facet::Category,
                    cursor: 0,
                };
            }
            KeyCode::Char('o') => {
                let sort = self.feed.filters().sort().next();
                self.feed.set_sort(sort);
                self.load_jobs(false);
            }
            KeyCode::Char('n') => {
                let on = !self.feed.filters().only_new();
                self.feed.set_only_new(on);
                self.load_jobs(false);
            }
            KeyCode::Char('d') => match self.prefs.toggle_exclude_dutch() {
                Ok(on) => {
                    self.feed.set_exclude_non_local(on);
                    self.load_jobs(false);
                }
                Err(err) => self.error(format!("{err:#}")),
            },
            KeyCode::Char('m') => self.load_jobs(true),
            KeyCode::Char('r') => {
                self.load_jobs(false);
                self.refresh_counts();
            }
            KeyCode::Char('S') => {
                if !self.scraping {
                    self.scraping = true;
                    self.info(self.t.t("scanning-text"));
                    let api = self.api.clone();
                    self.spawn(async move { Msg::Scraped(api.scrape().await) });
                }
            }
            KeyCode::Char('M') => {
                let api = self.api.clone();
                self.spawn(async move { Msg::MarkedSeen(api.mark_all_seen().await) });
            }
            KeyCode::Char('L') => {
                let lang = self.t.language().next();
                match self.prefs.set_language(lang) {
                    Ok(()) => {
                        self.t = Translator::new(lang);
                        self.rebuild_palette();
                    }
                    Err(err) => self.error(format!("{err:#}")),
                }
            }
            KeyCode::Char('T') => match self.prefs.toggle_dark_mode() {
                Ok(_) => self.rebuild_palette(),
                Err(err) => self.error(format!("{err:#}")),
            },
            KeyCode::Char('U') => match self.prefs.toggle_ukraine_mode() {
                Ok(_) => {
                    self.rebuild_palette();
                    self.info(self.t.t("prefs-updated"));
                }
                Err(err) => self.error(format!("{err:#}")),
            },
            KeyCode::Char('a') => {
                self.screen = Screen::Board;
                self.refresh_board();
            }
            _ => {}
        }
        if self.selected != prev_selected {
            self.scroll_offset = 0;
        }
    }

    fn rebuild_palette(&mut self) {
        let prefs = self.prefs.prefs();
        self.palette = Palette::new(prefs.dark_mode, prefs.ukraine_active());
    }

    fn search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.apply_search();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.search_draft.clear();
                self.apply_search();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                self.search_draft.pop();
                self.search_due = Some(Instant::now() + SEARCH_DEBOUNCE);
            }
            KeyCode::Char(c) => {
                self.search_draft.push(c);
                self.search_due = Some(Instant::now() + SEARCH_DEBOUNCE);
            }
            _ => {}
        }
    }

    fn chips(&self, facet: Facet) -> Vec<ChipRow> {
        let (counts, pinned) = match facet {
            Facet::Category => (&self.counts.categories, None),
            Facet::City => (&self.counts.cities, Some(self.home_city.as_str())),
            Facet::Source => (&self.counts.sources, None),
        };
        facet_chips(counts, facet, self.feed.filters(), pinned)
    }

    fn facet_key(&mut self, key: KeyEvent, facet: Facet, cursor: usize) {
        let rows = self.chips(facet);
        let step = |from: usize, forward: bool| -> usize {
            let mut idx = from;
            loop {
                let next = if forward {
                    idx + 1
                } else if idx == 0 {
                    return from;
                } else {
                    idx - 1
                };
                match rows.get(next) {
                    Some(ChipRow::Chip { .. }) => return next,
                    Some(ChipRow::Divider) => idx = next,
                    None => return from,
                }
            }
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => self.mode = Mode::Normal,
            KeyCode::Tab | KeyCode::BackTab => {
                let pos = Facet::ALL.iter().position(|f| *f == facet).unwrap_or(0);
                let len = Facet::ALL.len();
                let next = if key.code == KeyCode::Tab {
                    (pos + 1) % len
                } else {
                    (pos + len - 1) % len
                };
                self.mode = Mode::Facets {
                    facet: Facet::ALL[next],
                    cursor: 0,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.mode = Mode::Facets {
                    facet,
                    cursor: step(cursor, true),
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.mode = Mode::Facets {
                    facet,
                    cursor: step(cursor, false),
                };
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(ChipRow::Chip { value, .. }) = rows.get(cursor) {
                    self.feed.toggle_facet(facet, value);
                    self.load_jobs(false);
                }
            }
            KeyCode::Char('c') => {
                self.feed.clear_facet(facet);
                self.load_jobs(false);
            }
            KeyCode::Char('C') => {
                self.feed.clear_filters();
                self.search_draft.clear();
                self.load_jobs(false);
            }
            _ => {}
        }
    }
}

pub fn run(api: ApiClient, config: &Config, prefs: PreferenceStore, screen: Screen) -> Result<()> {
    let mut app = App::new(api, config, prefs, screen);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.quit {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        while let Ok(msg) = app.rx.try_recv() {
            app.handle_msg(msg);
        }
        app.tick();
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let p = app.palette;
    frame.render_widget(
        Block::default().style(Style::default().bg(p.bg).fg(p.text)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(header(app)), chunks[0]);

    match app.screen {
        Screen::Feed => draw_feed(frame, app, chunks[1]),
        Screen::Board => {
            let today = Local::now().date_naive();
            app.board.draw(frame, chunks[1], &app.t, today, &p);
        }
    }

    frame.render_widget(Paragraph::new(footer(app)), chunks[2]);
}

fn header(app: &App) -> Text<'static> {
    let p = &app.palette;
    let t = &app.t;
    let tab = |key: &str, active: bool| {
        let style = if active {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(p.dim)
        };
        Span::styled(format!(" {} ", t.t(key)), style)
    };

    let mut top = vec![
        Span::styled(
            format!("{} ", t.t("site-title")),
            Style::default().fg(p.accent_alt).add_modifier(Modifier::BOLD),
        ),
        tab("nav-jobs", app.screen == Screen::Feed),
        tab("nav-applications", app.screen == Screen::Board),
    ];
    if let Some(stats) = &app.stats {
        let (jobs, new) = status::stats_badges(stats, t);
        top.push(Span::raw(format!("  {jobs}")));
        if let Some(new) = new {
            top.push(Span::styled(format!("  {new}"), Style::default().fg(p.good)));
        }
    }
    if app.scraping {
        top.push(Span::styled(
            format!("  {}", t.t("scanning-text")),
            Style::default().fg(p.warn),
        ));
    }
    top.push(Span::styled(
        format!("  [{}]", t.language().code()),
        Style::default().fg(p.dim),
    ));

    let filters = app.feed.filters();
    let mut second = Vec::new();
    let search = if app.mode == Mode::Search {
        Span::styled(
            format!("/{}_", app.search_draft),
            Style::default().fg(p.accent),
        )
    } else if filters.search().is_empty() {
        Span::styled(t.t("search-placeholder"), Style::default().fg(p.dim))
    } else {
        Span::raw(format!("/{}", filters.search()))
    };
    second.push(search);
    second.push(Span::raw(format!(
        "  {} {}",
        t.t("sort-label"),
        t.t(filters.sort().label_key())
    )));
    if filters.only_new() {
        second.push(Span::styled(
            format!("  [{}]", t.t("toggle-new")),
            Style::default().fg(p.good),
        ));
    }
    if filters.exclude_non_local() {
        second.push(Span::styled(
            format!("  [{}]", t.t("toggle-dutch")),
            Style::default().fg(p.good),
        ));
    }
    for facet in Facet::ALL {
        if let Some(value) = filters.selected(facet) {
            second.push(Span::styled(
                format!("  {}: {value}", t.t(facet.label_key())),
                Style::default().fg(p.accent),
            ));
        }
    }

    Text::from(vec![Line::from(top), Line::from(second)])
}

fn footer(app: &App) -> Line<'static> {
    let p = &app.palette;
    if let Some(notice) = &app.notice {
        return if notice.error {
            Line::from(vec![
                Span::styled(format!(" {}", notice.text), Style::default().fg(p.bad)),
                Span::styled(
                    format!("  ({})", app.t.t("error-dismiss")),
                    Style::default().fg(p.dim),
                ),
            ])
        } else {
            Line::from(Span::styled(
                format!(" {}", notice.text),
                Style::default().fg(p.good),
            ))
        };
    }
    let key = match (app.screen, app.mode) {
        (Screen::Board, _) => app.board.help_key(),
        (Screen::Feed, Mode::Search) => "help-search",
        (Screen::Feed, Mode::Facets { .. }) => "help-facets",
        (Screen::Feed, _) => "help-feed",
    };
    Line::from(Span::styled(app.t.t(key), Style::default().fg(p.dim)))
}

fn draw_feed(frame: &mut Frame, app: &mut App, area: Rect) {
    let p = app.palette;
    let t = app.t;

    let placeholder = match app.feed.view() {
        FeedView::Idle | FeedView::Loading => Some((t.t("loading"), String::new(), p.dim)),
        FeedView::Failed(summary) => Some((
            t.t_with("feed-error", &[("error", summary.as_str())]),
            String::new(),
            p.bad,
        )),
        FeedView::Empty => {
            let filters = app.feed.filters();
            if filters.has_active_facets() || !filters.search().is_empty() || filters.only_new() {
                Some((t.t("no-jobs-found"), String::new(), p.text))
            } else {
                Some((t.t("empty-title"), t.t("empty-text"), p.text))
            }
        }
        FeedView::Listing => None,
    };
    if let Some((title, text, color)) = placeholder {
        let body = Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(text, Style::default().fg(p.dim))),
        ]);
        frame.render_widget(
            Paragraph::new(body)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        draw_facets(frame, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    // Left panel: job list
    let items: Vec<ListItem> = app
        .feed
        .jobs()
        .iter()
        .map(|job| {
            let tier = ScoreTier::classify(job.score);
            let marker = if job.is_new { "●" } else { " " };
            let company = job.company.as_deref().unwrap_or("");
            ListItem::new(Line::from(vec![
                Span::styled(marker.to_string(), Style::default().fg(p.good)),
                Span::styled(format!(" {:>3} ", job.score), Style::default().fg(p.tier(tier))),
                Span::raw(truncate(&job.title, 40)),
                Span::styled(format!(" | {}", truncate(company, 20)), Style::default().fg(p.dim)),
            ]))
        })
        .collect();

    let mut title = status::showing_line(app.feed.jobs().len(), app.feed.total(), &t);
    if app.feed.load_more_visible() {
        title.push_str(&format!(" · m: {}", t.t("btn-load-more")));
    }
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(" {title} ")))
        .highlight_style(Style::default().bg(p.selection).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    app.list_state.select(Some(app.selected));
    frame.render_stateful_widget(list, chunks[0], &mut app.list_state);

    // Right panel: job detail
    let width = chunks[1].width.saturating_sub(2).max(20) as usize;
    let detail = Paragraph::new(build_detail(app, width))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(detail, chunks[1]);

    match app.mode {
        Mode::Breakdown => draw_breakdown(frame, app, area),
        Mode::Facets { .. } => draw_facets(frame, app, area),
        _ => {}
    }
}

fn build_detail(app: &App, width: usize) -> Text<'static> {
    let p = &app.palette;
    let t = &app.t;
    let Some(job) = app.current_job_id().and_then(|id| app.feed.job(id)) else {
        return Text::raw(String::new());
    };
    let view = JobCardView::build(job, t, &app.home_encoded);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(p.dim);

    let mut lines: Vec<Line> = Vec::new();

    // Header
    let mut title = vec![Span::styled(view.title.clone(), bold)];
    if view.is_new {
        title.push(Span::styled(" ●", Style::default().fg(p.good)));
    }
    lines.push(Line::from(title));

    let place: Vec<&str> = [view.company.as_deref(), view.location.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !place.is_empty() {
        lines.push(Line::from(place.join(" • ")));
    }

    let mut badges = Vec::new();
    if let Some(kind) = &view.posting_type {
        badges.push(Span::styled(format!("[{kind}] "), Style::default().fg(p.accent)));
    }
    if let Some(category) = &view.category_badge {
        badges.push(Span::styled(format!("[{category}] "), Style::default().fg(p.accent_alt)));
    }
    if let Some((age, tier)) = &view.age {
        badges.push(Span::styled(format!("{age} "), Style::default().fg(p.age(*tier))));
    }
    if let Some(date) = &view.date_posted {
        badges.push(Span::styled(date.clone(), dim));
    }
    if !badges.is_empty() {
        lines.push(Line::from(badges));
    }

    let salary_style = if view.salary_listed { Style::default().fg(p.good) } else { dim };
    lines.push(Line::from(Span::styled(view.salary.clone(), salary_style)));
    lines.push(Line::from(Span::styled(view.posted_on.clone(), dim)));
    if !view.url.is_empty() {
        lines.push(Line::from(Span::styled(view.url.clone(), Style::default().fg(p.accent))));
    }

    let mut score = vec![Span::styled(
        format!("{} ", view.score),
        Style::default().fg(p.tier(view.tier)).add_modifier(Modifier::BOLD),
    )];
    if view.has_breakdown {
        score.push(Span::styled(format!("(b: {})", t.t("score-breakdown-title")), dim));
    }
    lines.push(Line::from(score));

    if let Some(status) = app.feed.save_status(view.id) {
        lines.push(Line::from(Span::styled(
            save_label(t, Some(status)),
            Style::default().fg(p.good),
        )));
    }

    if let Some(url) = &view.commute_url {
        lines.push(Line::from(""));
        lines.push(Line::from(
            t.t_with("commute-from", &[("home", app.home_city.as_str())]),
        ));
        lines.push(Line::from(Span::styled(url.clone(), dim)));
    }

    if let Some(snippet) = &view.snippet {
        lines.push(Line::from(""));
        for line in textwrap::wrap(snippet, width) {
            lines.push(Line::from(line.into_owned()));
        }
    }

    lines.push(Line::from(""));
    match app.feed.fit_panel(view.id).filter(|panel| panel.open) {
        Some(panel) => {
            for (i, text) in panel.lines(t).into_iter().enumerate() {
                let style = if i == 0 {
                    Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                for line in textwrap::wrap(&text, width) {
                    lines.push(Line::from(Span::styled(line.into_owned(), style)));
                }
            }
        }
        None => lines.push(Line::from(Span::styled(t.t("expand-hint"), dim))),
    }

    Text::from(lines)
}

fn draw_breakdown(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let Some(view) = app
        .current_job_id()
        .and_then(|id| app.feed.job(id))
        .and_then(|job| breakdown_view(job, &app.t))
    else {
        return;
    };

    let popup = centered(area, 50, (view.lines.len() as u16) + 4);
    let inner = popup.width.saturating_sub(4) as usize;
    let row = |label: &str, points: &str, style: Style| {
        let pad = inner.saturating_sub(label.chars().count() + points.chars().count());
        Line::from(vec![
            Span::raw(label.to_string()),
            Span::raw(" ".repeat(pad)),
            Span::styled(points.to_string(), style),
        ])
    };

    let mut lines: Vec<Line> = view
        .lines
        .iter()
        .map(|l| row(&l.label, &l.points, Style::default().fg(p.tone(l.tone))))
        .collect();
    lines.push(Line::from(Span::styled("─".repeat(inner), Style::default().fg(p.dim))));
    lines.push(row(
        &view.total_label,
        &view.total,
        Style::default().fg(p.tone(view.total_tone)).add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.title))
                .style(Style::default().bg(p.bg).fg(p.text)),
        ),
        popup,
    );
}

fn draw_facets(frame: &mut Frame, app: &App, area: Rect) {
    let Mode::Facets { facet, cursor } = app.mode else {
        return;
    };
    let p = &app.palette;
    let rows = app.chips(facet);

    let tabs: Vec<Span> = Facet::ALL
        .into_iter()
        .map(|f| {
            let style = if f == facet {
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(p.dim)
            };
            Span::styled(format!(" {} ", app.t.t(f.label_key())), style)
        })
        .collect();

    let mut lines = vec![Line::from(tabs), Line::from("")];
    for (i, row) in rows.iter().enumerate() {
        match row {
            ChipRow::Divider => {
                lines.push(Line::from(Span::styled("────", Style::default().fg(p.dim))));
            }
            ChipRow::Chip { value, count, active } => {
                let mark = if *active { "[x]" } else { "[ ]" };
                let mut style = if *active {
                    Style::default().fg(p.accent)
                } else {
                    Style::default()
                };
                if i == cursor {
                    style = style.bg(p.selection).add_modifier(Modifier::BOLD);
                }
                lines.push(Line::from(Span::styled(format!("{mark} {value} ({count})"), style)));
            }
        }
    }

    let popup = centered(area, 60, area.height.saturating_sub(4));
    // keep the cursor row in view
    let visible = popup.height.saturating_sub(2) as usize;
    let scroll = (cursor + 2 + 1).saturating_sub(visible) as u16;

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).scroll((scroll, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(p.bg).fg(p.text)),
        ),
        popup,
    );
}

/// A rect of `width_pct` percent of `area`'s width and `height` rows,
/// centered in `area`.
pub(crate) fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_pct.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Cut `s` to at most `max` characters, marking the cut with "...".
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use tempfile::TempDir;
    use tokio::time::timeout;

    /// An app whose server refuses connections, so every spawned request
    /// fails fast and reports back on the channel.
    fn app(dir: &TempDir) -> App {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let config = Config {
            api_url: format!("http://{addr}"),
            page_size: 2,
            timeout_secs: 5,
            ..Default::default()
        };
        let api = ApiClient::new(&config).unwrap();
        let prefs = PreferenceStore::open_at(dir.path().join("prefs")).unwrap();
        App::new(api, &config, prefs, Screen::Feed)
    }

    fn page(ids: std::ops::Range<i64>, total: usize) -> JobsPage {
        let jobs = ids
            .map(|id| serde_json::from_str::<Job>(&format!(r#"{{"id": {id}, "title": "Job {id}"}}"#)))
            .collect::<Result<_, _>>()
            .unwrap();
        JobsPage { total, jobs }
    }

    fn server_error(path: &str) -> ApiError {
        ApiError::Status {
            path: path.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    fn seed(app: &mut App, ids: std::ops::Range<i64>, total: usize) {
        let ticket = app.feed.begin_load(false);
        app.handle_msg(Msg::Jobs(ticket, Ok(page(ids, total))));
    }

    async fn next_msg(app: &mut App) -> Msg {
        timeout(Duration::from_secs(10), app.rx.recv())
            .await
            .expect("no message before timeout")
            .expect("channel closed")
    }

    fn notice(app: &App) -> Option<(&str, bool)> {
        app.notice.as_ref().map(|n| (n.text.as_str(), n.error))
    }

    #[tokio::test]
    async fn successful_hide_refreshes_header() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.handle_msg(Msg::Hidden(3, Ok(())));

        let mut filters = false;
        let mut stats = false;
        for _ in 0..2 {
            match next_msg(&mut app).await {
                Msg::Filters(_) => filters = true,
                Msg::Stats(_) => stats = true,
                _ => panic!("unexpected message after hide"),
            }
        }
        assert!(filters && stats);
    }

    #[tokio::test]
    async fn failed_header_refresh_shows_error() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.handle_msg(Msg::Stats(Err(server_error("/api/stats"))));
        assert_eq!(notice(&app), Some(("server error (500 Internal Server Error)", true)));

        app.notice = None;
        app.handle_msg(Msg::Filters(Err(server_error("/api/filters"))));
        assert_eq!(notice(&app), Some(("server error (500 Internal Server Error)", true)));
    }

    #[tokio::test]
    async fn scrape_flag_clears_on_every_outcome() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.scraping = true;
        app.handle_msg(Msg::Scraped(Err(server_error("/api/scrape"))));
        assert!(!app.scraping);
        assert!(notice(&app).is_some_and(|(_, error)| error));

        app.scraping = true;
        let running = serde_json::from_str(r#"{"status": "already_running"}"#).unwrap();
        app.handle_msg(Msg::Scraped(Ok(running)));
        assert!(!app.scraping);
        assert!(notice(&app).is_some_and(|(_, error)| !error));
    }

    #[tokio::test]
    async fn failed_first_page_replaces_list_without_notice() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        seed(&mut app, 0..2, 2);

        let ticket = app.feed.begin_load(false);
        app.handle_msg(Msg::Jobs(ticket, Err(server_error("/api/jobs"))));
        assert!(matches!(app.feed.view(), FeedView::Failed(_)));
        assert!(app.feed.jobs().is_empty());
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn failed_append_keeps_list_and_shows_error() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        seed(&mut app, 0..2, 5);

        let more = app.feed.load_more().unwrap();
        app.handle_msg(Msg::Jobs(more, Err(server_error("/api/jobs"))));
        assert_eq!(app.feed.view(), &FeedView::Listing);
        assert_eq!(app.feed.jobs().len(), 2);
        let (text, error) = notice(&app).unwrap();
        assert!(error);
        assert!(text.starts_with("Could not load jobs"), "{text}");
    }

    #[tokio::test]
    async fn repeat_save_posts_again() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        seed(&mut app, 7..8, 1);

        app.handle_msg(Msg::Saved(7, Ok(SaveStatus::Exists)));
        assert_eq!(notice(&app), Some(("Already saved", false)));

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
        assert!(matches!(next_msg(&mut app).await, Msg::Saved(7, _)));
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("Офис-менеджер", 8), "Офис-...");
        assert_eq!(truncate("Short", 10), "Short");
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered(area, 50, 10);
        assert_eq!(rect, Rect::new(25, 15, 50, 10));

        let clipped = centered(area, 50, 80);
        assert_eq!(clipped.height, 40);
        assert_eq!(clipped.y, 0);
    }

    #[test]
    fn centered_handles_very_wide_terminals() {
        let area = Rect::new(0, 0, 2000, 60);
        let rect = centered(area, 70, 20);
        assert_eq!(rect, Rect::new(300, 20, 1400, 20));

        let full = centered(Rect::new(0, 0, u16::MAX, 10), 100, 10);
        assert_eq!(full.width, u16::MAX);
        assert_eq!(full.x, 0);
    }

    #[test]
    fn palettes_differ_by_theme() {
        let dark = Palette::new(true, false);
        let light = Palette::new(false, false);
        assert_ne!(dark.bg, light.bg);
        let ukraine = Palette::new(true, true);
        assert_eq!(ukraine.accent, Color::Rgb(0x00, 0x57, 0xB7));
    }
}
