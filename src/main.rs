use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use jobfinder::api::ApiClient;
use jobfinder::card::{self, JobCardView, save_label};
use jobfinder::config::Config;
use jobfinder::feed::{FeedController, LoadOutcome};
use jobfinder::feedback::feedback_entries;
use jobfinder::filters::{ChipRow, Facet, FilterState, SortOrder, facet_chips};
use jobfinder::i18n::{Language, Translator};
use jobfinder::kanban::{self, KanbanController, NotesDraft};
use jobfinder::models::{ApplicationStatus, Job, NewFeedback};
use jobfinder::prefs::PreferenceStore;
use jobfinder::tui::{self, Screen, truncate};
use jobfinder::{logging, status};

#[derive(Parser)]
#[command(name = "jobfinder")]
#[command(about = "Browse, filter and track job postings from a JobFinder server")]
struct Cli {
    /// Server base URL (overrides config.toml and JOBFINDER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the job feed (default)
    Browse,

    /// Open the applications board
    Board,

    /// List jobs
    Jobs {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by city
        #[arg(long)]
        city: Option<String>,

        /// Filter by source board
        #[arg(long)]
        source: Option<String>,

        /// Sort order (newest, score, oldest)
        #[arg(long, default_value = "newest")]
        sort: SortOrder,

        /// Only jobs not seen before
        #[arg(short, long)]
        new: bool,

        /// Minimum monthly salary in euros
        #[arg(long)]
        min_salary: Option<u32>,

        /// Page through every matching job
        #[arg(long)]
        all: bool,
    },

    /// Show filter counts
    Filters,

    /// Show job counters
    Stats,

    /// Scan all job boards for new postings
    Scrape,

    /// Explain how well a job fits
    Fit {
        /// Job ID
        job_id: i64,
    },

    /// Save a job to the applications board
    Save {
        /// Job ID
        job_id: i64,
    },

    /// Hide a job from the feed
    Hide {
        /// Job ID
        job_id: i64,
    },

    /// Mark every job as seen
    MarkSeen,

    /// Manage saved applications
    Apps {
        #[command(subcommand)]
        command: AppsCommands,
    },

    /// Manage custom search keywords
    Keywords {
        #[command(subcommand)]
        command: KeywordCommands,
    },

    /// Manage custom job boards
    Boards {
        #[command(subcommand)]
        command: BoardCommands,
    },

    /// Read or send feedback
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
}

#[derive(Subcommand)]
enum AppsCommands {
    /// List applications by column
    List,

    /// Move an application to another column
    Move {
        /// Job ID
        job_id: i64,

        /// Target column (interested, applied, interview, offer, rejected)
        status: ApplicationStatus,
    },

    /// Edit notes and dates
    Notes {
        /// Job ID
        job_id: i64,

        /// Notes text
        #[arg(short, long)]
        notes: Option<String>,

        /// Date applied (YYYY-MM-DD)
        #[arg(short, long)]
        applied: Option<String>,

        /// Reminder date (YYYY-MM-DD)
        #[arg(short, long)]
        reminder: Option<String>,
    },

    /// Remove an application
    Remove {
        /// Job ID
        job_id: i64,
    },

    /// Generate a cover letter
    Letter {
        /// Job ID
        job_id: i64,
    },
}

#[derive(Subcommand)]
enum KeywordCommands {
    /// List custom keywords
    List,

    /// Add a keyword
    Add {
        keyword: String,
    },

    /// Remove a keyword
    Remove {
        /// Keyword ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum BoardCommands {
    /// List custom job boards
    List,

    /// Add a job board
    Add {
        name: String,

        /// Board URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Remove a job board
    Remove {
        /// Board ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum FeedbackCommands {
    /// Show previous feedback
    List,

    /// Send feedback
    Send {
        /// What would you like to improve?
        #[arg(long, default_value = "")]
        improve: String,

        /// Job boards or websites to add
        #[arg(long, default_value = "")]
        boards: String,

        /// Any other suggestions
        #[arg(long, default_value = "")]
        suggestions: String,
    },
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Show current preferences
    Show,

    /// Set the interface language (en, ru, ua)
    Lang {
        lang: Language,
    },

    /// Dark theme
    Dark {
        state: Switch,
    },

    /// Ukraine theme (takes effect with the ua language)
    Ukraine {
        state: Switch,
    },

    /// Hide jobs that require Dutch
    ExcludeDutch {
        state: Switch,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn is_on(self) -> bool {
        matches!(self, Switch::On)
    }
}

/// Page through the feed until `job_id` turns up.
async fn find_job(api: &ApiClient, page_size: usize, job_id: i64) -> Result<Job> {
    let mut feed = FeedController::new(page_size);
    let mut outcome = feed.load(api, false).await;
    loop {
        if let LoadOutcome::Failed(err) = &outcome {
            bail!("Could not load jobs: {}", err);
        }
        if let Some(job) = feed.job(job_id) {
            return Ok(job.clone());
        }
        match feed.load_next_page(api).await {
            Some(next) => outcome = next,
            None => bail!("Job #{} not found.", job_id),
        }
    }
}

fn print_jobs(jobs: &[Job], t: &Translator, home: &str) {
    println!(
        "{:<6} {:>5} {:<36} {:<20} {:<16} {:<20}",
        "ID", "SCORE", "TITLE", "COMPANY", "LOCATION", "SALARY"
    );
    println!("{}", "-".repeat(108));
    for job in jobs {
        let view = JobCardView::build(job, t, home);
        let marker = if view.is_new { "*" } else { " " };
        println!(
            "{:<6} {:>5} {:<36} {:<20} {:<16} {:<20}",
            format!("{}{}", view.id, marker),
            view.score,
            truncate(&view.title, 34),
            truncate(view.company.as_deref().unwrap_or("-"), 18),
            truncate(view.location.as_deref().unwrap_or("-"), 14),
            truncate(&view.salary, 20),
        );
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = logging::init()?;
    let config = Config::load()?.with_api_url(cli.api_url);
    tracing::info!(api_url = %config.api_url, log = %log_path.display(), "starting");

    let mut prefs = PreferenceStore::open()?;
    let t = Translator::new(prefs.prefs().language);
    let api = ApiClient::new(&config)?;
    let home = card::encode_home(&config.home_address);

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            tokio::task::block_in_place(|| tui::run(api, &config, prefs, Screen::Feed))?;
        }

        Commands::Board => {
            tokio::task::block_in_place(|| tui::run(api, &config, prefs, Screen::Board))?;
        }

        Commands::Jobs {
            search,
            category,
            city,
            source,
            sort,
            new,
            min_salary,
            all,
        } => {
            let mut feed = FeedController::new(config.page_size);
            if let Some(search) = search {
                feed.set_search(&search);
            }
            for (facet, value) in [
                (Facet::Category, category),
                (Facet::City, city),
                (Facet::Source, source),
            ] {
                if let Some(value) = value {
                    feed.toggle_facet(facet, &value);
                }
            }
            feed.set_sort(sort);
            feed.set_only_new(new);
            feed.set_min_salary(min_salary);
            feed.set_exclude_non_local(prefs.prefs().exclude_dutch);

            let mut outcome = feed.load(&api, false).await;
            if all {
                while !matches!(outcome, LoadOutcome::Failed(_)) {
                    match feed.load_next_page(&api).await {
                        Some(next) => outcome = next,
                        None => break,
                    }
                }
            }

            match outcome {
                LoadOutcome::Failed(err) => {
                    bail!("{}", t.t_with("feed-error", &[("error", err.as_str())]))
                }
                _ if feed.jobs().is_empty() => println!("{}", t.t("no-jobs-found")),
                _ => {
                    print_jobs(feed.jobs(), &t, &home);
                    println!();
                    println!("{}", status::showing_line(feed.jobs().len(), feed.total(), &t));
                }
            }
        }

        Commands::Filters => {
            let counts = api.filters().await?;
            let filters = FilterState::default();
            for facet in Facet::ALL {
                let (values, pinned) = match facet {
                    Facet::Category => (&counts.categories, None),
                    Facet::City => (&counts.cities, Some(config.home_city.as_str())),
                    Facet::Source => (&counts.sources, None),
                };
                println!("{}", t.t(facet.label_key()));
                for row in facet_chips(values, facet, &filters, pinned) {
                    match row {
                        ChipRow::Chip { value, count, .. } => println!("  {:<30} {:>6}", value, count),
                        ChipRow::Divider => println!("  {}", "-".repeat(37)),
                    }
                }
                println!();
            }
        }

        Commands::Stats => {
            let stats = api.stats().await?;
            let (jobs, new) = status::stats_badges(&stats, &t);
            println!("{}", jobs);
            if let Some(new) = new {
                println!("{}", new);
            }
            if let Some(last) = &stats.last_scrape {
                println!("Last scan: {}", last);
            }
            if stats.scraping {
                println!("{}", t.t("scanning-text"));
            }
        }

        Commands::Scrape => {
            println!("{}", t.t("scanning-text"));
            let result = api.scrape().await;
            println!("{}", status::scrape_message(&result, &t));
        }

        Commands::Fit { job_id } => {
            let job = find_job(&api, config.page_size, job_id).await?;
            println!("{}", job.title);
            match api.fit(&job).await {
                Ok(fit) => {
                    println!("{}", fit.tagline);
                    for bullet in fit.bullets {
                        for line in textwrap::fill(&bullet, 76).lines() {
                            println!("  {}", line);
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(job_id, error = %err, "fit analysis failed");
                    println!("{}", t.t("fit-error"));
                }
            }
        }

        Commands::Save { job_id } => {
            let status = api.save_application(job_id).await?;
            println!("{}", save_label(&t, Some(status)));
        }

        Commands::Hide { job_id } => {
            api.hide_job(job_id).await?;
            let id = job_id.to_string();
            println!("{}", t.t_with("hidden-job-id", &[("id", id.as_str())]));
        }

        Commands::MarkSeen => {
            api.mark_all_seen().await?;
            println!("{}", t.t("marked-seen"));
        }

        Commands::Apps { command } => {
            let today = Local::now().date_naive();
            let mut kanban = KanbanController::new();
            match command {
                AppsCommands::List => {
                    kanban.refresh(&api).await?;
                    let board = kanban.board(&t, today);
                    if board.empty {
                        println!("{}", t.t("kanban-empty-title"));
                        println!("{}", t.t("kanban-empty-text"));
                    }
                    for column in board.columns.iter().filter(|c| !c.cards.is_empty()) {
                        println!("== {} ({}) ==", column.title, column.cards.len());
                        for card in &column.cards {
                            println!("  #{:<6} {}", card.job_id, card.title);
                            if !card.subtitle.is_empty() {
                                println!("          {}", card.subtitle);
                            }
                            println!("          {}", card.dates);
                            if let Some(notes) = &card.notes {
                                println!("          {}", truncate(notes, 60));
                            }
                            if let Some(reminder) = &card.reminder {
                                println!("          {}", reminder.text);
                            }
                        }
                        println!();
                    }
                }

                AppsCommands::Move { job_id, status } => {
                    kanban.refresh(&api).await?;
                    if kanban.find(job_id).is_none() {
                        bail!("Application #{} not found.", job_id);
                    }
                    kanban.move_to(&api, job_id, status, today).await?;
                    println!("Moved #{} to {}.", job_id, t.t(status.column_key()));
                }

                AppsCommands::Notes {
                    job_id,
                    notes,
                    applied,
                    reminder,
                } => {
                    kanban.refresh(&api).await?;
                    let record = kanban
                        .find(job_id)
                        .with_context(|| format!("Application #{} not found.", job_id))?;
                    let mut draft = NotesDraft::from_record(record);
                    if let Some(notes) = notes {
                        draft.notes = notes;
                    }
                    if let Some(applied) = applied {
                        draft.date_applied = applied;
                    }
                    if let Some(reminder) = reminder {
                        draft.reminder_date = reminder;
                    }
                    kanban.save_notes(&api, job_id, &draft).await?;
                    println!("Updated #{}.", job_id);
                }

                AppsCommands::Remove { job_id } => {
                    kanban.remove(&api, job_id).await?;
                    println!("Removed #{}.", job_id);
                }

                AppsCommands::Letter { job_id } => {
                    println!("{}", t.t("generating-letter"));
                    println!();
                    println!("{}", kanban::cover_letter(&api, job_id, &t).await);
                }
            }
        }

        Commands::Keywords { command } => match command {
            KeywordCommands::List => {
                let keywords = api.custom_keywords().await?;
                if keywords.is_empty() {
                    println!("No custom keywords.");
                } else {
                    println!("{:<6} {:<40}", "ID", "KEYWORD");
                    println!("{}", "-".repeat(46));
                    for kw in keywords {
                        println!("{:<6} {:<40}", kw.id, kw.keyword);
                    }
                }
            }
            KeywordCommands::Add { keyword } => {
                let keyword = keyword.trim();
                if keyword.is_empty() {
                    bail!("Keyword cannot be empty.");
                }
                api.add_custom_keyword(keyword).await?;
                println!("Added keyword '{}'.", keyword);
            }
            KeywordCommands::Remove { id } => {
                api.remove_custom_keyword(id).await?;
                println!("Removed keyword #{}.", id);
            }
        },

        Commands::Boards { command } => match command {
            BoardCommands::List => {
                let boards = api.custom_job_boards().await?;
                if boards.is_empty() {
                    println!("No custom job boards.");
                } else {
                    println!("{:<6} {:<24} {:<50}", "ID", "NAME", "URL");
                    println!("{}", "-".repeat(80));
                    for board in boards {
                        println!(
                            "{:<6} {:<24} {:<50}",
                            board.id,
                            truncate(&board.name, 22),
                            board.url.unwrap_or_default()
                        );
                    }
                }
            }
            BoardCommands::Add { name, url } => {
                let name = name.trim();
                if name.is_empty() {
                    bail!("Board name cannot be empty.");
                }
                api.add_custom_job_board(name, url.as_deref()).await?;
                println!("Added job board '{}'.", name);
            }
            BoardCommands::Remove { id } => {
                api.remove_custom_job_board(id).await?;
                println!("Removed job board #{}.", id);
            }
        },

        Commands::Feedback { command } => match command {
            FeedbackCommands::List => {
                let entries = feedback_entries(&api.feedback().await?, &t);
                if entries.is_empty() {
                    println!("{}", t.t("feedback-empty"));
                }
                for entry in entries {
                    println!("{}", entry.date);
                    for (label, text) in entry.sections {
                        println!("  {}", label);
                        for line in textwrap::fill(&text, 74).lines() {
                            println!("    {}", line);
                        }
                    }
                    println!();
                }
            }
            FeedbackCommands::Send {
                improve,
                boards,
                suggestions,
            } => {
                let feedback = NewFeedback {
                    improve,
                    job_boards: boards,
                    suggestions,
                };
                if feedback.is_empty() {
                    bail!("Nothing to send: fill in at least one of --improve, --boards, --suggestions.");
                }
                api.send_feedback(&feedback).await?;
                println!("{}", t.t("feedback-thanks"));
            }
        },

        Commands::Prefs { command } => {
            match command {
                PrefsCommands::Show => {}
                PrefsCommands::Lang { lang } => prefs.set_language(lang)?,
                PrefsCommands::Dark { state } => prefs.set_dark_mode(state.is_on())?,
                PrefsCommands::Ukraine { state } => prefs.set_ukraine_mode(state.is_on())?,
                PrefsCommands::ExcludeDutch { state } => prefs.set_exclude_dutch(state.is_on())?,
            }
            let current = prefs.prefs();
            println!("Language:      {}", current.language);
            println!("Dark mode:     {}", on_off(current.dark_mode));
            println!("Ukraine mode:  {}", on_off(current.ukraine_mode));
            println!("Exclude Dutch: {}", on_off(current.exclude_dutch));
            println!("Stored in {}", prefs.path().display());
        }
    }

    Ok(())
}
