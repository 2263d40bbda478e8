//! Application tracking board. The server list is the only source of truth:
//! every mutation is followed by a full re-fetch.

use chrono::{DateTime, NaiveDate};
use std::future::Future;

use crate::error::ApiError;
use crate::i18n::Translator;
use crate::models::{ApplicationRecord, ApplicationStatus, ApplicationUpdate};

pub trait ApplicationsBackend {
    fn list_applications(
        &self,
    ) -> impl Future<Output = Result<Vec<ApplicationRecord>, ApiError>> + Send;

    fn update_application(
        &self,
        job_id: i64,
        update: &ApplicationUpdate,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn remove_application(&self, job_id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn cover_letter(&self, job_id: i64) -> impl Future<Output = Result<String, ApiError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum KanbanError {
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Update sent when a card lands in `status`. Landing in "applied" stamps
/// today's date unless the application already has one.
pub fn drop_update(
    existing: Option<&ApplicationRecord>,
    status: ApplicationStatus,
    today: NaiveDate,
) -> ApplicationUpdate {
    let date_applied = match status {
        ApplicationStatus::Applied if existing.and_then(|a| a.date_applied).is_none() => {
            Some(Some(today))
        }
        _ => None,
    };
    ApplicationUpdate {
        status: Some(status),
        date_applied,
        ..Default::default()
    }
}

/// Text fields of the notes editor, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesDraft {
    pub notes: String,
    pub date_applied: String,
    pub reminder_date: String,
}

impl NotesDraft {
    pub fn from_record(record: &ApplicationRecord) -> Self {
        Self {
            notes: record.notes.clone().unwrap_or_default(),
            date_applied: record.date_applied.map(|d| d.to_string()).unwrap_or_default(),
            reminder_date: record.reminder_date.map(|d| d.to_string()).unwrap_or_default(),
        }
    }

    /// Every field is sent; blank dates go out as `null`.
    pub fn to_update(&self) -> Result<ApplicationUpdate, KanbanError> {
        Ok(ApplicationUpdate {
            notes: Some(self.notes.clone()),
            date_applied: Some(parse_date(&self.date_applied)?),
            reminder_date: Some(parse_date(&self.reminder_date)?),
            ..Default::default()
        })
    }
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, KanbanError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| KanbanError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub text: String,
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanCard {
    pub job_id: i64,
    pub title: String,
    pub url: String,
    pub subtitle: String,
    pub dates: String,
    pub notes: Option<String>,
    pub reminder: Option<Reminder>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanColumn {
    pub status: ApplicationStatus,
    pub title: String,
    pub cards: Vec<KanbanCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// No applications at all; show the empty-board message instead.
    pub empty: bool,
    pub columns: Vec<KanbanColumn>,
}

impl BoardView {
    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.columns
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.cards.len())
    }
}

#[derive(Debug, Default)]
pub struct KanbanController {
    applications: Vec<ApplicationRecord>,
}

impl KanbanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applications(&self) -> &[ApplicationRecord] {
        &self.applications
    }

    pub fn find(&self, job_id: i64) -> Option<&ApplicationRecord> {
        self.applications.iter().find(|a| a.job_id == job_id)
    }

    /// Swap in a freshly fetched list.
    pub fn replace(&mut self, applications: Vec<ApplicationRecord>) {
        self.applications = applications;
    }

    pub fn plan_move(
        &self,
        job_id: i64,
        status: ApplicationStatus,
        today: NaiveDate,
    ) -> ApplicationUpdate {
        drop_update(self.find(job_id), status, today)
    }

    pub async fn refresh<B: ApplicationsBackend>(&mut self, backend: &B) -> Result<(), ApiError> {
        let applications = backend.list_applications().await?;
        tracing::debug!(count = applications.len(), "applications loaded");
        self.replace(applications);
        Ok(())
    }

    pub async fn move_to<B: ApplicationsBackend>(
        &mut self,
        backend: &B,
        job_id: i64,
        status: ApplicationStatus,
        today: NaiveDate,
    ) -> Result<(), KanbanError> {
        let update = self.plan_move(job_id, status, today);
        backend.update_application(job_id, &update).await?;
        tracing::info!(job_id, status = %status, "application moved");
        self.refresh(backend).await?;
        Ok(())
    }

    pub async fn save_notes<B: ApplicationsBackend>(
        &mut self,
        backend: &B,
        job_id: i64,
        draft: &NotesDraft,
    ) -> Result<(), KanbanError> {
        let update = draft.to_update()?;
        backend.update_application(job_id, &update).await?;
        self.refresh(backend).await?;
        Ok(())
    }

    pub async fn remove<B: ApplicationsBackend>(
        &mut self,
        backend: &B,
        job_id: i64,
    ) -> Result<(), KanbanError> {
        backend.remove_application(job_id).await?;
        tracing::info!(job_id, "application removed");
        self.refresh(backend).await?;
        Ok(())
    }

    pub fn board(&self, t: &Translator, today: NaiveDate) -> BoardView {
        let columns = ApplicationStatus::ALL
            .into_iter()
            .map(|status| KanbanColumn {
                status,
                title: t.t(status.column_key()),
                cards: self
                    .applications
                    .iter()
                    .filter(|a| a.status == status)
                    .map(|a| kanban_card(a, t, today))
                    .collect(),
            })
            .collect();

        BoardView {
            empty: self.applications.is_empty(),
            columns,
        }
    }
}

/// Cover letter text, or the localized error message when generation fails.
pub async fn cover_letter<B: ApplicationsBackend>(backend: &B, job_id: i64, t: &Translator) -> String {
    match backend.cover_letter(job_id).await {
        Ok(letter) => letter,
        Err(err) => {
            tracing::warn!(job_id, error = %err, "cover letter failed");
            t.t("letter-error")
        }
    }
}

fn kanban_card(app: &ApplicationRecord, t: &Translator, today: NaiveDate) -> KanbanCard {
    let subtitle = match (non_blank(&app.company), non_blank(&app.location)) {
        (Some(company), Some(location)) => format!("{company} • {location}"),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => String::new(),
    };

    let mut dates = format!("{} {}", t.t("saved-label"), saved_date(&app.date_saved));
    if let Some(applied) = app.date_applied {
        dates.push_str(&format!(" • {} {}", t.t("applied-label"), applied));
    }

    let reminder = app.reminder_date.map(|date| {
        let overdue = date <= today;
        let icon = if overdue { "⚠" } else { "⏰" };
        Reminder {
            text: format!("{icon} {} {date}", t.t("reminder-label")),
            overdue,
        }
    });

    KanbanCard {
        job_id: app.job_id,
        title: app.title.clone(),
        url: app.url.clone(),
        subtitle,
        dates,
        notes: non_blank(&app.notes).map(str::to_string),
        reminder,
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn saved_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().to_string();
    }
    raw.get(..10).unwrap_or(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(job_id: i64, status: ApplicationStatus) -> ApplicationRecord {
        ApplicationRecord {
            job_id,
            status,
            date_saved: "2026-10-01T09:30:00+00:00".into(),
            date_applied: None,
            notes: None,
            reminder_date: None,
            title: format!("Job {job_id}"),
            company: Some("Acme".into()),
            location: Some("Leiden".into()),
            url: format!("https://example.com/{job_id}"),
        }
    }

    #[test]
    fn drop_into_applied_stamps_today() {
        let today = date("2026-10-16");
        let app = record(1, ApplicationStatus::Interested);
        let update = drop_update(Some(&app), ApplicationStatus::Applied, today);
        assert_eq!(update.status, Some(ApplicationStatus::Applied));
        assert_eq!(update.date_applied, Some(Some(today)));
    }

    #[test]
    fn drop_into_applied_keeps_existing_date() {
        let mut app = record(1, ApplicationStatus::Interview);
        app.date_applied = Some(date("2026-09-01"));
        let update = drop_update(Some(&app), ApplicationStatus::Applied, date("2026-10-16"));
        assert_eq!(update.date_applied, None);
    }

    #[test]
    fn other_columns_leave_date_alone() {
        for status in [
            ApplicationStatus::Interested,
            ApplicationStatus::Interview,
            ApplicationStatus::Offer,
            ApplicationStatus::Rejected,
        ] {
            let update = drop_update(None, status, date("2026-10-16"));
            assert_eq!(update.date_applied, None);
            assert_eq!(update.status, Some(status));
        }
    }

    #[test]
    fn board_groups_by_status() {
        let mut kanban = KanbanController::new();
        kanban.replace(vec![
            record(1, ApplicationStatus::Offer),
            record(2, ApplicationStatus::Applied),
            record(3, ApplicationStatus::Applied),
        ]);
        let board = kanban.board(&Translator::default(), date("2026-10-16"));
        assert!(!board.empty);
        assert_eq!(board.columns.len(), 5);
        assert_eq!(board.columns[1].title, "Applied");
        assert_eq!(board.count(ApplicationStatus::Applied), 2);
        assert_eq!(board.count(ApplicationStatus::Offer), 1);
        assert_eq!(board.count(ApplicationStatus::Rejected), 0);
    }

    #[test]
    fn empty_board() {
        let board = KanbanController::new().board(&Translator::default(), date("2026-10-16"));
        assert!(board.empty);
        assert!(board.columns.iter().all(|c| c.cards.is_empty()));
    }

    #[test]
    fn card_text() {
        let mut app = record(4, ApplicationStatus::Applied);
        app.date_applied = Some(date("2026-10-02"));
        app.reminder_date = Some(date("2026-10-16"));
        app.notes = Some("  ".into());

        let card = kanban_card(&app, &Translator::default(), date("2026-10-16"));
        assert_eq!(card.subtitle, "Acme • Leiden");
        assert_eq!(card.dates, "Saved: 2026-10-01 • Applied: 2026-10-02");
        assert_eq!(card.notes, None);
        let reminder = card.reminder.unwrap();
        assert!(reminder.overdue);
        assert_eq!(reminder.text, "⚠ Reminder: 2026-10-16");
    }

    #[test]
    fn future_reminder_is_not_overdue() {
        let mut app = record(4, ApplicationStatus::Interested);
        app.reminder_date = Some(date("2026-10-20"));
        let card = kanban_card(&app, &Translator::default(), date("2026-10-16"));
        assert!(!card.reminder.unwrap().overdue);
    }

    #[test]
    fn notes_draft_parses_dates() {
        let draft = NotesDraft {
            notes: "Call back".into(),
            date_applied: "2026-10-03".into(),
            reminder_date: " ".into(),
        };
        let update = draft.to_update().unwrap();
        assert_eq!(update.notes.as_deref(), Some("Call back"));
        assert_eq!(update.date_applied, Some(Some(date("2026-10-03"))));
        assert_eq!(update.reminder_date, Some(None));
        assert_eq!(update.status, None);

        let bad = NotesDraft {
            reminder_date: "next week".into(),
            ..Default::default()
        };
        assert!(matches!(bad.to_update(), Err(KanbanError::InvalidDate(_))));
    }

    #[test]
    fn blank_note_dates_serialize_as_null() {
        let draft = NotesDraft {
            notes: String::new(),
            date_applied: String::new(),
            reminder_date: "2026-10-20".into(),
        };
        let body = serde_json::to_value(draft.to_update().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"notes": "", "date_applied": null, "reminder_date": "2026-10-20"})
        );
    }

    #[test]
    fn moves_leave_dates_out_of_the_body() {
        let update = drop_update(None, ApplicationStatus::Offer, date("2026-10-16"));
        let body = serde_json::to_value(update).unwrap();
        assert_eq!(body, serde_json::json!({"status": "offer"}));
    }

    #[test]
    fn saved_date_formats() {
        assert_eq!(saved_date("2026-10-01T09:30:00+00:00"), "2026-10-01");
        assert_eq!(saved_date("2026-10-01 09:30:00"), "2026-10-01");
        assert_eq!(saved_date("soon"), "soon");
    }

    /// In-memory server: updates and removals are applied to its own list.
    #[derive(Default)]
    struct MemoryBackend {
        apps: Mutex<Vec<ApplicationRecord>>,
        updates: Mutex<Vec<(i64, ApplicationUpdate)>>,
        lists: Mutex<usize>,
        fail_letters: bool,
    }

    impl ApplicationsBackend for MemoryBackend {
        async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ApiError> {
            *self.lists.lock().unwrap() += 1;
            Ok(self.apps.lock().unwrap().clone())
        }

        async fn update_application(
            &self,
            job_id: i64,
            update: &ApplicationUpdate,
        ) -> Result<(), ApiError> {
            self.updates.lock().unwrap().push((job_id, update.clone()));
            let mut apps = self.apps.lock().unwrap();
            if let Some(app) = apps.iter_mut().find(|a| a.job_id == job_id) {
                if let Some(status) = update.status {
                    app.status = status;
                }
                if let Some(Some(applied)) = update.date_applied {
                    app.date_applied = Some(applied);
                }
                if update.notes.is_some() {
                    app.notes = update.notes.clone();
                }
                if let Some(Some(reminder)) = update.reminder_date {
                    app.reminder_date = Some(reminder);
                }
            }
            Ok(())
        }

        async fn remove_application(&self, job_id: i64) -> Result<(), ApiError> {
            self.apps.lock().unwrap().retain(|a| a.job_id != job_id);
            Ok(())
        }

        async fn cover_letter(&self, job_id: i64) -> Result<String, ApiError> {
            if self.fail_letters {
                return Err(ApiError::Status {
                    path: "/api/cover-letter".into(),
                    status: reqwest::StatusCode::NOT_FOUND,
                    body: "Job not found".into(),
                });
            }
            Ok(format!("Dear hiring manager ({job_id})"))
        }
    }

    #[tokio::test]
    async fn mutations_refetch_the_board() {
        let backend = MemoryBackend::default();
        backend.apps.lock().unwrap().push(record(7, ApplicationStatus::Interested));
        let mut kanban = KanbanController::new();
        kanban.refresh(&backend).await.unwrap();

        let today = date("2026-10-16");
        kanban
            .move_to(&backend, 7, ApplicationStatus::Applied, today)
            .await
            .unwrap();
        assert_eq!(kanban.find(7).unwrap().status, ApplicationStatus::Applied);
        assert_eq!(kanban.find(7).unwrap().date_applied, Some(today));

        // a second drop must not move the date
        kanban
            .move_to(&backend, 7, ApplicationStatus::Applied, date("2026-10-20"))
            .await
            .unwrap();
        assert_eq!(kanban.find(7).unwrap().date_applied, Some(today));

        kanban.remove(&backend, 7).await.unwrap();
        assert!(kanban.applications().is_empty());
        assert_eq!(*backend.lists.lock().unwrap(), 4);
    }

    #[tokio::test]
    async fn invalid_notes_do_not_hit_the_server() {
        let backend = MemoryBackend::default();
        let mut kanban = KanbanController::new();
        let draft = NotesDraft {
            date_applied: "yesterday".into(),
            ..Default::default()
        };
        assert!(kanban.save_notes(&backend, 1, &draft).await.is_err());
        assert!(backend.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cover_letter_falls_back_to_error_text() {
        let t = Translator::default();
        let ok = MemoryBackend::default();
        assert_eq!(cover_letter(&ok, 3, &t).await, "Dear hiring manager (3)");

        let failing = MemoryBackend {
            fail_letters: true,
            ..Default::default()
        };
        assert_eq!(cover_letter(&failing, 3, &t).await, "Error generating cover letter.");
    }
}
