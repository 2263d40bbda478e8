//! Job feed state: filters, pagination and the generation fence that keeps
//! late responses from overwriting newer ones.

use std::collections::HashMap;
use std::future::Future;

use crate::card::{FitPanel, FitToggle};
use crate::error::ApiError;
use crate::filters::{Facet, FilterState, JobQuery, SortOrder};
use crate::models::{FitAnalysis, Job, JobsPage, SaveStatus};

pub trait JobsBackend {
    fn fetch_jobs(
        &self,
        query: &JobQuery,
    ) -> impl Future<Output = Result<JobsPage, ApiError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedView {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Listing,
    Empty,
    Failed(String),
}

/// Captured at request time and handed back with the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub append: bool,
    pub query: JobQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { shown: usize, total: usize },
    Stale,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
struct CardState {
    saved: Option<SaveStatus>,
    fit: FitPanel,
}

#[derive(Debug)]
pub struct FeedController {
    filters: FilterState,
    page_size: usize,
    offset: usize,
    generation: u64,
    total: usize,
    jobs: Vec<Job>,
    view: FeedView,
    load_more_visible: bool,
    append_in_flight: bool,
    cards: HashMap<i64, CardState>,
}

impl FeedController {
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: FilterState::default(),
            page_size: page_size.max(1),
            offset: 0,
            generation: 0,
            total: 0,
            jobs: Vec::new(),
            view: FeedView::Idle,
            load_more_visible: false,
            append_in_flight: false,
            cards: HashMap::new(),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, job_id: i64) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == job_id)
    }

    pub fn view(&self) -> &FeedView {
        &self.view
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn load_more_visible(&self) -> bool {
        self.load_more_visible
    }

    // Filter mutations. Each one rewinds the cursor so the next load starts
    // from the first page.

    pub fn toggle_facet(&mut self, facet: Facet, value: &str) {
        self.filters.toggle_facet(facet, value);
        self.offset = 0;
    }

    pub fn clear_facet(&mut self, facet: Facet) {
        self.filters.clear_facet(facet);
        self.offset = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
        self.offset = 0;
    }

    pub fn set_search(&mut self, text: &str) {
        self.filters.set_search(text);
        self.offset = 0;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filters.set_sort(sort);
        self.offset = 0;
    }

    pub fn set_only_new(&mut self, on: bool) {
        self.filters.set_only_new(on);
        self.offset = 0;
    }

    pub fn set_exclude_non_local(&mut self, on: bool) {
        self.filters.set_exclude_non_local(on);
        self.offset = 0;
    }

    pub fn set_min_salary(&mut self, floor: Option<u32>) {
        self.filters.set_min_salary(floor);
        self.offset = 0;
    }

    /// Start a load. A fresh load clears the list immediately and bumps the
    /// generation, which invalidates every request still in flight.
    pub fn begin_load(&mut self, append: bool) -> LoadTicket {
        if !append {
            self.offset = 0;
            self.generation += 1;
            self.jobs.clear();
            self.cards.clear();
            self.total = 0;
            self.load_more_visible = false;
            self.append_in_flight = false;
            self.view = FeedView::Loading;
        }
        LoadTicket {
            generation: self.generation,
            append,
            query: self.filters.query(self.offset, self.page_size),
        }
    }

    /// Advance to the next page. Returns `None` while another page is still
    /// loading or when there is nothing more to load.
    pub fn load_more(&mut self) -> Option<LoadTicket> {
        if self.append_in_flight || !self.load_more_visible {
            return None;
        }
        self.offset += self.page_size;
        self.append_in_flight = true;
        Some(self.begin_load(true))
    }

    pub fn apply(&mut self, ticket: &LoadTicket, result: Result<JobsPage, ApiError>) -> LoadOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale jobs response"
            );
            return LoadOutcome::Stale;
        }
        if ticket.append {
            self.append_in_flight = false;
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(error = %err, append = ticket.append, "jobs request failed");
                let summary = err.summary();
                if ticket.append {
                    // keep what is shown; the same page can be requested again
                    self.offset = self.offset.saturating_sub(self.page_size);
                } else {
                    self.view = FeedView::Failed(summary.clone());
                    self.load_more_visible = false;
                }
                return LoadOutcome::Failed(summary);
            }
        };

        self.total = page.total;
        let returned = page.jobs.len();

        if returned == 0 && !ticket.append {
            self.view = FeedView::Empty;
            self.load_more_visible = false;
            return LoadOutcome::Applied { shown: 0, total: self.total };
        }

        self.jobs.extend(page.jobs);
        self.view = FeedView::Listing;
        self.load_more_visible = ticket.query.offset + returned < self.total;

        LoadOutcome::Applied {
            shown: self.jobs.len(),
            total: self.total,
        }
    }

    /// Issue and apply a load in one step.
    pub async fn load<B: JobsBackend>(&mut self, backend: &B, append: bool) -> LoadOutcome {
        let ticket = self.begin_load(append);
        let result = backend.fetch_jobs(&ticket.query).await;
        self.apply(&ticket, result)
    }

    pub async fn load_next_page<B: JobsBackend>(&mut self, backend: &B) -> Option<LoadOutcome> {
        let ticket = self.load_more()?;
        let result = backend.fetch_jobs(&ticket.query).await;
        Some(self.apply(&ticket, result))
    }

    /// Drop a job from view ahead of the hide request. Not restored if the
    /// request fails.
    pub fn remove_job(&mut self, job_id: i64) -> Option<Job> {
        let idx = self.jobs.iter().position(|j| j.id == job_id)?;
        self.cards.remove(&job_id);
        Some(self.jobs.remove(idx))
    }

    pub fn record_save(&mut self, job_id: i64, status: SaveStatus) {
        self.cards.entry(job_id).or_default().saved = Some(status);
    }

    pub fn save_status(&self, job_id: i64) -> Option<SaveStatus> {
        self.cards.get(&job_id).and_then(|c| c.saved)
    }

    pub fn toggle_fit(&mut self, job_id: i64) -> FitToggle {
        self.cards.entry(job_id).or_default().fit.toggle()
    }

    /// Record a fit result. Ignored if the card has since left the feed.
    pub fn finish_fit(&mut self, job_id: i64, result: Option<FitAnalysis>) {
        if self.job(job_id).is_none() {
            return;
        }
        self.cards.entry(job_id).or_default().fit.finish(result);
    }

    pub fn fit_panel(&self, job_id: i64) -> Option<&FitPanel> {
        self.cards.get(&job_id).map(|c| &c.fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    fn job(id: i64) -> Job {
        serde_json::from_str(&format!(r#"{{"id": {id}, "title": "Job {id}"}}"#)).unwrap()
    }

    fn page(ids: std::ops::Range<i64>, total: usize) -> JobsPage {
        JobsPage {
            total,
            jobs: ids.map(job).collect(),
        }
    }

    fn ids(feed: &FeedController) -> Vec<i64> {
        feed.jobs().iter().map(|j| j.id).collect()
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            path: "/api/jobs".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        }
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut feed = FeedController::new(50);
        let first = feed.begin_load(false);
        feed.set_search("analyst");
        let second = feed.begin_load(false);
        assert_eq!(first.generation + 1, second.generation);

        assert_eq!(feed.apply(&first, Ok(page(1..4, 3))), LoadOutcome::Stale);
        assert!(feed.jobs().is_empty());
        assert_eq!(feed.total(), 0);
        assert_eq!(feed.view(), &FeedView::Loading);

        assert_eq!(
            feed.apply(&second, Ok(page(10..12, 2))),
            LoadOutcome::Applied { shown: 2, total: 2 }
        );
        assert_eq!(ids(&feed), vec![10, 11]);
    }

    #[test]
    fn stale_response_after_newer_one_is_ignored() {
        let mut feed = FeedController::new(50);
        let first = feed.begin_load(false);
        let second = feed.begin_load(false);
        feed.apply(&second, Ok(page(10..12, 2)));
        assert_eq!(feed.apply(&first, Ok(page(1..4, 3))), LoadOutcome::Stale);
        assert_eq!(ids(&feed), vec![10, 11]);
        assert_eq!(feed.total(), 2);
    }

    #[test]
    fn empty_fresh_load_shows_empty_state() {
        let mut feed = FeedController::new(50);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..0, 0)));
        assert_eq!(feed.view(), &FeedView::Empty);
        assert!(!feed.load_more_visible());
    }

    #[test]
    fn load_more_visibility_follows_total() {
        let mut feed = FeedController::new(2);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..2, 3)));
        assert!(feed.load_more_visible());

        let more = feed.load_more().unwrap();
        assert_eq!(more.query.offset, 2);
        feed.apply(&more, Ok(page(2..3, 3)));
        assert!(!feed.load_more_visible());
        assert_eq!(ids(&feed), vec![0, 1, 2]);
    }

    #[test]
    fn exact_fit_hides_load_more() {
        let mut feed = FeedController::new(2);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..2, 2)));
        assert!(!feed.load_more_visible());
        assert_eq!(feed.load_more(), None);
    }

    #[test]
    fn load_more_is_guarded_while_in_flight() {
        let mut feed = FeedController::new(2);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..2, 10)));

        let more = feed.load_more().unwrap();
        assert_eq!(feed.load_more(), None);
        assert_eq!(feed.offset(), 2);
        feed.apply(&more, Ok(page(2..4, 10)));
        assert_eq!(feed.load_more().unwrap().query.offset, 4);
    }

    #[test]
    fn append_straddling_fresh_load_is_dropped() {
        let mut feed = FeedController::new(2);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..2, 10)));
        let more = feed.load_more().unwrap();

        feed.set_sort(SortOrder::Oldest);
        let fresh = feed.begin_load(false);
        assert_eq!(feed.apply(&more, Ok(page(2..4, 10))), LoadOutcome::Stale);
        feed.apply(&fresh, Ok(page(7..9, 10)));
        assert_eq!(ids(&feed), vec![7, 8]);
    }

    #[test]
    fn filter_changes_rewind_offset() {
        let mut feed = FeedController::new(50);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..50, 200)));
        let more = feed.load_more().unwrap();
        feed.apply(&more, Ok(page(50..100, 200)));
        assert_eq!(feed.offset(), 50);

        feed.set_search("clerk");
        assert_eq!(feed.offset(), 0);
        assert_eq!(feed.begin_load(false).query.offset, 0);

        let changes: [fn(&mut FeedController); 4] = [
            |f| f.toggle_facet(Facet::City, "Leiden"),
            |f| f.set_sort(SortOrder::BestMatch),
            |f| f.set_only_new(true),
            |f| f.set_min_salary(Some(3000)),
        ];
        for change in changes {
            let ticket = feed.begin_load(false);
            feed.apply(&ticket, Ok(page(0..50, 200)));
            feed.load_more().unwrap();
            change(&mut feed);
            assert_eq!(feed.offset(), 0);
        }
    }

    #[test]
    fn failure_is_distinct_from_empty() {
        let mut feed = FeedController::new(50);
        let ticket = feed.begin_load(false);
        let outcome = feed.apply(&ticket, Err(server_error()));
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(matches!(feed.view(), FeedView::Failed(_)));
        assert!(!feed.load_more_visible());
    }

    #[test]
    fn failed_append_keeps_list_and_rewinds() {
        let mut feed = FeedController::new(2);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..2, 10)));
        let more = feed.load_more().unwrap();
        feed.apply(&more, Err(server_error()));

        assert_eq!(feed.view(), &FeedView::Listing);
        assert_eq!(ids(&feed), vec![0, 1]);
        assert_eq!(feed.load_more().unwrap().query.offset, 2);
    }

    #[test]
    fn hide_removes_card_state() {
        let mut feed = FeedController::new(50);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..3, 3)));
        feed.record_save(1, SaveStatus::Created);

        assert_eq!(feed.remove_job(1).map(|j| j.id), Some(1));
        assert_eq!(feed.save_status(1), None);
        assert_eq!(ids(&feed), vec![0, 2]);
        assert_eq!(feed.remove_job(1), None);
    }

    #[test]
    fn fresh_load_resets_card_state() {
        let mut feed = FeedController::new(50);
        let ticket = feed.begin_load(false);
        feed.apply(&ticket, Ok(page(0..3, 3)));
        feed.record_save(2, SaveStatus::Exists);
        assert_eq!(feed.save_status(2), Some(SaveStatus::Exists));
        feed.begin_load(false);
        assert_eq!(feed.save_status(2), None);
    }

    /// Backend that answers each request from a queue and records queries.
    struct ScriptedBackend {
        pages: Mutex<Vec<JobsPage>>,
        seen: Mutex<Vec<JobQuery>>,
    }

    impl JobsBackend for ScriptedBackend {
        async fn fetch_jobs(&self, query: &JobQuery) -> Result<JobsPage, ApiError> {
            self.seen.lock().unwrap().push(query.clone());
            Ok(self.pages.lock().unwrap().remove(0))
        }
    }

    #[tokio::test]
    async fn load_and_page_through_backend() {
        let backend = ScriptedBackend {
            pages: Mutex::new(vec![page(0..2, 3), page(2..3, 3)]),
            seen: Mutex::new(Vec::new()),
        };
        let mut feed = FeedController::new(2);
        feed.toggle_facet(Facet::Source, "indeed");

        assert_eq!(
            feed.load(&backend, false).await,
            LoadOutcome::Applied { shown: 2, total: 3 }
        );
        assert_eq!(
            feed.load_next_page(&backend).await,
            Some(LoadOutcome::Applied { shown: 3, total: 3 })
        );
        assert_eq!(feed.load_next_page(&backend).await, None);

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.iter().map(|q| q.offset).collect::<Vec<_>>(), vec![0, 2]);
        assert!(seen.iter().all(|q| q.source.as_deref() == Some("indeed")));
    }

    #[tokio::test]
    async fn out_of_order_tasks_keep_latest() {
        let mut feed = FeedController::new(50);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let slow = feed.begin_load(false);
        let fast = feed.begin_load(false);
        let (slow_release, slow_gate) = tokio::sync::oneshot::channel::<()>();

        let tx_slow = tx.clone();
        tokio::spawn(async move {
            slow_gate.await.ok();
            tx_slow.send((slow, page(1..4, 3))).ok();
        });
        tx.send((fast, page(20..21, 1))).ok();

        let (ticket, result) = rx.recv().await.unwrap();
        feed.apply(&ticket, Ok(result));
        slow_release.send(()).ok();
        let (ticket, result) = rx.recv().await.unwrap();
        assert_eq!(feed.apply(&ticket, Ok(result)), LoadOutcome::Stale);

        assert_eq!(ids(&feed), vec![20]);
        assert_eq!(feed.total(), 1);
    }
}
