use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::error::ApiError;
use crate::feed::JobsBackend;
use crate::filters::JobQuery;
use crate::kanban::ApplicationsBackend;
use crate::models::{
    ApplicationList, ApplicationRecord, ApplicationUpdate, CoverLetter, CustomJobBoard,
    CustomJobBoardList, CustomKeyword, CustomKeywordList, FeedbackList, FeedbackRecord,
    FilterCounts, FitAnalysis, Job, JobsPage, NewFeedback, SaveResponse, SaveStatus,
    ScrapeResponse, Stats,
};

const JOBS_ENDPOINT: &str = "/api/jobs";
const FILTERS_ENDPOINT: &str = "/api/filters";
const STATS_ENDPOINT: &str = "/api/stats";
const SCRAPE_ENDPOINT: &str = "/api/scrape";
const FIT_ENDPOINT: &str = "/api/fit";
const MARK_SEEN_ENDPOINT: &str = "/api/jobs/mark-seen";
const APPLICATIONS_ENDPOINT: &str = "/api/applications";
const COVER_LETTER_ENDPOINT: &str = "/api/cover-letter";
const KEYWORDS_ENDPOINT: &str = "/api/custom-keywords";
const JOB_BOARDS_ENDPOINT: &str = "/api/custom-job-boards";
const FEEDBACK_ENDPOINT: &str = "/api/feedback";

/// Client for the job aggregator's JSON API. Cheap to clone; clones share
/// one connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct KeywordBody<'a> {
    keyword: &'a str,
}

#[derive(Serialize)]
struct JobBoardBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send and decode. Statuses in `accept` are decoded like successes.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
        accept: &[StatusCode],
    ) -> Result<T, ApiError> {
        let body = self.send(path, builder, accept).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    async fn send(
        &self,
        path: &str,
        builder: RequestBuilder,
        accept: &[StatusCode],
    ) -> Result<String, ApiError> {
        let http = |source| ApiError::Http {
            path: path.to_string(),
            source,
        };
        let response = builder.send().await.map_err(http)?;
        let status = response.status();
        let body = response.text().await.map_err(http)?;

        if status.is_success() || accept.contains(&status) {
            tracing::trace!(path, %status, "api response");
            Ok(body)
        } else {
            tracing::warn!(path, %status, "api error response");
            Err(ApiError::Status {
                path: path.to_string(),
                status,
                body,
            })
        }
    }

    pub async fn jobs(&self, query: &JobQuery) -> Result<JobsPage, ApiError> {
        let builder = self.request(Method::GET, JOBS_ENDPOINT).query(&query.to_pairs());
        self.fetch(JOBS_ENDPOINT, builder, &[]).await
    }

    pub async fn filters(&self) -> Result<FilterCounts, ApiError> {
        let builder = self.request(Method::GET, FILTERS_ENDPOINT);
        self.fetch(FILTERS_ENDPOINT, builder, &[]).await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        let builder = self.request(Method::GET, STATS_ENDPOINT);
        self.fetch(STATS_ENDPOINT, builder, &[]).await
    }

    /// Trigger a scrape run. A concurrent run answers 409, which decodes to
    /// the `already_running` status.
    pub async fn scrape(&self) -> Result<ScrapeResponse, ApiError> {
        let builder = self.request(Method::POST, SCRAPE_ENDPOINT);
        self.fetch(SCRAPE_ENDPOINT, builder, &[StatusCode::CONFLICT]).await
    }

    pub async fn fit(&self, job: &Job) -> Result<FitAnalysis, ApiError> {
        let params = [
            ("title", job.title.as_str()),
            ("snippet", job.snippet.as_deref().unwrap_or("")),
            ("location", job.location.as_deref().unwrap_or("")),
        ];
        let builder = self.request(Method::GET, FIT_ENDPOINT).query(&params);
        self.fetch(FIT_ENDPOINT, builder, &[]).await
    }

    pub async fn hide_job(&self, job_id: i64) -> Result<(), ApiError> {
        let path = format!("{JOBS_ENDPOINT}/{job_id}/hide");
        let builder = self.request(Method::POST, &path);
        self.send(&path, builder, &[]).await.map(|_| ())
    }

    pub async fn mark_all_seen(&self) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, MARK_SEEN_ENDPOINT);
        self.send(MARK_SEEN_ENDPOINT, builder, &[]).await.map(|_| ())
    }

    pub async fn save_application(&self, job_id: i64) -> Result<SaveStatus, ApiError> {
        let path = format!("{APPLICATIONS_ENDPOINT}/{job_id}/save");
        let builder = self.request(Method::POST, &path);
        let response: SaveResponse = self.fetch(&path, builder, &[]).await?;
        Ok(response.status)
    }

    pub async fn applications(&self) -> Result<Vec<ApplicationRecord>, ApiError> {
        let builder = self.request(Method::GET, APPLICATIONS_ENDPOINT);
        let list: ApplicationList = self.fetch(APPLICATIONS_ENDPOINT, builder, &[]).await?;
        Ok(list.applications)
    }

    pub async fn update_application(
        &self,
        job_id: i64,
        update: &ApplicationUpdate,
    ) -> Result<(), ApiError> {
        let path = format!("{APPLICATIONS_ENDPOINT}/{job_id}");
        let builder = self.request(Method::PUT, &path).json(update);
        self.send(&path, builder, &[]).await.map(|_| ())
    }

    pub async fn remove_application(&self, job_id: i64) -> Result<(), ApiError> {
        let path = format!("{APPLICATIONS_ENDPOINT}/{job_id}");
        let builder = self.request(Method::DELETE, &path);
        self.send(&path, builder, &[]).await.map(|_| ())
    }

    pub async fn cover_letter(&self, job_id: i64) -> Result<String, ApiError> {
        let builder = self
            .request(Method::GET, COVER_LETTER_ENDPOINT)
            .query(&[("job_id", job_id)]);
        let letter: CoverLetter = self.fetch(COVER_LETTER_ENDPOINT, builder, &[]).await?;
        Ok(letter.letter)
    }

    pub async fn custom_keywords(&self) -> Result<Vec<CustomKeyword>, ApiError> {
        let builder = self.request(Method::GET, KEYWORDS_ENDPOINT);
        let list: CustomKeywordList = self.fetch(KEYWORDS_ENDPOINT, builder, &[]).await?;
        Ok(list.keywords)
    }

    pub async fn add_custom_keyword(&self, keyword: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, KEYWORDS_ENDPOINT)
            .json(&KeywordBody { keyword });
        self.send(KEYWORDS_ENDPOINT, builder, &[]).await.map(|_| ())
    }

    pub async fn remove_custom_keyword(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{KEYWORDS_ENDPOINT}/{id}");
        let builder = self.request(Method::DELETE, &path);
        self.send(&path, builder, &[]).await.map(|_| ())
    }

    pub async fn custom_job_boards(&self) -> Result<Vec<CustomJobBoard>, ApiError> {
        let builder = self.request(Method::GET, JOB_BOARDS_ENDPOINT);
        let list: CustomJobBoardList = self.fetch(JOB_BOARDS_ENDPOINT, builder, &[]).await?;
        Ok(list.boards)
    }

    pub async fn add_custom_job_board(&self, name: &str, url: Option<&str>) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, JOB_BOARDS_ENDPOINT)
            .json(&JobBoardBody { name, url });
        self.send(JOB_BOARDS_ENDPOINT, builder, &[]).await.map(|_| ())
    }

    pub async fn remove_custom_job_board(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("{JOB_BOARDS_ENDPOINT}/{id}");
        let builder = self.request(Method::DELETE, &path);
        self.send(&path, builder, &[]).await.map(|_| ())
    }

    pub async fn feedback(&self) -> Result<Vec<FeedbackRecord>, ApiError> {
        let builder = self.request(Method::GET, FEEDBACK_ENDPOINT);
        let list: FeedbackList = self.fetch(FEEDBACK_ENDPOINT, builder, &[]).await?;
        Ok(list.feedback)
    }

    pub async fn send_feedback(&self, feedback: &NewFeedback) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, FEEDBACK_ENDPOINT).json(feedback);
        self.send(FEEDBACK_ENDPOINT, builder, &[]).await.map(|_| ())
    }
}

impl JobsBackend for ApiClient {
    async fn fetch_jobs(&self, query: &JobQuery) -> Result<JobsPage, ApiError> {
        self.jobs(query).await
    }
}

impl ApplicationsBackend for ApiClient {
    async fn list_applications(&self) -> Result<Vec<ApplicationRecord>, ApiError> {
        self.applications().await
    }

    async fn update_application(
        &self,
        job_id: i64,
        update: &ApplicationUpdate,
    ) -> Result<(), ApiError> {
        ApiClient::update_application(self, job_id, update).await
    }

    async fn remove_application(&self, job_id: i64) -> Result<(), ApiError> {
        ApiClient::remove_application(self, job_id).await
    }

    async fn cover_letter(&self, job_id: i64) -> Result<String, ApiError> {
        ApiClient::cover_letter(self, job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{Facet, FilterState};
    use crate::models::ScrapeStatus;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Captured request: request line plus body.
    #[derive(Debug)]
    struct Seen {
        line: String,
        body: String,
    }

    /// One-connection-per-reply HTTP stub. Replies are served in order.
    async fn stub(replies: Vec<(u16, &'static str)>) -> (ApiClient, mpsc::UnboundedReceiver<Seen>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                let header_end = loop {
                    let n = socket.read(&mut chunk).await.unwrap();
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        break pos + 4;
                    }
                    if n == 0 {
                        break buf.len();
                    }
                };
                let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
                let length = head
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                while buf.len() < header_end + length {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let request_body = String::from_utf8_lossy(&buf[header_end..]).to_string();
                tx.send(Seen {
                    line: head.lines().next().unwrap_or_default().to_string(),
                    body: request_body,
                })
                .ok();

                let response = format!(
                    "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        let config = Config {
            api_url: format!("http://{addr}"),
            timeout_secs: 5,
            ..Config::default()
        };
        (ApiClient::new(&config).unwrap(), rx)
    }

    #[tokio::test]
    async fn jobs_request_carries_only_set_filters() {
        let (api, mut seen) = stub(vec![(200, r#"{"total": 1, "jobs": [{"id": 1, "title": "Clerk"}]}"#)]).await;
        let mut filters = FilterState::default();
        filters.toggle_facet(Facet::City, "Den Haag");
        filters.set_only_new(true);

        let page = api.jobs(&filters.query(0, 50)).await.unwrap();
        assert_eq!(page.total, 1);

        let line = seen.recv().await.unwrap().line;
        assert!(line.starts_with("GET /api/jobs?limit=50&offset=0&sort=newest&only_new=true&city=Den+Haag "));
        assert!(!line.contains("search="));
    }

    #[tokio::test]
    async fn scrape_conflict_is_already_running() {
        let (api, _seen) = stub(vec![(409, r#"{"status": "already_running"}"#)]).await;
        let response = api.scrape().await.unwrap();
        assert_eq!(response.status, ScrapeStatus::AlreadyRunning);
        assert_eq!(response.results, None);
    }

    #[tokio::test]
    async fn server_errors_surface_status() {
        let (api, _seen) = stub(vec![(500, r#"{"detail": "boom"}"#)]).await;
        let err = api.stats().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.summary(), "server error (500 Internal Server Error)");
    }

    #[tokio::test]
    async fn undecodable_body_is_decode_error() {
        let (api, _seen) = stub(vec![(200, "<html>oops</html>")]).await;
        assert!(matches!(api.filters().await, Err(ApiError::Decode { .. })));
    }

    #[tokio::test]
    async fn save_then_update_application() {
        let (api, mut seen) = stub(vec![
            (200, r#"{"status": "exists"}"#),
            (200, r#"{"status": "ok"}"#),
        ])
        .await;

        assert_eq!(api.save_application(12).await.unwrap(), SaveStatus::Exists);
        assert_eq!(seen.recv().await.unwrap().line, "POST /api/applications/12/save HTTP/1.1");

        let update = ApplicationUpdate {
            notes: Some("phone screen".into()),
            ..Default::default()
        };
        ApiClient::update_application(&api, 12, &update).await.unwrap();
        let request = seen.recv().await.unwrap();
        assert_eq!(request.line, "PUT /api/applications/12 HTTP/1.1");
        assert_eq!(request.body, r#"{"notes":"phone screen"}"#);
    }

    #[tokio::test]
    async fn cover_letter_query() {
        let (api, mut seen) = stub(vec![(200, r#"{"letter": "Dear team"}"#)]).await;
        assert_eq!(ApiClient::cover_letter(&api, 5).await.unwrap(), "Dear team");
        assert_eq!(
            seen.recv().await.unwrap().line,
            "GET /api/cover-letter?job_id=5 HTTP/1.1"
        );
    }
}
