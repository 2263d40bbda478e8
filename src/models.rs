use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String, // board identifier: "indeed", "linkedin", ...
    pub snippet: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub category: Option<String>,
    pub posting_type: Option<PostingType>,
    pub date_posted: Option<String>,
    pub posting_age_text: Option<String>,
    pub posting_age_color: Option<AgeTier>,
    #[serde(default)]
    pub score: i64,
    pub score_breakdown: Option<Vec<ScoreComponent>>,
    // sqlite hands this back as 0/1
    #[serde(default, deserialize_with = "flag")]
    pub is_new: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingType {
    Direct,
    Recruiter,
    JobBoard,
}

impl PostingType {
    pub fn as_str(self) -> &'static str {
        match self {
            PostingType::Direct => "direct",
            PostingType::Recruiter => "recruiter",
            PostingType::JobBoard => "job_board",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeTier {
    Green,
    Orange,
    Grey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub label: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobsPage {
    pub total: usize,
    pub jobs: Vec<Job>,
}

/// Facet counts from `/api/filters`. Entry order is the server's render order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterCounts {
    #[serde(default)]
    pub categories: IndexMap<String, u64>,
    #[serde(default)]
    pub cities: IndexMap<String, u64>,
    #[serde(default)]
    pub sources: IndexMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Stats {
    pub total: u64,
    pub new: u64,
    pub last_scrape: Option<String>,
    #[serde(default)]
    pub scraping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    Completed,
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrapeResponse {
    pub status: ScrapeStatus,
    pub results: Option<IndexMap<String, u64>>,
    pub scraped_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FitAnalysis {
    pub tagline: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Created,
    Exists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    pub status: SaveStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Interested,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Board column order.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Interested,
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Interested => "interested",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn column_key(self) -> &'static str {
        match self {
            ApplicationStatus::Interested => "col-interested",
            ApplicationStatus::Applied => "col-applied",
            ApplicationStatus::Interview => "col-interview",
            ApplicationStatus::Offer => "col-offer",
            ApplicationStatus::Rejected => "col-rejected",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                format!("unknown status '{s}' (expected interested, applied, interview, offer or rejected)")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub job_id: i64,
    pub status: ApplicationStatus,
    pub date_saved: String,
    pub date_applied: Option<NaiveDate>,
    pub notes: Option<String>,
    pub reminder_date: Option<NaiveDate>,
    // joined from the job row
    #[serde(default)]
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationList {
    pub applications: Vec<ApplicationRecord>,
}

/// Partial update for `PUT /api/applications/{id}`. Absent fields are left
/// untouched by the server. Dates are three-state: `None` omits the field,
/// `Some(None)` sends `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_applied: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetter {
    pub letter: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomKeyword {
    pub id: i64,
    pub keyword: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomKeywordList {
    #[serde(default)]
    pub keywords: Vec<CustomKeyword>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomJobBoard {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomJobBoardList {
    #[serde(default)]
    pub boards: Vec<CustomJobBoard>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedbackRecord {
    pub id: Option<i64>,
    pub created_at: String,
    pub improve_text: Option<String>,
    pub job_boards_text: Option<String>,
    pub suggestions_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackList {
    #[serde(default)]
    pub feedback: Vec<FeedbackRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewFeedback {
    pub improve: String,
    pub job_boards: String,
    pub suggestions: String,
}

impl NewFeedback {
    pub fn is_empty(&self) -> bool {
        self.improve.trim().is_empty()
            && self.job_boards.trim().is_empty()
            && self.suggestions.trim().is_empty()
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn job_decodes_server_row() {
        let raw = r#"{
            "id": 7, "title": "Data Analyst", "company": "Acme", "location": "Amsterdam",
            "url": "https://example.com/7", "source": "indeed", "snippet": null,
            "salary_min": 3000, "salary_max": 4000, "category": "Data",
            "posting_type": "job_board", "posting_age_text": "2 days ago",
            "posting_age_color": "green", "score": 72,
            "score_breakdown": [{"label": "Title match", "points": 30}, {"label": "Requires Dutch", "points": -20}],
            "is_new": 1
        }"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert!(job.is_new);
        assert_eq!(job.posting_type, Some(PostingType::JobBoard));
        assert_eq!(job.posting_age_color, Some(AgeTier::Green));
        assert_eq!(job.score_breakdown.unwrap()[1].points, -20);
    }

    #[test]
    fn job_tolerates_missing_optional_fields() {
        let job: Job = serde_json::from_str(r#"{"id": 1, "title": "Clerk"}"#).unwrap();
        assert!(!job.is_new);
        assert_eq!(job.score, 0);
        assert_eq!(job.company, None);
        assert_eq!(job.score_breakdown, None);
    }

    #[test]
    fn filter_counts_keep_server_order() {
        let raw = r#"{"categories": {}, "cities": {"Amsterdam": 4, "Haarlem": 2, "Leiden": 1}, "sources": {}}"#;
        let counts: FilterCounts = serde_json::from_str(raw).unwrap();
        let order: Vec<&str> = counts.cities.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["Amsterdam", "Haarlem", "Leiden"]);
    }

    #[test]
    fn update_omits_unset_fields() {
        let update = ApplicationUpdate {
            status: Some(ApplicationStatus::Interview),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"status":"interview"}"#);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Offer".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Offer));
        assert!("hired".parse::<ApplicationStatus>().is_err());
    }
}
