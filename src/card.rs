//! Render-ready view of a single job, independent of any terminal or
//! widget code.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::i18n::Translator;
use crate::models::{AgeTier, FitAnalysis, Job, SaveStatus};

const MAPS_DIRECTIONS: &str = "https://www.google.com/maps/dir";

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Category that carries no information and gets no badge.
pub const CATCH_ALL_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn classify(score: i64) -> ScoreTier {
        if score >= 70 {
            ScoreTier::High
        } else if score >= 40 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCardView {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub date_posted: Option<String>,
    pub salary: String,
    pub salary_listed: bool,
    pub score: i64,
    pub tier: ScoreTier,
    pub commute_url: Option<String>,
    pub snippet: Option<String>,
    pub source: String,
    pub posted_on: String,
    pub category_badge: Option<String>,
    pub posting_type: Option<String>,
    pub age: Option<(String, AgeTier)>,
    pub is_new: bool,
    pub has_breakdown: bool,
}

impl JobCardView {
    pub fn build(job: &Job, t: &Translator, home_encoded: &str) -> Self {
        let (salary, salary_listed) = match format_salary(job.salary_min, job.salary_max) {
            Some(text) => (text, true),
            None => (t.t("salary-not-listed"), false),
        };

        let age = job
            .posting_age_text
            .as_ref()
            .filter(|text| !text.is_empty())
            .map(|text| (text.clone(), job.posting_age_color.unwrap_or(AgeTier::Grey)));

        JobCardView {
            id: job.id,
            title: job.title.clone(),
            url: job.url.clone(),
            company: non_empty(&job.company),
            location: non_empty(&job.location),
            date_posted: non_empty(&job.date_posted),
            salary,
            salary_listed,
            score: job.score,
            tier: ScoreTier::classify(job.score),
            commute_url: job
                .location
                .as_deref()
                .and_then(|loc| commute_url(home_encoded, loc)),
            snippet: non_empty(&job.snippet),
            source: job.source.clone(),
            posted_on: t.t_with("posted-on", &[("source", job.source.as_str())]),
            category_badge: category_badge(job.category.as_deref()).map(str::to_string),
            posting_type: job
                .posting_type
                .map(|kind| t.t(&format!("chip-{}", kind.as_str()))),
            age,
            is_new: job.is_new,
            has_breakdown: job.score_breakdown.as_ref().is_some_and(|b| !b.is_empty()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// `€1,000/month` for a fixed salary, `€1,000 - €2,000/month` for a range,
/// `None` unless both ends are known.
pub fn format_salary(min: Option<i64>, max: Option<i64>) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) if min == max => Some(format!("€{}/month", group_thousands(min))),
        (Some(min), Some(max)) => Some(format!(
            "€{} - €{}/month",
            group_thousands(min),
            group_thousands(max)
        )),
        _ => None,
    }
}

pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn category_badge(category: Option<&str>) -> Option<&str> {
    category.filter(|c| !c.is_empty() && *c != CATCH_ALL_CATEGORY)
}

/// Home address in the form the directions URL expects: spaces become `+`.
pub fn encode_home(address: &str) -> String {
    address.trim().replace(' ', "+")
}

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Public-transport directions from home to `location`.
pub fn commute_url(home_encoded: &str, location: &str) -> Option<String> {
    if location.trim().is_empty() {
        return None;
    }
    Some(format!(
        "{MAPS_DIRECTIONS}/{home_encoded}/{}?travelmode=transit",
        encode_uri_component(location)
    ))
}

/// Label for the save button after a save round trip.
pub fn save_label(t: &Translator, status: Option<SaveStatus>) -> String {
    match status {
        None => t.t("btn-save"),
        Some(SaveStatus::Created) => t.t("btn-saved"),
        Some(SaveStatus::Exists) => t.t("btn-already-saved"),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FitContent {
    #[default]
    NotLoaded,
    Loading,
    Loaded(FitAnalysis),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitToggle {
    /// Panel opened and a fetch must be started.
    Fetch,
    Opened,
    Closed,
}

/// Expandable fit-analysis panel. A successful load is kept for the life of
/// the card; a failed load is retried on the next open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitPanel {
    pub open: bool,
    pub content: FitContent,
}

impl FitPanel {
    pub fn toggle(&mut self) -> FitToggle {
        if self.open {
            self.open = false;
            return FitToggle::Closed;
        }
        self.open = true;
        match self.content {
            FitContent::Loaded(_) | FitContent::Loading => FitToggle::Opened,
            FitContent::NotLoaded | FitContent::Failed => {
                self.content = FitContent::Loading;
                FitToggle::Fetch
            }
        }
    }

    pub fn finish(&mut self, result: Option<FitAnalysis>) {
        self.content = match result {
            Some(fit) => FitContent::Loaded(fit),
            None => FitContent::Failed,
        };
    }

    /// Lines to show while open.
    pub fn lines(&self, t: &Translator) -> Vec<String> {
        if !self.open {
            return Vec::new();
        }
        match &self.content {
            FitContent::NotLoaded | FitContent::Loading => vec![t.t("analysing-fit")],
            FitContent::Failed => vec![t.t("fit-error")],
            FitContent::Loaded(fit) => std::iter::once(fit.tagline.clone())
                .chain(fit.bullets.iter().map(|b| format!("• {b}")))
                .collect(),
        }
    }
}
