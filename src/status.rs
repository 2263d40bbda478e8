use crate::error::ApiError;
use crate::i18n::Translator;
use crate::models::{ScrapeResponse, ScrapeStatus, Stats};

/// Status-bar text for a finished scrape request.
pub fn scrape_message(result: &Result<ScrapeResponse, ApiError>, t: &Translator) -> String {
    match result {
        Ok(response) if response.status == ScrapeStatus::Completed => {
            let details = response
                .results
                .iter()
                .flatten()
                .map(|(source, count)| {
                    let count = count.to_string();
                    format!("{source}: {}", t.t_with("scrape-new", &[("count", count.as_str())]))
                })
                .collect::<Vec<_>>()
                .join(", ");
            t.t_with("scrape-done", &[("details", details.as_str())])
        }
        Ok(_) => t.t("scrape-running"),
        Err(err) => {
            tracing::warn!(error = %err, "scrape failed");
            t.t("scrape-error")
        }
    }
}

/// Header counters: total jobs, and the new-jobs badge when there are any.
pub fn stats_badges(stats: &Stats, t: &Translator) -> (String, Option<String>) {
    let total = stats.total.to_string();
    let jobs = t.t_with("jobs-count", &[("n", total.as_str())]);
    let new = (stats.new > 0).then(|| {
        let n = stats.new.to_string();
        t.t_with("new-count", &[("n", n.as_str())])
    });
    (jobs, new)
}

pub fn showing_line(shown: usize, total: usize, t: &Translator) -> String {
    if shown < total {
        let (shown, total) = (shown.to_string(), total.to_string());
        t.t_with("showing-jobs", &[("shown", shown.as_str()), ("total", total.as_str())])
    } else {
        let n = shown.to_string();
        t.t_with("showing-jobs-all", &[("n", n.as_str())])
    }
}
