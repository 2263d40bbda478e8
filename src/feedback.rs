use chrono::DateTime;

use crate::i18n::Translator;
use crate::models::FeedbackRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackEntry {
    pub date: String,
    /// (label, text) for each answered question, in form order.
    pub sections: Vec<(String, String)>,
}

/// History view, newest first as returned by the server.
pub fn feedback_entries(records: &[FeedbackRecord], t: &Translator) -> Vec<FeedbackEntry> {
    records
        .iter()
        .map(|fb| {
            let answers = [
                ("feedback-improve-label", &fb.improve_text),
                ("feedback-boards-label", &fb.job_boards_text),
                ("feedback-suggestions-label", &fb.suggestions_text),
            ];
            let sections = answers
                .into_iter()
                .filter_map(|(key, text)| {
                    let text = text.as_deref()?.trim();
                    (!text.is_empty()).then(|| (t.t(key), text.to_string()))
                })
                .collect();
            FeedbackEntry {
                date: DateTime::parse_from_rfc3339(&fb.created_at)
                    .map(|dt| dt.date_naive().to_string())
                    .unwrap_or_else(|_| fb.created_at.clone()),
                sections,
            }
        })
        .collect()
}
