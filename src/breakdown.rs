use crate::i18n::Translator;
use crate::models::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

impl Tone {
    fn of(points: i64) -> Tone {
        if points < 0 { Tone::Negative } else { Tone::Positive }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownLine {
    pub label: String,
    pub points: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownView {
    pub title: String,
    pub lines: Vec<BreakdownLine>,
    pub total_label: String,
    pub total: String,
    pub total_tone: Tone,
}

/// Popup content for a job's score breakdown. `None` when the job carries no
/// breakdown, in which case the popup stays closed.
pub fn breakdown_view(job: &Job, t: &Translator) -> Option<BreakdownView> {
    let components = job.score_breakdown.as_ref().filter(|c| !c.is_empty())?;

    let lines = components
        .iter()
        .map(|c| BreakdownLine {
            label: c.label.clone(),
            points: signed(c.points),
            tone: Tone::of(c.points),
        })
        .collect();
    let total: i64 = components.iter().map(|c| c.points).sum();

    Some(BreakdownView {
        title: t.t("score-breakdown-title"),
        lines,
        total_label: t.t("score-total"),
        total: signed(total),
        total_tone: Tone::of(total),
    })
}

fn signed(points: i64) -> String {
    format!("{points:+}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoreComponent;
    use pretty_assertions::assert_eq;

    fn job_with(components: Option<Vec<(&str, i64)>>) -> Job {
        let mut job: Job = serde_json::from_str(r#"{"id": 1, "title": "Analyst"}"#).unwrap();
        job.score_breakdown = components.map(|c| {
            c.into_iter()
                .map(|(label, points)| ScoreComponent {
                    label: label.to_string(),
                    points,
                })
                .collect()
        });
        job
    }

    #[test]
    fn no_breakdown_means_no_popup() {
        let t = Translator::default();
        assert_eq!(breakdown_view(&job_with(None), &t), None);
        assert_eq!(breakdown_view(&job_with(Some(vec![])), &t), None);
    }

    #[test]
    fn lines_are_signed_and_toned() {
        let view = breakdown_view(
            &job_with(Some(vec![("Title match", 30), ("Requires Dutch", -20), ("Remote", 0)])),
            &Translator::default(),
        )
        .unwrap();

        assert_eq!(view.title, "Score Breakdown");
        assert_eq!(
            view.lines,
            vec![
                BreakdownLine { label: "Title match".into(), points: "+30".into(), tone: Tone::Positive },
                BreakdownLine { label: "Requires Dutch".into(), points: "-20".into(), tone: Tone::Negative },
                BreakdownLine { label: "Remote".into(), points: "+0".into(), tone: Tone::Positive },
            ]
        );
        assert_eq!(view.total_label, "Total");
        assert_eq!(view.total, "+10");
    }

    #[test]
    fn negative_total() {
        let view = breakdown_view(&job_with(Some(vec![("Far away", -15)])), &Translator::default())
            .unwrap();
        assert_eq!(view.total, "-15");
        assert_eq!(view.total_tone, Tone::Negative);
    }
}
