//! Compressed textual snapshot of the feedback list for the chat assistant

use super::charts::{compute_stats, count_by_category, urgency_series};
use crate::feedback::{FeedbackRecord, Status, Urgency};
use serde::{Deserialize, Serialize};

/// Open urgent issues listed as suggestions
const MAX_SUGGESTIONS: usize = 5;

/// Summary, patterns and suggestions embedded in the chat prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

fn percent(count: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        (count * 100 + total / 2) / total
    }
}

pub fn feedback_context(records: &[FeedbackRecord], file_name: Option<&str>) -> FeedbackContext {
    if records.is_empty() {
        return FeedbackContext::default();
    }

    let total = records.len();
    let stats = compute_stats(records);
    let by_category = count_by_category(records);

    let categories = by_category
        .iter()
        .map(|(c, n)| format!("{} {}", n, c))
        .collect::<Vec<_>>()
        .join(", ");
    let urgency = urgency_series(records)
        .iter()
        .map(|(u, n)| format!("{} {}", n, u))
        .collect::<Vec<_>>()
        .join(", ");
    let not_started = total - stats.completed - stats.ongoing;

    let source = file_name
        .map(|f| format!(" from {}", f))
        .unwrap_or_default();
    let summary = format!(
        "{} feedback items{}. Categories: {}. Urgency: {}. Status: {} completed, {} ongoing, {} not started.",
        total, source, categories, urgency, stats.completed, stats.ongoing, not_started
    );

    let mut ranked = by_category;
    // stable: ties keep first-appearance order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let patterns = format!(
        "Most reported: {}",
        ranked
            .iter()
            .take(3)
            .map(|(c, n)| format!("{} ({}%)", c, percent(*n, total)))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut open_urgent: Vec<&FeedbackRecord> = records
        .iter()
        .filter(|r| r.urgency.is_urgent() && r.status != Status::Completed)
        .collect();
    open_urgent.sort_by_key(|r| r.urgency);
    let suggestions = open_urgent
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|r| {
            let verb = if r.urgency == Urgency::Critical { "Fix" } else { "Prioritize" };
            format!("{} {} ({}): {}", verb, r.id, r.urgency, r.summary)
        })
        .collect();

    FeedbackContext {
        summary: Some(summary),
        patterns: Some(patterns),
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Category;

    #[test]
    fn test_empty_list() {
        assert_eq!(feedback_context(&[], None), FeedbackContext::default());
    }

    #[test]
    fn test_context_text() {
        let records = vec![
            FeedbackRecord::new("#FR-001", Category::Feature, "Dark mode").with_urgency(Urgency::High),
            FeedbackRecord::new("#BUG-001", Category::Bug, "Login crash").with_urgency(Urgency::Critical),
            FeedbackRecord::new("#BUG-002", Category::Bug, "Sync issue")
                .with_urgency(Urgency::High)
                .with_status(Status::Completed),
            FeedbackRecord::new("#UX-001", Category::Ux, "Confusing nav").with_status(Status::Ongoing),
        ];

        let ctx = feedback_context(&records, Some("feedback.csv"));
        assert_eq!(
            ctx.summary.as_deref(),
            Some(
                "4 feedback items from feedback.csv. Categories: 1 feature, 2 bug, 1 ux. \
                 Urgency: 1 critical, 2 high, 1 medium. Status: 1 completed, 1 ongoing, 2 not started."
            )
        );
        assert_eq!(
            ctx.patterns.as_deref(),
            Some("Most reported: bug (50%), feature (25%), ux (25%)")
        );
        assert_eq!(
            ctx.suggestions,
            vec![
                "Fix #BUG-001 (critical): Login crash".to_string(),
                "Prioritize #FR-001 (high): Dark mode".to_string(),
            ]
        );
    }
}
