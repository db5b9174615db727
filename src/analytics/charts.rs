//! Counts and chart series derived from a feedback list

use super::filters::urgent_issues;
use crate::feedback::{Category, FeedbackRecord, Status, Urgency};
use serde::Serialize;

/// Day labels of the synthetic trend, Monday first
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Share of the total assigned to each weekday
pub const TREND_WEIGHTS: [f64; 7] = [0.15, 0.25, 0.18, 0.20, 0.12, 0.05, 0.05];

/// Bucket that absorbs the rounding remainder (Thursday)
const REMAINDER_BUCKET: usize = 3;

/// Display order of the urgency bar chart
pub const URGENCY_ORDER: [Urgency; 4] = [Urgency::Critical, Urgency::High, Urgency::Medium, Urgency::Low];

const FALLBACK_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub critical: usize,
    pub completed: usize,
    pub ongoing: usize,
}

/// Everything the weekly report page shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub total: usize,
    /// Critical or high urgency
    pub urgent: usize,
    pub completed: usize,
    /// Category pie in the report palette
    pub category_data: Vec<CategorySlice>,
    pub daily_trend_data: Vec<DayCount>,
    /// "Top priority issues": critical and high records in list order
    pub urgent_issues: Vec<FeedbackRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub day: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub category: Category,
    pub value: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrgencyBar {
    pub name: String,
    pub urgency: Urgency,
    pub count: usize,
}

/// Everything the analytics page plots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub category_data: Vec<CategorySlice>,
    pub urgency_data: Vec<UrgencyBar>,
    pub daily_trend_data: Vec<DayCount>,
}

pub fn category_color(category: Category) -> &'static str {
    match category {
        Category::Feature => "#4ADE80",
        Category::Bug => "#EF4444",
        Category::Performance => "#F59E0B",
        Category::Other => "#9CA3AF",
        Category::Ux => FALLBACK_COLOR,
    }
}

/// Count per category in first-appearance order; absent categories are omitted
pub fn count_by_category(records: &[FeedbackRecord]) -> Vec<(Category, usize)> {
    let mut counts: Vec<(Category, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(c, _)| *c == record.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.category, 1)),
        }
    }
    counts
}

/// Urgency counts in [`URGENCY_ORDER`], zero-count levels dropped
pub fn urgency_series(records: &[FeedbackRecord]) -> Vec<(Urgency, usize)> {
    URGENCY_ORDER
        .iter()
        .map(|level| (*level, records.iter().filter(|r| r.urgency == *level).count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

pub fn compute_stats(records: &[FeedbackRecord]) -> Stats {
    Stats {
        total: records.len(),
        critical: records.iter().filter(|r| r.urgency == Urgency::Critical).count(),
        completed: records.iter().filter(|r| r.status == Status::Completed).count(),
        ongoing: records.iter().filter(|r| r.status == Status::Ongoing).count(),
    }
}

/// Palette of the weekly report pie, distinct from the analytics page
pub fn report_color(category: Category) -> &'static str {
    match category {
        Category::Feature => "#FF5733",
        Category::Bug => "#C70039",
        Category::Performance => "#900C3F",
        Category::Ux => "#581845",
        Category::Other => "#FFC300",
    }
}

/// Deal `total` records over the week in list order (record `i` lands on day `i % 7`)
///
/// Empty for an empty list, unlike [`synthetic_daily_trend`].
pub fn round_robin_trend(total: usize) -> Vec<DayCount> {
    if total == 0 {
        return Vec::new();
    }
    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, &day)| DayCount {
            day,
            count: total / 7 + usize::from(i < total % 7),
        })
        .collect()
}

pub fn weekly_report(records: &[FeedbackRecord]) -> WeeklyReport {
    let category_data = count_by_category(records)
        .into_iter()
        .map(|(category, value)| CategorySlice {
            name: category.label(),
            category,
            value,
            color: report_color(category),
        })
        .collect();
    let urgent = urgent_issues(records);

    WeeklyReport {
        total: records.len(),
        urgent: urgent.len(),
        completed: records.iter().filter(|r| r.status == Status::Completed).count(),
        category_data,
        daily_trend_data: round_robin_trend(records.len()),
        urgent_issues: urgent,
    }
}

/// Spread `total` over the week with [`TREND_WEIGHTS`]
///
/// Not a measurement: records carry no reliable date. Each bucket is
/// `floor(total * weight)`, and whatever the floors leave over goes to
/// Thursday, so the buckets always sum to `total`.
pub fn synthetic_daily_trend(total: usize) -> [DayCount; 7] {
    let mut buckets = [DayCount { day: "", count: 0 }; 7];
    for (i, bucket) in buckets.iter_mut().enumerate() {
        *bucket = DayCount {
            day: WEEKDAYS[i],
            count: (total as f64 * TREND_WEIGHTS[i]).floor() as usize,
        };
    }

    let assigned: usize = buckets.iter().map(|b| b.count).sum();
    if total > assigned {
        buckets[REMAINDER_BUCKET].count += total - assigned;
    }
    buckets
}

/// Category pie, urgency bars and daily trend for the analytics page
pub fn chart_data(records: &[FeedbackRecord]) -> ChartData {
    if records.is_empty() {
        return ChartData::default();
    }

    let category_data = count_by_category(records)
        .into_iter()
        .map(|(category, value)| CategorySlice {
            name: category.label(),
            category,
            value,
            color: category_color(category),
        })
        .collect();

    let urgency_data = urgency_series(records)
        .into_iter()
        .map(|(urgency, count)| UrgencyBar {
            name: urgency.label(),
            urgency,
            count,
        })
        .collect();

    ChartData {
        category_data,
        urgency_data,
        daily_trend_data: synthetic_daily_trend(records.len()).to_vec(),
    }
}
