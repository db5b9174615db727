//! Aggregation and filtering engine
//!
//! Stateless selectors over a feedback slice. Every view derives its lists,
//! counts and chart series from the store snapshot through these functions.

pub mod charts;
pub mod context;
pub mod filters;

pub use charts::{
    chart_data, compute_stats, count_by_category, round_robin_trend, synthetic_daily_trend,
    urgency_series, weekly_report, ChartData, DayCount, Stats, WeeklyReport,
};
pub use context::{feedback_context, FeedbackContext};
pub use filters::{filter_by_facets, filter_by_search, urgent_issues, Facet, FacetFilter};
