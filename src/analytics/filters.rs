//! Search and facet filters for the feedback table

use crate::feedback::{Category, FeedbackRecord, Status, Urgency};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sentinel string meaning "no constraint"
pub const ALL: &str = "all";

/// Constraint on one categorical field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet<T> {
    All,
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Facet::All
    }
}

impl<T: PartialEq> Facet<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }
}

impl<T> FromStr for Facet<T>
where
    T: FromStr<Err = String>,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case(ALL) {
            Ok(Facet::All)
        } else {
            s.parse().map(Facet::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => f.write_str(ALL),
            Facet::Only(v) => v.fmt(f),
        }
    }
}

impl<T: Serialize> Serialize for Facet<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Facet::All => serializer.serialize_str(ALL),
            Facet::Only(v) => v.serialize(serializer),
        }
    }
}

/// Category, urgency and status constraints combined with AND
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FacetFilter {
    pub category: Facet<Category>,
    pub urgency: Facet<Urgency>,
    pub status: Facet<Status>,
}

impl FacetFilter {
    /// Parse the three facet strings as sent by the dashboard selects
    pub fn parse(category: Option<&str>, urgency: Option<&str>, status: Option<&str>) -> Result<Self, String> {
        Ok(Self {
            category: category.unwrap_or(ALL).parse()?,
            urgency: urgency.unwrap_or(ALL).parse()?,
            status: status.unwrap_or(ALL).parse()?,
        })
    }

    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        self.category.matches(&record.category)
            && self.urgency.matches(&record.urgency)
            && self.status.matches(&record.status)
    }

    /// True when at least one facet constrains the list
    pub fn is_active(&self) -> bool {
        !(self.category.is_all() && self.urgency.is_all() && self.status.is_all())
    }
}

/// Case-insensitive substring match on id, summary, category and urgency
///
/// A blank query returns the input unchanged.
pub fn filter_by_search(records: &[FeedbackRecord], query: &str) -> Vec<FeedbackRecord> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|r| {
            r.id.to_lowercase().contains(&query)
                || r.summary.to_lowercase().contains(&query)
                || r.category.as_str().contains(&query)
                || r.urgency.as_str().contains(&query)
        })
        .cloned()
        .collect()
}

pub fn filter_by_facets(records: &[FeedbackRecord], filter: &FacetFilter) -> Vec<FeedbackRecord> {
    records.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// Records with critical or high urgency
pub fn urgent_issues(records: &[FeedbackRecord]) -> Vec<FeedbackRecord> {
    records
        .iter()
        .filter(|r| r.urgency.is_urgent())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<FeedbackRecord> {
        vec![
            FeedbackRecord::new("#BUG-001", Category::Bug, "Login page crash")
                .with_urgency(Urgency::Critical),
            FeedbackRecord::new("#FR-001", Category::Feature, "Dark mode support")
                .with_urgency(Urgency::High)
                .with_status(Status::Ongoing),
            FeedbackRecord::new("#PERF-001", Category::Performance, "Slow page load")
                .with_urgency(Urgency::High),
            FeedbackRecord::new("#UX-001", Category::Ux, "Debug menu is confusing")
                .with_urgency(Urgency::Low)
                .with_status(Status::Completed),
        ]
    }

    fn ids(records: &[FeedbackRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_blank_search_is_identity() {
        let records = sample();
        assert_eq!(filter_by_search(&records, ""), records);
        assert_eq!(filter_by_search(&records, "   \t"), records);
        assert!(filter_by_search(&[], "bug").is_empty());
    }

    #[test]
    fn test_search_fields() {
        let records = sample();
        // category, id and summary ("Debug") all match
        assert_eq!(ids(&filter_by_search(&records, "BUG")), vec!["#BUG-001", "#UX-001"]);
        assert_eq!(ids(&filter_by_search(&records, "dark")), vec!["#FR-001"]);
        assert_eq!(ids(&filter_by_search(&records, "critical")), vec!["#BUG-001"]);
        assert_eq!(ids(&filter_by_search(&records, "perf-")), vec!["#PERF-001"]);
        // status is not searched
        assert!(filter_by_search(&records, "ongoing").is_empty());
    }

    #[test]
    fn test_facets_all_is_identity() {
        let records = sample();
        let filter = FacetFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter_by_facets(&records, &filter), records);
    }

    #[test]
    fn test_facets_combine_with_and() {
        let records = sample();
        let filter = FacetFilter::parse(Some("all"), Some("high"), Some("not_started")).unwrap();
        assert!(filter.is_active());

        let result = filter_by_facets(&records, &filter);
        assert_eq!(ids(&result), vec!["#PERF-001"]);
        for r in &result {
            assert!(filter.matches(r));
            assert!(records.contains(r));
        }
    }

    #[test]
    fn test_facet_parse_errors() {
        assert!(FacetFilter::parse(Some("pricing"), None, None).is_err());
        assert_eq!("ALL".parse::<Facet<Status>>().unwrap(), Facet::All);
        assert_eq!("ux".parse::<Facet<Category>>().unwrap(), Facet::Only(Category::Ux));
    }

    #[test]
    fn test_every_facet_combination() {
        let records = sample();
        let with_all = |values: Vec<&'static str>| {
            std::iter::once(ALL).chain(values).collect::<Vec<_>>()
        };
        let categories = with_all(Category::ALL.iter().map(|c| c.as_str()).collect());
        let urgencies = with_all(Urgency::ALL.iter().map(|u| u.as_str()).collect());
        let statuses = with_all(Status::ALL.iter().map(|s| s.as_str()).collect());

        for category in &categories {
            for urgency in &urgencies {
                for status in &statuses {
                    let filter =
                        FacetFilter::parse(Some(*category), Some(*urgency), Some(*status))
                            .unwrap();
                    let result = filter_by_facets(&records, &filter);

                    for r in &result {
                        assert!(records.contains(r));
                        assert!(*category == ALL || r.category.as_str() == *category);
                        assert!(*urgency == ALL || r.urgency.as_str() == *urgency);
                        assert!(*status == ALL || r.status.as_str() == *status);
                    }
                    let expected = records.iter().filter(|r| filter.matches(r)).count();
                    assert_eq!(result.len(), expected, "{}/{}/{}", category, urgency, status);
                }
            }
        }
    }

    #[test]
    fn test_urgent_issues() {
        let records = sample();
        assert_eq!(
            ids(&urgent_issues(&records)),
            vec!["#BUG-001", "#FR-001", "#PERF-001"]
        );
    }
}
