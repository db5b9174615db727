use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! feedback_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every value in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name of the value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let lowered = s.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("unknown {}: {}", stringify!($name).to_lowercase(), s)),
                }
            }
        }
    };
}

feedback_enum! {
    /// Kind of reported issue or request
    Category {
        Bug => "bug",
        Feature => "feature",
        Performance => "performance",
        Ux => "ux",
        Other => "other",
    }
}

feedback_enum! {
    /// How soon the item needs attention, most urgent first
    Urgency {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

feedback_enum! {
    Impact {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

feedback_enum! {
    /// Work state of a feedback item
    Status {
        NotStarted => "not_started",
        Ongoing => "ongoing",
        Completed => "completed",
    }
}

impl Category {
    /// Capitalized label used by charts ("Bug", "Ux")
    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }
}

impl Urgency {
    /// Critical and high items surface on the urgent-issues view
    pub fn is_urgent(&self) -> bool {
        matches!(self, Urgency::Critical | Urgency::High)
    }

    pub fn label(&self) -> String {
        capitalize(self.as_str())
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One categorized user-submitted issue or request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub category: Category,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub urgency: Urgency,
    pub impact: Impact,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl FeedbackRecord {
    /// New record with medium urgency/impact, not yet started
    pub fn new(id: impl Into<String>, category: Category, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            summary: summary.into(),
            description: None,
            urgency: Urgency::Medium,
            impact: Impact::Medium,
            status: Status::NotStarted,
            date: None,
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// A record is storable only with a non-blank id and summary
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Feedback id must not be empty".to_string());
        }
        if self.summary.trim().is_empty() {
            return Err(format!("Feedback {} has an empty summary", self.id));
        }
        Ok(())
    }
}
