//! Canonical timeline event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient::lenient;

/// One normalized entry of an issue's timeline.
///
/// Serialization is sparse: optional fields that are `None` are left out of
/// the JSON object entirely, never written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Free-form event tag such as `"closed"`, `"labeled"` or `"commented"`.
    #[serde(default)]
    pub event_type: String,

    /// Login of the acting user. Automated events may have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// When the event happened.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient"
    )]
    pub event_date: Option<DateTime<Utc>>,

    /// Label name, for labeling events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Comment text with carriage returns stripped, for comment events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TimelineEvent {
    /// Create an event carrying only its type.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            author: None,
            event_date: None,
            label: None,
            comment: None,
        }
    }

    /// Set the acting user.
    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    /// Set the event time.
    pub fn with_event_date(mut self, event_date: Option<DateTime<Utc>>) -> Self {
        self.event_date = event_date;
        self
    }

    /// Set the label name.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Set the comment text.
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// `true` for comment events.
    pub fn is_comment(&self) -> bool {
        self.event_type == "commented"
    }
}
