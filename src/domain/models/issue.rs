//! Canonical issue record as persisted and loaded for analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient::{lenient, nullable};
use super::timeline::TimelineEvent;

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Still open.
    Open,
    /// Closed, whatever the reason.
    Closed,
}

impl IssueState {
    /// Wire name of the state.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One issue together with its normalized timeline.
///
/// Every key is always written, with `null` for absent scalars, so the
/// persisted document has a fixed shape. Loading is tolerant: missing keys
/// default, and unknown states or unparsable timestamps become `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// HTML URL of the issue.
    #[serde(default)]
    pub url: Option<String>,

    /// Login of the user who opened the issue.
    #[serde(default)]
    pub creator: Option<String>,

    /// Label names. Order carries no meaning.
    #[serde(default, deserialize_with = "nullable")]
    pub labels: Vec<String>,

    /// `None` when the API sent an unknown state.
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<IssueState>,

    /// Assignee logins.
    #[serde(default, deserialize_with = "nullable")]
    pub assignees: Vec<String>,

    /// Issue title.
    #[serde(default)]
    pub title: Option<String>,

    /// Issue body with carriage returns removed.
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,

    /// Repository-scoped issue number, positive and unique within a fetch.
    pub number: u64,

    /// When the issue was opened.
    #[serde(default, deserialize_with = "lenient")]
    pub created_date: Option<DateTime<Utc>>,

    /// When the issue last changed.
    #[serde(default, deserialize_with = "lenient")]
    pub updated_date: Option<DateTime<Utc>>,

    /// When the issue was closed, if it is.
    #[serde(default, deserialize_with = "lenient")]
    pub closed_date: Option<DateTime<Utc>>,

    /// Number of comments reported by the API.
    #[serde(default, deserialize_with = "nullable")]
    pub comments: u64,

    /// Timeline endpoint the events were fetched from.
    #[serde(default, deserialize_with = "nullable")]
    pub timeline_url: String,

    /// Timeline events in the order the API returned them.
    #[serde(default, deserialize_with = "nullable")]
    pub events: Vec<TimelineEvent>,
}

impl IssueRecord {
    /// Create a record with only its number set.
    pub fn new(number: u64) -> Self {
        Self {
            url: None,
            creator: None,
            labels: Vec::new(),
            state: None,
            assignees: Vec::new(),
            title: None,
            text: String::new(),
            number,
            created_date: None,
            updated_date: None,
            closed_date: None,
            comments: 0,
            timeline_url: String::new(),
            events: Vec::new(),
        }
    }

    /// Login of the author.
    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref()
    }

    /// Body text, empty when the issue had none.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Creation time.
    pub const fn created_date(&self) -> Option<DateTime<Utc>> {
        self.created_date
    }

    /// Last update time.
    pub const fn updated_date(&self) -> Option<DateTime<Utc>> {
        self.updated_date
    }

    /// Label names as borrowed strings.
    pub fn label_names(&self) -> Vec<&str> {
        self.labels.iter().map(String::as_str).collect()
    }

    /// `true` for open issues.
    pub fn is_open(&self) -> bool {
        self.state == Some(IssueState::Open)
    }

    /// `true` for closed issues.
    pub fn is_closed(&self) -> bool {
        self.state == Some(IssueState::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_are_written() {
        let record = IssueRecord::new(7);
        let json = serde_json::to_value(&record).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "url",
            "creator",
            "labels",
            "state",
            "assignees",
            "title",
            "text",
            "number",
            "created_date",
            "updated_date",
            "timeline_url",
            "events",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj["number"], 7);
    }

    #[test]
    fn test_minimal_document_defaults() {
        let record: IssueRecord = serde_json::from_str(r#"{"number": 3}"#).unwrap();
        assert_eq!(record.number, 3);
        assert!(record.creator().is_none());
        assert_eq!(record.text(), "");
        assert!(record.labels.is_empty());
        assert!(record.events.is_empty());
        assert!(!record.is_open());
        assert!(!record.is_closed());
    }

    #[test]
    fn test_unknown_state_and_bad_dates_load_as_none() {
        let record: IssueRecord = serde_json::from_str(
            r#"{"number": 4, "state": "merged", "created_date": "soon", "updated_date": null, "labels": null}"#,
        )
        .unwrap();
        assert!(record.state.is_none());
        assert!(record.created_date().is_none());
        assert!(record.updated_date().is_none());
        assert!(record.labels.is_empty());
    }

    #[test]
    fn test_accessors() {
        let mut record = IssueRecord::new(9);
        record.creator = Some("octocat".to_string());
        record.labels = vec!["bug".to_string(), "area/cli".to_string()];
        record.state = Some(IssueState::Closed);
        record.text = "body".to_string();

        assert_eq!(record.creator(), Some("octocat"));
        assert_eq!(record.label_names(), vec!["bug", "area/cli"]);
        assert_eq!(record.text(), "body");
        assert!(record.is_closed());
        assert_eq!(IssueState::Closed.to_string(), "closed");
    }
}
