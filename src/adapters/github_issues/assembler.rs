//! Turns raw listing payloads into canonical issue records.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::errors::HarvestResult;
use crate::domain::models::{IssueRecord, TimelineEvent};

use super::client::GitHubClient;
use super::models::GitHubIssue;
use super::normalizer::TimelineNormalizer;

/// Outcome of assembling one listing item.
#[derive(Debug, Clone, PartialEq)]
pub enum Assembled {
    /// A real issue with its timeline.
    Issue(IssueRecord),
    /// The item is a pull request; no timeline was fetched.
    PullRequest,
    /// The item could not be decoded or has no usable number.
    Malformed,
}

/// `true` when the payload carries a `pull_request` key, whatever its value.
pub fn is_pull_request(raw: &Value) -> bool {
    raw.as_object()
        .is_some_and(|obj| obj.contains_key("pull_request"))
}

/// Builds [`IssueRecord`]s, fetching each issue's timeline.
#[derive(Debug, Clone)]
pub struct IssueAssembler {
    client: GitHubClient,
    normalizer: TimelineNormalizer,
}

impl IssueAssembler {
    /// Create an assembler fetching timelines through `client`.
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            normalizer: TimelineNormalizer::new(),
        }
    }

    /// Assemble one raw listing item.
    ///
    /// Only network and decode failures while fetching the timeline are
    /// errors; pull requests and malformed items are reported as variants.
    pub async fn assemble(&self, raw: Value) -> HarvestResult<Assembled> {
        if is_pull_request(&raw) {
            debug!(number = ?raw.get("number"), "Skipping pull request");
            return Ok(Assembled::PullRequest);
        }

        let issue: GitHubIssue = match serde_json::from_value(raw) {
            Ok(issue) => issue,
            Err(e) => {
                warn!(error = %e, "Skipping undecodable issue");
                return Ok(Assembled::Malformed);
            }
        };

        let Some(number) = issue.number.filter(|n| *n > 0) else {
            warn!(title = ?issue.title, "Skipping issue without a number");
            return Ok(Assembled::Malformed);
        };

        let timeline_url = self.client.timeline_url(number);
        let events = self.fetch_timeline(&timeline_url).await?;

        Ok(Assembled::Issue(build_record(
            number,
            issue,
            timeline_url,
            events,
        )))
    }

    /// Fetch and normalize every timeline page of one issue.
    pub async fn fetch_timeline(&self, timeline_url: &str) -> HarvestResult<Vec<TimelineEvent>> {
        let query = vec![("per_page".to_string(), self.client.per_page().to_string())];
        let raw = self.client.paginate(timeline_url, query).collect_all().await?;
        let total = raw.len();
        let events = self.normalizer.normalize_all(raw);
        debug!(
            url = timeline_url,
            raw = total,
            kept = events.len(),
            "Normalized timeline"
        );
        Ok(events)
    }
}

/// Map a decoded issue and its normalized timeline onto the canonical record.
pub fn build_record(
    number: u64,
    issue: GitHubIssue,
    timeline_url: String,
    events: Vec<TimelineEvent>,
) -> IssueRecord {
    IssueRecord {
        creator: issue.creator().map(str::to_string),
        labels: issue.label_names(),
        assignees: issue.assignee_logins(),
        url: issue.html_url,
        state: issue.state,
        title: issue.title,
        text: issue.body.unwrap_or_default().replace('\r', ""),
        number,
        created_date: issue.created_at,
        updated_date: issue.updated_at,
        closed_date: issue.closed_at,
        comments: issue.comments,
        timeline_url,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IssueState;
    use serde_json::json;

    #[test]
    fn test_pull_request_detection_is_key_presence() {
        assert!(is_pull_request(&json!({"number": 2, "pull_request": {}})));
        assert!(is_pull_request(&json!({"number": 2, "pull_request": null})));
        assert!(!is_pull_request(&json!({"number": 1})));
        assert!(!is_pull_request(&json!([1, 2])));
    }

    #[test]
    fn test_build_record_maps_fields() {
        let issue: GitHubIssue = serde_json::from_value(json!({
            "number": 12,
            "html_url": "https://github.com/o/r/issues/12",
            "title": "Crash on install",
            "body": "line one\r\nline two",
            "state": "closed",
            "user": {"login": "reporter"},
            "labels": [{"name": "bug"}, {"name": "installer"}],
            "assignees": [{"login": "fixer"}],
            "comments": 4,
            "created_at": "2023-06-01T10:00:00Z",
            "updated_at": "2023-06-03T10:00:00Z",
            "closed_at": "2023-06-03T10:00:00Z"
        }))
        .unwrap();

        let record = build_record(
            12,
            issue,
            "https://api.github.com/repos/o/r/issues/12/timeline".to_string(),
            vec![TimelineEvent::new("closed")],
        );

        assert_eq!(record.number, 12);
        assert_eq!(record.url.as_deref(), Some("https://github.com/o/r/issues/12"));
        assert_eq!(record.creator(), Some("reporter"));
        assert_eq!(record.text(), "line one\nline two");
        assert_eq!(record.state, Some(IssueState::Closed));
        assert_eq!(record.label_names(), vec!["bug", "installer"]);
        assert_eq!(record.assignees, vec!["fixer"]);
        assert_eq!(record.comments, 4);
        assert!(record.closed_date.is_some());
        assert_eq!(record.events.len(), 1);
        assert!(record.timeline_url.ends_with("/issues/12/timeline"));
    }

    #[test]
    fn test_build_record_with_missing_body() {
        let issue: GitHubIssue = serde_json::from_value(json!({"number": 1})).unwrap();
        let record = build_record(1, issue, String::new(), Vec::new());
        assert_eq!(record.text(), "");
        assert!(record.title.is_none());
        assert!(record.state.is_none());
    }
}
