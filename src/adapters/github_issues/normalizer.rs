//! Timeline normalization.
//!
//! Maps heterogeneous raw timeline items onto the sparse
//! [`TimelineEvent`] shape.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::models::TimelineEvent;

use super::models::GitHubTimelineItem;

const COMMENTED: &str = "commented";
const LABELED: &str = "labeled";

/// Converts raw timeline items into canonical events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineNormalizer;

impl TimelineNormalizer {
    /// Create a normalizer.
    pub const fn new() -> Self {
        Self
    }

    /// Normalize one raw item. Returns `None` when the item is not an object
    /// or has no determinable event type. Off-shape side fields only lose
    /// that one field.
    pub fn normalize(&self, raw: Value) -> Option<TimelineEvent> {
        let keys = object_keys(&raw);
        let item: GitHubTimelineItem = match serde_json::from_value(raw) {
            Ok(item) => item,
            Err(e) => {
                warn!(keys = ?keys, error = %e, "Dropping undecodable timeline item");
                return None;
            }
        };

        let Some(event_type) = event_type(&item) else {
            warn!(keys = ?keys, "Dropping timeline item without an event type");
            return None;
        };

        let author = item
            .actor
            .as_ref()
            .or(item.user.as_ref())
            .and_then(|u| u.login.clone());

        let label = if event_type == LABELED {
            item.label
                .and_then(|l| l.name)
                .filter(|name| !name.is_empty())
        } else {
            None
        };

        let comment = if event_type == COMMENTED {
            item.body.flatten().map(|body| body.replace('\r', ""))
        } else {
            None
        };

        let event_date = [&item.created_at, &item.event_at, &item.updated_at]
            .into_iter()
            .filter_map(|candidate| candidate.as_deref())
            .filter(|candidate| !candidate.is_empty())
            .find_map(parse_timestamp);

        Some(
            TimelineEvent::new(event_type)
                .with_author(author)
                .with_event_date(event_date)
                .with_label(label)
                .with_comment(comment),
        )
    }

    /// Normalize a whole timeline, keeping the API's order.
    pub fn normalize_all(&self, raw: impl IntoIterator<Item = Value>) -> Vec<TimelineEvent> {
        raw.into_iter().filter_map(|item| self.normalize(item)).collect()
    }
}

fn event_type(item: &GitHubTimelineItem) -> Option<String> {
    match item.event.as_deref() {
        Some(event) if !event.is_empty() => Some(event.to_string()),
        _ if item.body.is_some() => Some(COMMENTED.to_string()),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(value = raw, error = %e, "Ignoring unparsable timeline timestamp");
            None
        }
    }
}

fn object_keys(raw: &Value) -> Vec<String> {
    raw.as_object()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}
