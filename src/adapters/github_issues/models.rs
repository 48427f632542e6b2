//! GitHub Issues API response models.
//!
//! These structs mirror the GitHub REST API v3 JSON payloads field for
//! field. Every field is optional or defaulted so that a payload missing a
//! key decodes to an explicit `None` instead of failing. They are used
//! internally by the harvester and are not part of the canonical model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::lenient::{lenient, nullable, present};
use crate::domain::models::IssueState;

/// A user object nested inside issues and timeline items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    /// Account name.
    #[serde(default)]
    pub login: Option<String>,
    /// Numeric account id.
    #[serde(default)]
    pub id: Option<u64>,
    /// GraphQL node id.
    #[serde(default)]
    pub node_id: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Legacy Gravatar id, usually empty.
    #[serde(default)]
    pub gravatar_id: Option<String>,
    /// API URL of the account.
    #[serde(default)]
    pub url: Option<String>,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// API URL of the followers list.
    #[serde(default)]
    pub followers_url: Option<String>,
    /// API URL template of followed accounts.
    #[serde(default)]
    pub following_url: Option<String>,
    /// API URL template of gists.
    #[serde(default)]
    pub gists_url: Option<String>,
    /// API URL template of starred repositories.
    #[serde(default)]
    pub starred_url: Option<String>,
    /// API URL of watched repositories.
    #[serde(default)]
    pub subscriptions_url: Option<String>,
    /// API URL of organisation memberships.
    #[serde(default)]
    pub organizations_url: Option<String>,
    /// API URL of owned repositories.
    #[serde(default)]
    pub repos_url: Option<String>,
    /// API URL template of public events.
    #[serde(default)]
    pub events_url: Option<String>,
    /// API URL of received events.
    #[serde(default)]
    pub received_events_url: Option<String>,
    /// "User", "Bot" or "Organization".
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
    /// Visibility of the profile to the caller.
    #[serde(default)]
    pub user_view_type: Option<String>,
    /// Whether the account is a GitHub staff admin.
    #[serde(default, deserialize_with = "nullable")]
    pub site_admin: bool,
}

/// A label applied to an issue or referenced by a labeling event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubLabel {
    /// Numeric label id.
    #[serde(default)]
    pub id: Option<u64>,
    /// GraphQL node id.
    #[serde(default)]
    pub node_id: Option<String>,
    /// API URL of the label.
    #[serde(default)]
    pub url: Option<String>,
    /// The label name (e.g., "bug", "priority: high").
    #[serde(default)]
    pub name: Option<String>,
    /// Hex colour without the leading `#`.
    #[serde(default)]
    pub color: Option<String>,
    /// Whether this is one of the repository default labels.
    #[serde(default, deserialize_with = "nullable")]
    pub default: bool,
    /// Short description shown in the UI.
    #[serde(default)]
    pub description: Option<String>,
}

/// An entry of an issue's `labels` array.
///
/// The API sends label objects; anything else is carried as-is and ignored
/// when flattening to names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GitHubLabelEntry {
    /// A regular label object.
    Label(GitHubLabel),
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl GitHubLabelEntry {
    /// The label name, if this entry is a label object with a non-empty name.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Label(label) => label.name.as_deref().filter(|n| !n.is_empty()),
            Self::Other(_) => None,
        }
    }
}

/// Reaction counters attached to an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubReactions {
    /// API URL of the reactions list.
    #[serde(default)]
    pub url: Option<String>,
    /// Sum of all reactions.
    #[serde(default, deserialize_with = "nullable")]
    pub total_count: u64,
    /// Thumbs-up count.
    #[serde(default, rename = "+1", deserialize_with = "nullable")]
    pub plus_one: u64,
    /// Thumbs-down count.
    #[serde(default, rename = "-1", deserialize_with = "nullable")]
    pub minus_one: u64,
    /// Laugh count.
    #[serde(default, deserialize_with = "nullable")]
    pub laugh: u64,
    /// Hooray count.
    #[serde(default, deserialize_with = "nullable")]
    pub hooray: u64,
    /// Confused count.
    #[serde(default, deserialize_with = "nullable")]
    pub confused: u64,
    /// Heart count.
    #[serde(default, deserialize_with = "nullable")]
    pub heart: u64,
    /// Rocket count.
    #[serde(default, deserialize_with = "nullable")]
    pub rocket: u64,
    /// Eyes count.
    #[serde(default, deserialize_with = "nullable")]
    pub eyes: u64,
}

/// An issue returned by the GitHub issues listing.
///
/// Note: issues and pull requests share the same endpoint. The harvester
/// detects pull requests by the presence of the `pull_request` key on the
/// raw payload, before decoding into this struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubIssue {
    /// API URL of the issue.
    #[serde(default)]
    pub url: Option<String>,
    /// API URL of the owning repository.
    #[serde(default)]
    pub repository_url: Option<String>,
    /// API URL template of the issue labels.
    #[serde(default)]
    pub labels_url: Option<String>,
    /// API URL of the issue comments.
    #[serde(default)]
    pub comments_url: Option<String>,
    /// API URL of the issue events.
    #[serde(default)]
    pub events_url: Option<String>,
    /// URL to view the issue in the GitHub UI.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Globally unique numeric id.
    #[serde(default)]
    pub id: Option<u64>,
    /// GraphQL node id.
    #[serde(default)]
    pub node_id: Option<String>,
    /// Sequential number within the repository.
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<u64>,
    /// Issue title.
    #[serde(default)]
    pub title: Option<String>,
    /// Author of the issue.
    #[serde(default)]
    pub user: Option<GitHubUser>,
    /// Attached labels.
    #[serde(default, deserialize_with = "nullable")]
    pub labels: Vec<GitHubLabelEntry>,
    /// `open` or `closed`; anything else decodes as `None`.
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<IssueState>,
    /// Whether the conversation is locked.
    #[serde(default, deserialize_with = "nullable")]
    pub locked: bool,
    /// Primary assignee, kept for older payloads.
    #[serde(default)]
    pub assignee: Option<GitHubUser>,
    /// All assignees; `null` entries are tolerated.
    #[serde(default, deserialize_with = "nullable")]
    pub assignees: Vec<Option<GitHubUser>>,
    /// Milestone object, carried opaquely.
    #[serde(default)]
    pub milestone: Option<serde_json::Value>,
    /// Number of comments.
    #[serde(default, deserialize_with = "nullable")]
    pub comments: u64,
    /// When the issue was opened.
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the issue last changed.
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<DateTime<Utc>>,
    /// When the issue was closed, if it is.
    #[serde(default, deserialize_with = "lenient")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Relationship of the author to the repository.
    #[serde(default)]
    pub author_association: Option<String>,
    /// Reason given when locking.
    #[serde(default)]
    pub active_lock_reason: Option<String>,
    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,
    /// User who closed the issue.
    #[serde(default)]
    pub closed_by: Option<GitHubUser>,
    /// Reaction counters.
    #[serde(default)]
    pub reactions: Option<GitHubReactions>,
    /// Timeline endpoint as advertised by the API.
    #[serde(default)]
    pub timeline_url: Option<String>,
    /// App that created the issue, carried opaquely.
    #[serde(default)]
    pub performed_via_github_app: Option<serde_json::Value>,
    /// `completed`, `not_planned` or `reopened`.
    #[serde(default)]
    pub state_reason: Option<String>,
    /// Present only on pull requests.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
    /// Login of the issue author.
    pub fn creator(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.login.as_deref())
    }

    /// Names of the attached labels, skipping entries without a name.
    pub fn label_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .filter_map(GitHubLabelEntry::name)
            .map(str::to_string)
            .collect()
    }

    /// Logins of the assignees, skipping `null` entries.
    pub fn assignee_logins(&self) -> Vec<String> {
        self.assignees
            .iter()
            .flatten()
            .filter_map(|u| u.login.clone())
            .collect()
    }
}

/// One raw entry of an issue's timeline.
///
/// Timeline entries come in many shapes: plain events carry an `event` tag
/// and an `actor`, comments carry a `body` and a `user` but no tag, and
/// some events carry only `event_at` or `updated_at` timestamps. Only the
/// fields the normalizer reads are decoded, each one leniently, so a
/// malformed side field never costs the whole event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitHubTimelineItem {
    /// Event tag; comments may omit it.
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<String>,
    /// User who triggered the event.
    #[serde(default, deserialize_with = "lenient")]
    pub actor: Option<GitHubUser>,
    /// Comment author.
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<GitHubUser>,
    /// Primary timestamp.
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    /// Fallback timestamp used by some events.
    #[serde(default, deserialize_with = "lenient")]
    pub event_at: Option<String>,
    /// Last-resort timestamp.
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,
    /// Label of a labeling event.
    #[serde(default, deserialize_with = "lenient")]
    pub label: Option<GitHubLabel>,
    /// `None` when the key is absent, `Some(None)` when it is `null` or not
    /// a string.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub body: Option<Option<String>>,
}
