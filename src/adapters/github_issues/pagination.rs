//! `Link`-header cursor pagination over GitHub collection endpoints.

use std::collections::VecDeque;

use futures::stream::{self, Stream};
use serde_json::Value;
use tracing::debug;

use crate::domain::errors::HarvestResult;

use super::client::GitHubClient;

/// Relations parsed out of a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRelations {
    /// URL of the following page.
    pub next: Option<String>,
    /// URL of the final page.
    pub last: Option<String>,
}

/// Parse an RFC 8288 `Link` header as GitHub sends it.
///
/// `<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`.
/// Only `next` and `last` are kept; URLs are returned verbatim.
pub fn parse_link_header(header: &str) -> LinkRelations {
    let mut relations = LinkRelations::default();

    for part in header.split(',') {
        let mut sections = part.split(';');
        let Some(target) = sections.next() else {
            continue;
        };
        let target = target.trim();
        let Some(url) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
            continue;
        };

        for param in sections {
            let Some((key, value)) = param.trim().split_once('=') else {
                continue;
            };
            if key.trim() != "rel" {
                continue;
            }
            for rel in value.trim().trim_matches('"').split_whitespace() {
                match rel {
                    "next" => relations.next = Some(url.to_string()),
                    "last" => relations.last = Some(url.to_string()),
                    _ => {}
                }
            }
        }
    }

    relations
}

/// Lazy, finite sequence of raw items across every page of an endpoint.
///
/// Pages are fetched one at a time, only when the buffered items of the
/// previous page are used up. The cursor cannot be restarted.
#[derive(Debug)]
pub struct PageCursor {
    client: GitHubClient,
    next_url: Option<String>,
    /// Sent with the first request only.
    query: Vec<(String, String)>,
    buffer: VecDeque<Value>,
    pages_fetched: usize,
}

impl PageCursor {
    /// Cursor starting at `url`; `query` goes on the first request only.
    pub fn new(client: GitHubClient, url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            client,
            next_url: Some(url.into()),
            query,
            buffer: VecDeque::new(),
            pages_fetched: 0,
        }
    }

    /// Number of pages requested so far.
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Yield the next item, fetching the following page when needed.
    ///
    /// Returns `Ok(None)` once a page without a `next` relation has been
    /// fully drained.
    pub async fn next(&mut self) -> HarvestResult<Option<Value>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            let Some(url) = self.next_url.take() else {
                return Ok(None);
            };

            let query = std::mem::take(&mut self.query);
            let page = self.client.get_page(&url, &query).await?;
            self.pages_fetched += 1;

            debug!(
                url = %url,
                page = self.pages_fetched,
                items = page.items.len(),
                last = page.last.as_deref().unwrap_or(""),
                "Fetched page"
            );

            self.buffer.extend(page.items);
            self.next_url = page.next;
        }
    }

    /// Drain the cursor into a vector.
    pub async fn collect_all(mut self) -> HarvestResult<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Expose the cursor as a stream. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = HarvestResult<Value>> {
        stream::try_unfold(self, |mut cursor| async move {
            let item = cursor.next().await?;
            HarvestResult::Ok(item.map(|item| (item, cursor)))
        })
    }
}
