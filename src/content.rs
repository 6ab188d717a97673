//! # Content Intake
//!
//! Records handed over by the ingestion collaborators (RSS, news APIs,
//! forums) and the aggregation seam that fans their fetches out and
//! joins the results. The ingestion clients themselves live outside this
//! crate; tests and the CLI use [`StaticSource`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::observability::{log_event_with_fields, Event, Logger};

/// A piece of content from any source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Headline or post title
    pub title: String,

    /// Body text (summary, description, or self-text)
    pub text: String,

    /// Canonical URL; aggregation deduplicates on this
    pub url: String,

    /// Source label, e.g. an outlet name
    pub source: String,

    /// Publication timestamp
    pub published_at: DateTime<Utc>,
}

impl ContentItem {
    /// Build an item published now
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            url: url.into(),
            source: source.into(),
            published_at: Utc::now(),
        }
    }
}

/// A provider of content items
///
/// Implemented by the ingestion collaborators. Fetch failures are the
/// source's own concern; a failing source returns an empty batch rather
/// than poisoning the aggregate.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &str;

    /// Fetch the current batch of items
    async fn fetch(&self) -> Vec<ContentItem>;
}

/// Fixed in-memory source for tests and the CLI
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    name: String,
    items: Vec<ContentItem>,
}

impl StaticSource {
    /// Create a source that always yields `items`
    pub fn new(name: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Vec<ContentItem> {
        self.items.clone()
    }
}

/// Fetch all sources concurrently and merge their batches.
///
/// Fan-out/fan-in: every fetch completes before any item is consumed.
/// Items are deduplicated by URL, first occurrence wins, source order
/// preserved.
pub async fn aggregate_content(sources: &[Box<dyn ContentSource>]) -> Vec<ContentItem> {
    let fetches = sources.iter().map(|source| source.fetch());
    let batches = futures_util::future::join_all(fetches).await;

    let mut seen_urls = HashSet::new();
    let mut merged = Vec::new();

    for (source, batch) in sources.iter().zip(batches) {
        Logger::trace(
            "SOURCE_FETCHED",
            &[("source", source.name()), ("items", &batch.len().to_string())],
        );
        for item in batch {
            if seen_urls.insert(item.url.clone()) {
                merged.push(item);
            }
        }
    }

    log_event_with_fields(Event::ContentFetched, &[("items", &merged.len().to_string())]);
    merged
}
