//! Hacker News search adapter (Algolia-style public index, no auth).

use std::collections::HashSet;
use std::time::Duration;

use chrono::DateTime;
use hearsay_core::{AppConfig, ItemType, Platform};
use serde::Deserialize;

use crate::error::IngestError;
use crate::types::MentionCandidate;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<HnHit>,
}

/// One search hit. All fields optional; defaulting happens in
/// [`HnHit::to_candidate`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HnHit {
    #[serde(rename = "objectID")]
    object_id: Option<String>,
    title: Option<String>,
    story_text: Option<String>,
    comment_text: Option<String>,
    author: Option<String>,
    url: Option<String>,
    points: Option<i64>,
    num_comments: Option<i64>,
    created_at_i: Option<i64>,
}

impl HnHit {
    /// Content falls back `story_text → comment_text → title` so every
    /// candidate carries non-empty content; hits with none are skipped.
    fn to_candidate(&self, item_type: ItemType) -> Option<MentionCandidate> {
        fn non_empty(value: Option<&String>) -> Option<String> {
            value
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        }

        let upstream_item_id = non_empty(self.object_id.as_ref())?;
        let title = non_empty(self.title.as_ref());
        let content = non_empty(self.story_text.as_ref())
            .or_else(|| non_empty(self.comment_text.as_ref()))
            .or_else(|| title.clone())?;

        let item_url = format!("https://news.ycombinator.com/item?id={upstream_item_id}");
        let url = non_empty(self.url.as_ref()).unwrap_or_else(|| item_url.clone());

        Some(MentionCandidate {
            platform: Platform::HackerNews,
            upstream_item_id,
            item_type,
            title,
            content,
            author: non_empty(self.author.as_ref()),
            url,
            permalink: Some(item_url),
            score: i32::try_from(self.points.unwrap_or(0)).unwrap_or(0),
            num_comments: i32::try_from(self.num_comments.unwrap_or(0)).unwrap_or(0),
            posted_at: self
                .created_at_i
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}

/// Client for the public Hacker News search index.
pub struct HnClient {
    client: reqwest::Client,
    base_url: String,
    page_limit: usize,
}

impl HnClient {
    /// # Errors
    ///
    /// Returns [`IngestError::HackerNews`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &AppConfig) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ingest_request_timeout_secs))
            .build()
            .map_err(|e| IngestError::HackerNews(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.hn_base_url.trim_end_matches('/').to_owned(),
            page_limit: config.ingest_page_limit,
        })
    }

    /// Search stories and comments mentioning `keyword`, newest-first,
    /// restricted to items created after `since_epoch` when supplied.
    ///
    /// Issues the story-tagged and comment-tagged queries in parallel and
    /// de-duplicates the merged result set by item id.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] for transport and 429/5xx failures
    /// and [`IngestError::HackerNews`] for malformed payloads.
    pub async fn search_keyword(
        &self,
        keyword: &str,
        since_epoch: Option<i64>,
    ) -> Result<Vec<MentionCandidate>, IngestError> {
        let (stories, comments) = tokio::join!(
            self.search_tagged(keyword, "story", since_epoch),
            self.search_tagged(keyword, "comment", since_epoch),
        );

        let mut candidates = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        for (hits, item_type) in [(stories?, ItemType::Story), (comments?, ItemType::Comment)] {
            for hit in &hits {
                if let Some(candidate) = hit.to_candidate(item_type) {
                    if seen_ids.insert(candidate.upstream_item_id.clone()) {
                        candidates.push(candidate);
                    }
                }
            }
        }

        tracing::debug!(
            keyword,
            candidates = candidates.len(),
            "collected Hacker News search results"
        );

        Ok(candidates)
    }

    async fn search_tagged(
        &self,
        keyword: &str,
        tag: &str,
        since_epoch: Option<i64>,
    ) -> Result<Vec<HnHit>, IngestError> {
        // Phrase-quoted so multi-word keywords match exactly.
        let mut params: Vec<(&str, String)> = vec![
            ("query", format!("\"{keyword}\"")),
            ("tags", tag.to_owned()),
            ("hitsPerPage", self.page_limit.to_string()),
        ];
        if let Some(since) = since_epoch {
            params.push(("numericFilters", format!("created_at_i>{since}")));
        }

        let response = self
            .client
            .get(format!("{}/search_by_date", self.base_url))
            .query(&params)
            .send()
            .await?
            .error_for_status()?;

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| IngestError::HackerNews(format!("search response parse error: {e}")))?;

        Ok(search.hits)
    }
}
