//! Mapping from Reddit listing JSON to mention candidates.

use chrono::DateTime;
use hearsay_core::{ItemType, Platform};
use serde::Deserialize;

use crate::types::MentionCandidate;

/// One child of a Reddit listing (`kind` + `data` envelope).
#[derive(Debug, Deserialize)]
pub(super) struct RedditItem {
    pub(super) kind: Option<String>,
    pub(super) data: RedditItemData,
}

/// The loosely-typed `data` payload of a listing child. Every field is
/// optional; defaulting happens in [`to_candidate`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct RedditItemData {
    /// Fullname, e.g. `t3_abc123`. Doubles as the pagination cursor.
    pub(super) name: Option<String>,
    pub(super) id: Option<String>,
    pub(super) title: Option<String>,
    pub(super) selftext: Option<String>,
    pub(super) body: Option<String>,
    pub(super) author: Option<String>,
    pub(super) permalink: Option<String>,
    pub(super) url: Option<String>,
    pub(super) score: Option<i64>,
    pub(super) num_comments: Option<i64>,
    pub(super) created_utc: Option<f64>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Maps one listing child into a [`MentionCandidate`].
///
/// Returns `None` for items with no usable id, no text content, or no
/// resolvable URL; those are skipped rather than failing the page.
pub(super) fn to_candidate(item: &RedditItem) -> Option<MentionCandidate> {
    let data = &item.data;
    let upstream_item_id = non_empty(data.name.as_ref()).or_else(|| non_empty(data.id.as_ref()))?;

    let item_type = match item.kind.as_deref() {
        Some("t1") => ItemType::Comment,
        _ => ItemType::Post,
    };

    let title = non_empty(data.title.as_ref());
    let content = non_empty(data.selftext.as_ref())
        .or_else(|| non_empty(data.body.as_ref()))
        .or_else(|| title.clone())?;

    let permalink = non_empty(data.permalink.as_ref())
        .map(|p| format!("https://www.reddit.com{p}"));
    let url = non_empty(data.url.as_ref()).or_else(|| permalink.clone())?;

    let author = non_empty(data.author.as_ref()).filter(|a| a != "[deleted]");

    #[allow(clippy::cast_possible_truncation)]
    let posted_at = data
        .created_utc
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0));

    Some(MentionCandidate {
        platform: Platform::Reddit,
        upstream_item_id,
        item_type,
        title,
        content,
        author,
        url,
        permalink,
        score: i32::try_from(data.score.unwrap_or(0)).unwrap_or(0),
        num_comments: i32::try_from(data.num_comments.unwrap_or(0)).unwrap_or(0),
        posted_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(json: serde_json::Value) -> RedditItem {
        serde_json::from_value(json).expect("test item should deserialize")
    }

    #[test]
    fn maps_a_text_post() {
        let candidate = to_candidate(&item(serde_json::json!({
            "kind": "t3",
            "data": {
                "name": "t3_abc123",
                "title": "Acme launches",
                "selftext": "Acme shipped a new release today",
                "author": "someuser",
                "permalink": "/r/programming/comments/abc123/acme_launches/",
                "url": "https://example.com/acme",
                "score": 42,
                "num_comments": 7,
                "created_utc": 1_700_000_000.0
            }
        })))
        .expect("post should map");

        assert_eq!(candidate.platform, Platform::Reddit);
        assert_eq!(candidate.upstream_item_id, "t3_abc123");
        assert_eq!(candidate.item_type, ItemType::Post);
        assert_eq!(candidate.content, "Acme shipped a new release today");
        assert_eq!(candidate.score, 42);
        assert_eq!(
            candidate.permalink.as_deref(),
            Some("https://www.reddit.com/r/programming/comments/abc123/acme_launches/")
        );
        assert!(candidate.posted_at.is_some());
    }

    #[test]
    fn comment_kind_maps_to_comment_with_body_content() {
        let candidate = to_candidate(&item(serde_json::json!({
            "kind": "t1",
            "data": {
                "name": "t1_xyz",
                "body": "works great for me",
                "permalink": "/r/rust/comments/abc/c/xyz/"
            }
        })))
        .expect("comment should map");

        assert_eq!(candidate.item_type, ItemType::Comment);
        assert_eq!(candidate.content, "works great for me");
        assert_eq!(candidate.url, "https://www.reddit.com/r/rust/comments/abc/c/xyz/");
    }

    #[test]
    fn title_only_post_falls_back_to_title_content() {
        let candidate = to_candidate(&item(serde_json::json!({
            "kind": "t3",
            "data": {
                "name": "t3_link",
                "title": "Acme raises a round",
                "selftext": "",
                "url": "https://example.com/news"
            }
        })))
        .expect("link post should map");

        assert_eq!(candidate.content, "Acme raises a round");
    }

    #[test]
    fn items_without_id_or_content_are_skipped() {
        assert!(to_candidate(&item(serde_json::json!({
            "kind": "t3",
            "data": { "title": "no id here", "url": "https://example.com" }
        })))
        .is_none());

        assert!(to_candidate(&item(serde_json::json!({
            "kind": "t3",
            "data": { "name": "t3_empty", "selftext": "", "url": "https://example.com" }
        })))
        .is_none());
    }

    #[test]
    fn deleted_author_is_dropped() {
        let candidate = to_candidate(&item(serde_json::json!({
            "kind": "t3",
            "data": {
                "name": "t3_del",
                "title": "still visible",
                "author": "[deleted]",
                "url": "https://example.com"
            }
        })))
        .expect("item should map");
        assert!(candidate.author.is_none());
    }
}
