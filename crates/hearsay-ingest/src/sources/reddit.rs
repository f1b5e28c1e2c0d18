//! Reddit listing adapter (client-credentials OAuth).

use std::time::Duration;

use hearsay_core::AppConfig;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::IngestError;
use crate::types::FetchPage;

use super::reddit_helpers::{to_candidate, RedditItem};

const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit listing wrapper.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<RedditItem>,
    after: Option<String>,
}

/// Reddit API client holding a valid access token.
#[derive(Debug)]
pub struct RedditClient {
    client: reqwest::Client,
    token: String,
    user_agent: String,
    api_base: String,
}

impl RedditClient {
    /// Create a client against the production Reddit endpoints by
    /// exchanging client credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] when OAuth credentials are not
    /// configured, and [`IngestError::Reddit`] when token exchange fails.
    pub async fn connect(config: &AppConfig) -> Result<Self, IngestError> {
        Self::connect_to(config, DEFAULT_AUTH_BASE, DEFAULT_API_BASE).await
    }

    /// Like [`RedditClient::connect`] but against explicit auth/API base
    /// URLs, so tests can point both at a mock server.
    pub async fn connect_to(
        config: &AppConfig,
        auth_base: &str,
        api_base: &str,
    ) -> Result<Self, IngestError> {
        let client_id = config
            .reddit_client_id
            .as_deref()
            .ok_or_else(|| IngestError::Config("REDDIT_CLIENT_ID is not set".to_owned()))?;
        let client_secret = config
            .reddit_client_secret
            .as_deref()
            .ok_or_else(|| IngestError::Config("REDDIT_CLIENT_SECRET is not set".to_owned()))?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ingest_request_timeout_secs));
        if let Some(proxy_url) = &config.reddit_proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        let client = builder
            .build()
            .map_err(|e| IngestError::Reddit(format!("failed to build HTTP client: {e}")))?;

        let token = Self::fetch_token(
            &client,
            auth_base,
            client_id,
            client_secret,
            &config.reddit_user_agent,
        )
        .await?;

        Ok(Self {
            client,
            token,
            user_agent: config.reddit_user_agent.clone(),
            api_base: api_base.trim_end_matches('/').to_owned(),
        })
    }

    async fn fetch_token(
        client: &reqwest::Client,
        auth_base: &str,
        client_id: &str,
        client_secret: &str,
        user_agent: &str,
    ) -> Result<String, IngestError> {
        let response = client
            .post(format!(
                "{}/api/v1/access_token",
                auth_base.trim_end_matches('/')
            ))
            .header("User-Agent", user_agent)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IngestError::Reddit(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token_resp: TokenResponse = response
            .json()
            .await
            .map_err(|e| IngestError::Reddit(format!("token parse error: {e}")))?;

        Ok(token_resp.access_token)
    }

    /// Fetch one page of new posts across all communities, starting
    /// after the stored cursor when one is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::InvalidCursor`] when the upstream rejects
    /// the supplied cursor (HTTP 400/404), [`IngestError::Http`] for
    /// transport and 429/5xx failures, and [`IngestError::Reddit`] when
    /// the response does not carry the expected listing shape.
    pub async fn fetch_new(
        &self,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<FetchPage, IngestError> {
        let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(after) = cursor {
            params.push(("after", after.to_owned()));
        }

        let response = self
            .client
            .get(format!("{}/r/all/new", self.api_base))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", &self.user_agent)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if let Some(after) = cursor {
                if matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND) {
                    return Err(IngestError::InvalidCursor(after.to_owned()));
                }
            }
            return match response.error_for_status() {
                Err(e) => Err(IngestError::Http(e)),
                Ok(_) => Err(IngestError::Reddit(format!(
                    "listing fetch failed with status {status}"
                ))),
            };
        }

        // An unexpected payload shape is a hard failure, not a retry case.
        let listing: Listing = response
            .json()
            .await
            .map_err(|e| IngestError::Reddit(format!("listing parse error: {e}")))?;

        let total = listing.data.children.len();
        let items: Vec<_> = listing.data.children.iter().filter_map(to_candidate).collect();
        if items.len() < total {
            tracing::debug!(
                skipped = total - items.len(),
                "dropped listing items without usable id/content"
            );
        }

        Ok(FetchPage {
            items,
            next_cursor: listing.data.after,
        })
    }
}
