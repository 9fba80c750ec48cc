//! Catalog lookup client
//!
//! Thin client over the YouTube Data API. The playlist service never calls
//! this; the search route does, and only forwards the resulting entries
//! into add-track requests. Failures are surfaced typed so the caller can
//! show a retryable message, never papered over with synthetic results.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const MAX_RESULTS: u32 = 20;
/// YouTube category id for music videos
const MUSIC_CATEGORY: &str = "10";

/// Catalog lookup configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// API key; lookups fail as unavailable when unset
    pub api_key: Option<String>,
    /// Base URL of the catalog API (overridable for tests)
    pub base_url: String,
}

impl CatalogConfig {
    /// Create a new CatalogConfig from environment variables
    ///
    /// # Environment Variables
    /// - `YOUTUBE_API_KEY`: Catalog API key
    /// - `CATALOG_BASE_URL`: Base URL override
    pub fn from_env() -> Self {
        let api_key = std::env::var("YOUTUBE_API_KEY")
            .ok()
            .filter(|k| !k.is_empty() && k != "YOUR_YOUTUBE_API_KEY");

        let base_url =
            std::env::var("CATALOG_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self { api_key, base_url }
    }
}

/// Errors from catalog lookups
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Search query is required")]
    InvalidQuery,

    /// Quota exhausted or key rejected upstream
    #[error("Catalog quota exceeded or API key rejected")]
    RateLimited,

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// One candidate item returned for a text query
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub video_id: String,
    pub title: String,
    pub artist: String,
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    statistics: Statistics,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

/// Catalog lookup client
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Search the catalog for candidate items
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::InvalidQuery);
        }

        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            CatalogError::Unavailable("Catalog API key not configured".to_string())
        })?;

        let search: SearchResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("maxResults", &MAX_RESULTS.to_string()),
                    ("q", query),
                    ("type", "video"),
                    ("videoCategoryId", MUSIC_CATEGORY),
                    ("order", "relevance"),
                    ("key", api_key),
                ],
            )
            .await?;

        if search.items.is_empty() {
            info!("No catalog results for query: {}", query);
            return Ok(Vec::new());
        }

        info!(
            "Found {} catalog results for query: {}",
            search.items.len(),
            query
        );

        // Second call for view counts and durations; entries degrade to
        // bare snippets when it fails.
        let ids: Vec<&str> = search
            .items
            .iter()
            .map(|item| item.id.video_id.as_str())
            .collect();
        let stats = self.fetch_stats(&ids.join(","), api_key).await;

        let entries = search
            .items
            .into_iter()
            .map(|item| {
                let (view_count, duration) = stats
                    .get(&item.id.video_id)
                    .cloned()
                    .unwrap_or((None, None));

                let thumbnail = item
                    .snippet
                    .thumbnails
                    .medium
                    .or(item.snippet.thumbnails.high)
                    .or(item.snippet.thumbnails.default)
                    .map(|t| t.url)
                    .unwrap_or_else(|| "https://via.placeholder.com/320x180".to_string());

                CatalogEntry {
                    video_id: item.id.video_id,
                    title: item.snippet.title,
                    artist: item.snippet.channel_title,
                    thumbnail,
                    duration: duration.as_deref().and_then(format_duration),
                    view_count: view_count.map(format_view_count),
                }
            })
            .collect();

        Ok(entries)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.config.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| CatalogError::Unavailable(e.to_string())),
            reqwest::StatusCode::FORBIDDEN => Err(CatalogError::RateLimited),
            reqwest::StatusCode::BAD_REQUEST => Err(CatalogError::InvalidQuery),
            status => Err(CatalogError::Unavailable(format!(
                "Catalog API returned {}",
                status
            ))),
        }
    }

    /// Fetch per-video statistics, degrading to an empty map on failure
    async fn fetch_stats(
        &self,
        ids: &str,
        api_key: &str,
    ) -> HashMap<String, (Option<u64>, Option<String>)> {
        let result: Result<VideosResponse, CatalogError> = self
            .get(
                "videos",
                &[
                    ("part", "statistics,contentDetails"),
                    ("id", ids),
                    ("key", api_key),
                ],
            )
            .await;

        match result {
            Ok(videos) => videos
                .items
                .into_iter()
                .map(|item| {
                    let views = item
                        .statistics
                        .view_count
                        .and_then(|v| v.parse::<u64>().ok());
                    (item.id, (views, item.content_details.duration))
                })
                .collect(),
            Err(e) => {
                warn!("Failed to fetch catalog statistics: {}", e);
                HashMap::new()
            }
        }
    }
}

/// Format an ISO-8601 duration like `PT4M13S` as `4:13`, or `1:02:03`
/// once hours are present
pub fn format_duration(duration: &str) -> Option<String> {
    static DURATION_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = DURATION_REGEX.get_or_init(|| {
        Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$")
            .expect("Failed to compile duration regex")
    });

    let captures = regex.captures(duration)?;
    let part = |i: usize| -> u64 {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let (hours, minutes, seconds) = (part(1), part(2), part(3));

    if hours > 0 {
        Some(format!("{}:{:02}:{:02}", hours, minutes, seconds))
    } else {
        Some(format!("{}:{:02}", minutes, seconds))
    }
}

/// Abbreviate a view count at thousand/million thresholds with one decimal
pub fn format_view_count(count: u64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}
