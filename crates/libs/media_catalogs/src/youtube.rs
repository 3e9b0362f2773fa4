use crate::CatalogError;
use crate::duration::format_iso8601;
use common_types::{MediaItem, MediaSource};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Candidate IDs requested per search page.
const PAGE_SIZE: u32 = 20;
/// Playable items returned to callers.
const MAX_RESULTS: usize = 10;

/// Client for the video catalog's search + detail endpoints.
pub struct YoutubeClient {
    http: Client,
    base_url: String,
    api_key: String,
    region: String,
}

impl YoutubeClient {
    /// Create the client.
    ///
    /// # Panics
    /// if the underlying HTTP client can't be created.
    #[must_use]
    pub fn new(base_url: &str, api_key: &str, region: &str) -> Self {
        Self {
            http: Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .timeout(Duration::from_secs(15))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            region: region.to_string(),
        }
    }

    /// Searches for up to ten playable videos matching `query`.
    ///
    /// Transport and API failures degrade to an empty list here: "no results"
    /// is a valid outcome for the caller, and a broken catalog must never
    /// fail a request that already classified an emotion.
    pub async fn search(&self, query: &str) -> Vec<MediaItem> {
        match self.collect_playable(query).await {
            Ok(items) => items,
            Err(e) => {
                warn!("YouTube search for {query:?} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Gathers playable videos, lazily following `nextPageToken` until ten
    /// candidates pass the eligibility filter or the catalog is exhausted.
    async fn collect_playable(&self, query: &str) -> Result<Vec<MediaItem>, CatalogError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.search_page(query, page_token.as_deref()).await?;
            let ids: Vec<&str> = page
                .items
                .iter()
                .filter_map(|item| item.id.video_id.as_deref())
                .collect();

            if !ids.is_empty() {
                for video in self.video_details(&ids).await?.items {
                    if !video.is_playable(&self.region) {
                        debug!("Skipping ineligible video {}", video.id);
                        continue;
                    }
                    items.push(video.into_media_item());
                    if items.len() >= MAX_RESULTS {
                        return Ok(items);
                    }
                }
            }

            page_token = match page.next_page_token {
                Some(token) if !page.items.is_empty() => Some(token),
                _ => return Ok(items),
            };
        }
    }

    async fn search_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, CatalogError> {
        let mut request = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "id"),
                ("type", "video"),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .query(&[("maxResults", PAGE_SIZE)]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        read_json(request).await
    }

    async fn video_details(&self, ids: &[&str]) -> Result<VideoList, CatalogError> {
        let request = self.http.get(format!("{}/videos", self.base_url)).query(&[
            ("part", "snippet,contentDetails,status"),
            ("id", ids.join(",").as_str()),
            ("key", self.api_key.as_str()),
        ]);
        read_json(request).await
    }
}

async fn read_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, CatalogError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Api { status, body });
    }
    Ok(response.json().await?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Video {
    id: String,
    snippet: Snippet,
    content_details: ContentDetails,
    status: VideoStatus,
}

#[derive(Debug, Deserialize, Default)]
struct Snippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

impl Thumbnails {
    fn best_url(self) -> Option<String> {
        self.medium
            .or(self.high)
            .or(self.fallback)
            .map(|thumbnail| thumbnail.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    #[serde(default)]
    duration: String,
    region_restriction: Option<RegionRestriction>,
}

#[derive(Debug, Deserialize)]
struct RegionRestriction {
    allowed: Option<Vec<String>>,
    blocked: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct VideoStatus {
    #[serde(default)]
    upload_status: String,
    #[serde(default)]
    privacy_status: String,
    #[serde(default)]
    embeddable: bool,
}

impl Video {
    /// The eligibility filter: fully processed, public, embeddable, and not
    /// region-blocked for the caller's configured region.
    fn is_playable(&self, region: &str) -> bool {
        if self.status.upload_status != "processed" {
            return false;
        }
        if self.status.privacy_status != "public" {
            return false;
        }
        if !self.status.embeddable {
            return false;
        }
        match &self.content_details.region_restriction {
            None => true,
            Some(restriction) => {
                let blocked = restriction
                    .blocked
                    .as_ref()
                    .is_some_and(|codes| codes.iter().any(|code| code == region));
                let outside_allowed = restriction
                    .allowed
                    .as_ref()
                    .is_some_and(|codes| !codes.iter().any(|code| code == region));
                !blocked && !outside_allowed
            }
        }
    }

    fn into_media_item(self) -> MediaItem {
        let duration =
            format_iso8601(&self.content_details.duration).unwrap_or_else(|| "0:00".to_string());
        MediaItem {
            embed_link: format!("https://www.youtube.com/embed/{}", self.id),
            title: self.snippet.title,
            duration,
            thumbnail: self.snippet.thumbnails.best_url().unwrap_or_default(),
            source: MediaSource::Video,
        }
    }
}
