use crate::CatalogError;
use crate::duration::format_millis;
use common_types::{Emotion, MediaItem, MediaSource};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Tracks / playlists returned per query.
const MAX_RESULTS: usize = 10;
/// Cached tokens are refreshed this long before they actually expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// A playlist hit for the `get_playlist` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlaylistEntry {
    pub name: String,
    pub embed_link: String,
    pub thumbnail: String,
}

/// Client for the music catalog, authenticated with the client-credentials
/// flow. The access token is cached in-process and refreshed on expiry.
pub struct SpotifyClient {
    http: Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl SpotifyClient {
    /// Create the client.
    ///
    /// # Panics
    /// if the underlying HTTP client can't be created.
    #[must_use]
    pub fn new(accounts_url: &str, api_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            http: Client::builder()
                .connect_timeout(Duration::from_secs(5))
                .timeout(Duration::from_secs(15))
                .build()
                .expect("Failed to create HTTP client"),
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Searches for up to ten tracks. Known emotion labels search by their
    /// mapped genre keyword; any other query passes through as free text.
    /// Failures degrade to an empty list, an empty catalog answer is logged
    /// but valid.
    pub async fn search_tracks(&self, query: &str) -> Vec<MediaItem> {
        match self.try_search_tracks(query).await {
            Ok(items) => {
                if items.is_empty() {
                    debug!("Spotify returned no tracks for {query:?}");
                }
                items
            }
            Err(e) => {
                warn!("Spotify track search for {query:?} failed: {e}");
                Vec::new()
            }
        }
    }

    /// Searches playlists matching `query` (an emotion label or free text).
    pub async fn search_playlists(&self, query: &str) -> Vec<PlaylistEntry> {
        match self.try_search_playlists(query).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Spotify playlist search for {query:?} failed: {e}");
                Vec::new()
            }
        }
    }

    async fn try_search_tracks(&self, query: &str) -> Result<Vec<MediaItem>, CatalogError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}/search", self.api_url))
            .bearer_auth(token)
            .query(&[("q", track_query(query).as_str()), ("type", "track")])
            .query(&[("limit", MAX_RESULTS as u32)])
            .send()
            .await?;

        let response = check_status(response).await?;
        let parsed: TrackSearchResponse = response.json().await?;
        Ok(parsed
            .tracks
            .items
            .into_iter()
            .flatten()
            .take(MAX_RESULTS)
            .map(Track::into_media_item)
            .collect())
    }

    async fn try_search_playlists(&self, query: &str) -> Result<Vec<PlaylistEntry>, CatalogError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}/search", self.api_url))
            .bearer_auth(token)
            .query(&[("q", query), ("type", "playlist")])
            .query(&[("limit", MAX_RESULTS as u32)])
            .send()
            .await?;

        let response = check_status(response).await?;
        let parsed: PlaylistSearchResponse = response.json().await?;
        Ok(parsed
            .playlists
            .items
            .into_iter()
            .flatten()
            .take(MAX_RESULTS)
            .map(Playlist::into_entry)
            .collect())
    }

    /// Returns a valid bearer token, requesting a fresh one when the cached
    /// token is missing or about to expire.
    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.access_token.clone());
        }

        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let response = check_status(response).await?;
        let token: TokenResponse = response.json().await?;
        let ttl = Duration::from_secs(
            token
                .expires_in
                .saturating_sub(TOKEN_REFRESH_MARGIN.as_secs()),
        );
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(token.access_token)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Api { status, body });
    }
    Ok(response)
}

/// Known emotion labels map to a fixed genre keyword; anything else is used
/// verbatim as a free-text query.
fn track_query(query: &str) -> String {
    match query.parse::<Emotion>() {
        Ok(emotion) => format!("genre:\"{}\"", emotion.genre()),
        Err(_) => query.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct TrackSearchResponse {
    tracks: TrackPage,
}

// The catalog pads result pages with nulls, hence the nested Option.
#[derive(Debug, Deserialize, Default)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Option<Track>>,
}

#[derive(Debug, Deserialize)]
struct Track {
    id: String,
    name: String,
    duration_ms: u64,
    #[serde(default)]
    artists: Vec<Artist>,
    #[serde(default)]
    album: Album,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: String,
}

#[derive(Debug, Deserialize, Default)]
struct Album {
    #[serde(default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

impl Track {
    fn into_media_item(self) -> MediaItem {
        let artists = self
            .artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let title = if artists.is_empty() {
            self.name
        } else {
            format!("{artists} - {}", self.name)
        };
        MediaItem {
            title,
            embed_link: format!("https://open.spotify.com/embed/track/{}", self.id),
            duration: format_millis(self.duration_ms),
            thumbnail: self
                .album
                .images
                .first()
                .map(|image| image.url.clone())
                .unwrap_or_default(),
            source: MediaSource::Music,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistSearchResponse {
    playlists: PlaylistPage,
}

#[derive(Debug, Deserialize, Default)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<Option<Playlist>>,
}

#[derive(Debug, Deserialize)]
struct Playlist {
    id: String,
    name: String,
    #[serde(default)]
    images: Vec<Image>,
}

impl Playlist {
    fn into_entry(self) -> PlaylistEntry {
        PlaylistEntry {
            name: self.name,
            embed_link: format!("https://open.spotify.com/embed/playlist/{}", self.id),
            thumbnail: self
                .images
                .first()
                .map(|image| image.url.clone())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_labels_search_by_genre() {
        assert_eq!(track_query("happy"), "genre:\"pop\"");
        assert_eq!(track_query("angry"), "genre:\"rock\"");
        assert_eq!(track_query("neutral"), "genre:\"lo-fi\"");
    }

    #[test]
    fn free_text_passes_through_verbatim() {
        assert_eq!(track_query("rainy day jazz"), "rainy day jazz");
    }

    #[test]
    fn maps_track_to_media_item() {
        let track = Track {
            id: "6rqhFgbbKwnb9MLmUQDhG6".to_string(),
            name: "Song".to_string(),
            duration_ms: 185_500,
            artists: vec![
                Artist {
                    name: "A".to_string(),
                },
                Artist {
                    name: "B".to_string(),
                },
            ],
            album: Album {
                images: vec![Image {
                    url: "https://i.scdn.co/image/cover".to_string(),
                }],
            },
        };
        let item = track.into_media_item();
        assert_eq!(item.title, "A, B - Song");
        assert_eq!(
            item.embed_link,
            "https://open.spotify.com/embed/track/6rqhFgbbKwnb9MLmUQDhG6"
        );
        assert_eq!(item.duration, "3:05");
        assert_eq!(item.source, MediaSource::Music);
    }

    #[test]
    fn skips_null_padded_page_entries() {
        let parsed: PlaylistSearchResponse = serde_json::from_str(
            r#"{"playlists": {"items": [null, {"id": "p1", "name": "Mood", "images": []}]}}"#,
        )
        .expect("parse playlist page");
        let entries: Vec<PlaylistEntry> = parsed
            .playlists
            .items
            .into_iter()
            .flatten()
            .map(Playlist::into_entry)
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Mood");
    }
}
