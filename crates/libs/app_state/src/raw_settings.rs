use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub camera: RawCameraSettings,
    pub models: RawModelSettings,
    pub catalogs: CatalogSettings,
    pub likes: RawLikesSettings,
    pub secrets: SecretSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u32,
    pub allowed_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawCameraSettings {
    /// Which capture device to open (0 is the default webcam).
    pub device_index: u32,
    /// A session with no successful reads for this long is auto-closed.
    pub idle_timeout_secs: u64,
    /// How often device acquisition is attempted before giving up.
    pub open_attempts: u32,
    pub open_retry_delay_ms: u64,
}

/// Paths of the model artifacts loaded at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct RawModelSettings {
    pub face_detector: PathBuf,
    pub emotion_classifier: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    pub youtube: YoutubeSettings,
    pub spotify: SpotifySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct YoutubeSettings {
    pub base_url: String,
    /// ISO 3166-1 alpha-2 country code used for region-restriction filtering.
    pub region: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpotifySettings {
    pub accounts_url: String,
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawLikesSettings {
    pub store_file: PathBuf,
}

/// The yaml ships empty values; real credentials come from `APP__SECRETS__*`
/// environment variables (via `.env` locally).
#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub youtube_api_key: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
}
