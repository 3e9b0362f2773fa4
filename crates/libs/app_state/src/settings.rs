use crate::{
    ApiSettings, CatalogSettings, LoggingSettings, RawLikesSettings, RawModelSettings, RawSettings,
    SecretSettings,
};
use std::path::{PathBuf, absolute};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub camera: CameraSettings,
    pub models: ModelSettings,
    pub catalogs: CatalogSettings,
    pub likes: LikesSettings,
    pub secrets: SecretSettings,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub device_index: u32,
    pub idle_timeout: Duration,
    pub open_attempts: u32,
    pub open_retry_delay: Duration,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub face_detector: PathBuf,
    pub emotion_classifier: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LikesSettings {
    pub store_file: PathBuf,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let models = ModelSettings {
            face_detector: absolute(&raw.models.face_detector).expect("Invalid face_detector path"),
            emotion_classifier: absolute(&raw.models.emotion_classifier)
                .expect("Invalid emotion_classifier path"),
        };
        let likes = LikesSettings {
            store_file: absolute(&raw.likes.store_file).expect("Invalid store_file path"),
        };
        let camera = CameraSettings {
            device_index: raw.camera.device_index,
            idle_timeout: Duration::from_secs(raw.camera.idle_timeout_secs),
            open_attempts: raw.camera.open_attempts.max(1),
            open_retry_delay: Duration::from_millis(raw.camera.open_retry_delay_ms),
        };

        Self {
            api: raw.api,
            logging: raw.logging,
            camera,
            models,
            catalogs: raw.catalogs,
            likes,
            secrets: raw.secrets,
        }
    }
}

impl RawModelSettings {
    fn placeholder() -> Self {
        Self {
            face_detector: PathBuf::from("models/face_detector.onnx"),
            emotion_classifier: PathBuf::from("models/emotion.onnx"),
        }
    }
}

impl AppSettings {
    /// Settings for tests: real structure, throwaway paths and credentials.
    #[must_use]
    pub fn for_tests() -> Self {
        let raw = RawSettings {
            api: ApiSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
                allowed_origins: vec!["http://localhost:5173".to_string()],
            },
            logging: LoggingSettings {
                level: "debug".to_string(),
            },
            camera: crate::RawCameraSettings {
                device_index: 0,
                idle_timeout_secs: 30,
                open_attempts: 3,
                open_retry_delay_ms: 10,
            },
            models: RawModelSettings::placeholder(),
            catalogs: CatalogSettings {
                youtube: crate::YoutubeSettings {
                    base_url: "http://localhost:0".to_string(),
                    region: "US".to_string(),
                },
                spotify: crate::SpotifySettings {
                    accounts_url: "http://localhost:0".to_string(),
                    api_url: "http://localhost:0".to_string(),
                },
            },
            likes: RawLikesSettings {
                store_file: PathBuf::from("liked_videos.json"),
            },
            secrets: SecretSettings {
                youtube_api_key: "test-key".to_string(),
                spotify_client_id: "test-id".to_string(),
                spotify_client_secret: "test-secret".to_string(),
            },
        };
        raw.into()
    }
}
