use api::api_state::ApiContext;
use api::create_router;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common_services::api::camera::service::CameraService;
use common_services::api::capture::service::CapturePipeline;
use common_services::api::likes::service::LikedStore;
use common_services::api::playlist::service::PlaylistService;
use common_services::api::search::service::SearchService;
use common_services::catalog::{MusicCatalog, VideoCatalog};
use common_types::{Emotion, MediaItem, MediaSource};
use emotion_inference::{
    EmotionClassifier, FaceLocator, FaceRect, Frame, FrameSource, Result as InferenceResult,
};
use http_body_util::BodyExt;
use media_catalogs::PlaylistEntry;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct StubFrameSource;

impl FrameSource for StubFrameSource {
    fn open(&self) -> InferenceResult<()> {
        Ok(())
    }

    fn read(&self) -> InferenceResult<Frame> {
        Frame::new(4, 4, vec![0; 48])
    }

    fn close(&self) {}
}

struct StubLocator;

impl FaceLocator for StubLocator {
    fn locate(&self, _frame: &Frame) -> InferenceResult<Vec<FaceRect>> {
        Ok(vec![FaceRect {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        }])
    }
}

struct HappyClassifier;

impl EmotionClassifier for HappyClassifier {
    fn classify(&self, _frame: &Frame, _face: FaceRect) -> InferenceResult<Emotion> {
        Ok(Emotion::Happy)
    }
}

struct StubVideoCatalog;

#[async_trait]
impl VideoCatalog for StubVideoCatalog {
    async fn search(&self, query: &str) -> Vec<MediaItem> {
        vec![MediaItem {
            title: format!("video: {query}"),
            embed_link: "https://www.youtube.com/embed/v1".to_string(),
            duration: "4:13".to_string(),
            thumbnail: "https://i.ytimg.com/vi/v1/mqdefault.jpg".to_string(),
            source: MediaSource::Video,
        }]
    }
}

struct StubMusicCatalog;

#[async_trait]
impl MusicCatalog for StubMusicCatalog {
    async fn search_tracks(&self, query: &str) -> Vec<MediaItem> {
        vec![MediaItem {
            title: format!("track: {query}"),
            embed_link: "https://open.spotify.com/embed/track/t1".to_string(),
            duration: "3:05".to_string(),
            thumbnail: String::new(),
            source: MediaSource::Music,
        }]
    }

    async fn search_playlists(&self, query: &str) -> Vec<PlaylistEntry> {
        vec![PlaylistEntry {
            name: format!("{query} mix"),
            embed_link: "https://open.spotify.com/embed/playlist/p1".to_string(),
            thumbnail: String::new(),
        }]
    }
}

fn test_router(store_dir: &TempDir) -> Router {
    let settings = app_state::AppSettings::for_tests();
    let video: Arc<dyn VideoCatalog> = Arc::new(StubVideoCatalog);
    let music: Arc<dyn MusicCatalog> = Arc::new(StubMusicCatalog);
    let camera = CameraService::new(Arc::new(StubFrameSource), &settings.camera);
    let pipeline = CapturePipeline::new(
        Arc::clone(&camera),
        Some(Arc::new(StubLocator)),
        Some(Arc::new(HappyClassifier)),
        Arc::clone(&video),
        Arc::clone(&music),
    );
    let context = ApiContext {
        settings,
        camera,
        pipeline,
        search: SearchService::new(video, Arc::clone(&music)),
        playlist: PlaylistService::new(music),
        likes: Arc::new(LikedStore::load(store_dir.path().join("liked.json"))),
    };
    create_router(context)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request handled");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

fn post_json(path: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn post_empty(path: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

fn liked_item() -> Value {
    json!({
        "title": "A song",
        "embed_link": "https://open.spotify.com/embed/track/t1",
        "duration": "3:05",
        "thumbnail": "",
        "source": "music"
    })
}

#[tokio::test]
async fn root_reports_liveness() {
    let dir = TempDir::new().expect("tempdir");
    let router = test_router(&dir);

    let (status, body) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API is live!");
}

#[tokio::test]
async fn capture_then_query_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let router = test_router(&dir);

    let (status, body) = send(&router, get("/get_emotion")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");

    let (status, body) = send(&router, post_empty("/capture_image")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["emotion"], "happy");
    assert_eq!(body["youtube_videos"][0]["title"], "video: happy");
    assert_eq!(body["spotify_tracks"][0]["title"], "track: happy");

    let (status, body) = send(&router, get("/get_emotion")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotion"], "happy");
}

#[tokio::test]
async fn liking_the_same_item_twice_is_a_noop() {
    let dir = TempDir::new().expect("tempdir");
    let router = test_router(&dir);

    let (status, body) = send(&router, post_json("/like_video", &liked_item())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (status, body) = send(&router, post_json("/like_video", &liked_item())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "already_liked");
}

#[tokio::test]
async fn malformed_liked_items_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let router = test_router(&dir);

    let mut bad = liked_item();
    bad["embed_link"] = json!("not a url");
    let (status, body) = send(&router, post_json("/like_video", &bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn playlist_requires_an_emotion() {
    let dir = TempDir::new().expect("tempdir");
    let router = test_router(&dir);

    let (status, body) = send(&router, get("/get_playlist")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No emotion provided.");

    let (status, body) = send(&router, get("/get_playlist?emotion=happy")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playlist"][0]["name"], "happy mix");
}

#[tokio::test]
async fn search_fans_out_to_both_catalogs() {
    let dir = TempDir::new().expect("tempdir");
    let router = test_router(&dir);

    let (status, _) = send(&router, post_json("/search", &json!({ "query": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        post_json("/search", &json!({ "query": "lofi beats" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["youtube_videos"][0]["title"], "video: lofi beats");
    assert_eq!(body["spotify_tracks"][0]["title"], "track: lofi beats");
}

#[tokio::test]
async fn video_feed_needs_an_active_session() {
    let dir = TempDir::new().expect("tempdir");
    let router = test_router(&dir);

    let (status, _) = send(&router, get("/video_feed")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&router, post_empty("/start_camera")).await;
    assert_eq!(status, StatusCode::OK);

    let response = router
        .clone()
        .oneshot(get("/video_feed"))
        .await
        .expect("request handled");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/x-mixed-replace"));
    drop(response);

    let (status, _) = send(&router, post_empty("/stop_camera")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, get("/video_feed")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
