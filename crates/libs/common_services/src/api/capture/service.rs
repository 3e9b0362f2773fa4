use crate::api::camera::service::CameraService;
use crate::api::capture::error::CaptureError;
use crate::api::capture::interfaces::EmotionSnapshot;
use crate::catalog::{MusicCatalog, VideoCatalog};
use common_types::Emotion;
use emotion_inference::{EmotionClassifier, FaceLocator, Frame};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};

/// Stages of one capture request. Every error path falls back to `Idle`
/// after force-closing the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineStage {
    #[default]
    Idle,
    CameraStarting,
    CameraReady,
    Capturing,
    Classifying,
    Searching,
    Complete,
}

/// Orchestrates frame capture, face detection, emotion classification, and
/// the fan-out to both catalogs. At most one run is in flight at a time; the
/// result of the last completed run is cached for status queries.
///
/// The detector and classifier are optional because model loading at startup
/// is non-fatal: without them, runs fail with an explicit "not loaded" error.
pub struct CapturePipeline {
    camera: Arc<CameraService>,
    locator: Option<Arc<dyn FaceLocator>>,
    classifier: Option<Arc<dyn EmotionClassifier>>,
    video_catalog: Arc<dyn VideoCatalog>,
    music_catalog: Arc<dyn MusicCatalog>,
    stage: StdMutex<PipelineStage>,
    snapshot: RwLock<Option<EmotionSnapshot>>,
    run_guard: Mutex<()>,
}

impl CapturePipeline {
    pub fn new(
        camera: Arc<CameraService>,
        locator: Option<Arc<dyn FaceLocator>>,
        classifier: Option<Arc<dyn EmotionClassifier>>,
        video_catalog: Arc<dyn VideoCatalog>,
        music_catalog: Arc<dyn MusicCatalog>,
    ) -> Arc<Self> {
        Arc::new(Self {
            camera,
            locator,
            classifier,
            video_catalog,
            music_catalog,
            stage: StdMutex::default(),
            snapshot: RwLock::new(None),
            run_guard: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn stage(&self) -> PipelineStage {
        self.stage.lock().map(|stage| *stage).unwrap_or_default()
    }

    fn set_stage(&self, stage: PipelineStage) {
        if let Ok(mut current) = self.stage.lock() {
            *current = stage;
        }
    }

    /// Runs the full capture pipeline. On any failure the camera session is
    /// force-closed and the pipeline returns to `Idle`; the cached snapshot
    /// is only replaced by a completed run.
    #[instrument(skip(self), err(Debug))]
    pub async fn capture_and_recommend(&self) -> Result<EmotionSnapshot, CaptureError> {
        let _run = self.run_guard.lock().await;
        let result = self.run_pipeline().await;
        if result.is_err() {
            self.camera.stop().await;
            self.set_stage(PipelineStage::Idle);
        }
        result
    }

    async fn run_pipeline(&self) -> Result<EmotionSnapshot, CaptureError> {
        let (locator, classifier) = self.models()?;

        self.set_stage(PipelineStage::CameraStarting);
        if !self.camera.is_active().await {
            self.camera.start().await?;
        }
        self.set_stage(PipelineStage::CameraReady);

        self.set_stage(PipelineStage::Capturing);
        let frame = self.camera.read_frame().await?;
        // The still is taken; release the device before the slow stages.
        self.camera.stop().await;

        self.set_stage(PipelineStage::Classifying);
        let emotion = classify_dominant_face(&locator, &classifier, frame).await?;
        info!("Classified emotion: {emotion}");

        self.set_stage(PipelineStage::Searching);
        let label = emotion.as_str();
        let (youtube_videos, spotify_tracks) = tokio::join!(
            self.video_catalog.search(label),
            self.music_catalog.search_tracks(label)
        );

        let snapshot = EmotionSnapshot {
            emotion,
            youtube_videos,
            spotify_tracks,
        };
        *self.snapshot.write().await = Some(snapshot.clone());
        self.set_stage(PipelineStage::Complete);
        Ok(snapshot)
    }

    /// Classifies an uploaded still without touching the camera or the
    /// cached snapshot.
    pub async fn classify_still(&self, frame: Frame) -> Result<Emotion, CaptureError> {
        let (locator, classifier) = self.models()?;
        classify_dominant_face(&locator, &classifier, frame).await
    }

    /// The last completed run's result, if any.
    pub async fn snapshot(&self) -> Option<EmotionSnapshot> {
        self.snapshot.read().await.clone()
    }

    fn models(
        &self,
    ) -> Result<(Arc<dyn FaceLocator>, Arc<dyn EmotionClassifier>), CaptureError> {
        match (self.locator.clone(), self.classifier.clone()) {
            (Some(locator), Some(classifier)) => Ok((locator, classifier)),
            _ => Err(CaptureError::ModelsNotLoaded),
        }
    }
}

/// Runs detection and classification on a blocking thread. The largest
/// detected face is treated as the dominant one; zero faces is a user-facing
/// failure, not a crash.
async fn classify_dominant_face(
    locator: &Arc<dyn FaceLocator>,
    classifier: &Arc<dyn EmotionClassifier>,
    frame: Frame,
) -> Result<Emotion, CaptureError> {
    let locator = Arc::clone(locator);
    let classifier = Arc::clone(classifier);
    tokio::task::spawn_blocking(move || {
        let faces = locator.locate(&frame).map_err(CaptureError::Inference)?;
        let Some(dominant) = faces.into_iter().max_by_key(|face| face.area()) else {
            return Err(CaptureError::NoFaceDetected);
        };
        classifier
            .classify(&frame, dominant)
            .map_err(CaptureError::Inference)
    })
    .await?
}
