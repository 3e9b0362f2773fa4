use crate::api::camera::error::CameraError;
use app_state::CameraSettings;
use axum::body::Bytes;
use chrono::{DateTime, Utc};
use emotion_inference::{Frame, FrameSource};
use futures_util::Stream;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

/// How often the idle watchdog re-checks the session.
const WATCHDOG_INTERVAL: Duration = Duration::from_secs(1);
/// Pacing of the MJPEG preview stream (~15 fps).
const PREVIEW_FRAME_INTERVAL: Duration = Duration::from_millis(66);

/// Owns the process-wide capture session: at most one is ever active.
///
/// The session is destroyed on explicit stop, on a failed read, and by the
/// idle watchdog once no read succeeded for the configured timeout. Every
/// exit path releases the device.
pub struct CameraService {
    source: Arc<dyn FrameSource>,
    idle_timeout: Duration,
    state: Arc<Mutex<SessionSlot>>,
}

#[derive(Default)]
struct SessionSlot {
    active: Option<CaptureSession>,
    /// Bumped on every open and close so a stale watchdog can tell that the
    /// session it guards is gone.
    generation: u64,
}

/// One camera-open-to-camera-close lifecycle.
struct CaptureSession {
    opened_at: DateTime<Utc>,
    last_read: Instant,
}

impl CameraService {
    pub fn new(source: Arc<dyn FrameSource>, settings: &CameraSettings) -> Arc<Self> {
        Arc::new(Self {
            source,
            idle_timeout: settings.idle_timeout,
            state: Arc::default(),
        })
    }

    /// Starts a session. An existing session is forcibly stopped first, so
    /// concurrent starts serialize down to exactly one active session.
    pub async fn start(&self) -> Result<(), CameraError> {
        let mut slot = self.state.lock().await;
        if let Some(previous) = slot.active.take() {
            info!(
                "Force-stopping camera session opened at {}",
                previous.opened_at
            );
            slot.generation += 1;
            close_device(&self.source).await;
        }

        let source = Arc::clone(&self.source);
        tokio::task::spawn_blocking(move || source.open())
            .await?
            .map_err(CameraError::DeviceUnavailable)?;

        slot.generation += 1;
        slot.active = Some(CaptureSession {
            opened_at: Utc::now(),
            last_read: Instant::now(),
        });
        let generation = slot.generation;
        drop(slot);

        self.spawn_watchdog(generation);
        Ok(())
    }

    /// Stops any active session and releases the device. Idempotent.
    pub async fn stop(&self) {
        let mut slot = self.state.lock().await;
        if let Some(session) = slot.active.take() {
            slot.generation += 1;
            info!("Camera session opened at {} stopped", session.opened_at);
        }
        drop(slot);
        close_device(&self.source).await;
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.active.is_some()
    }

    /// Reads one frame from the active session, refreshing the idle clock.
    /// A failed read destroys the session and releases the device.
    pub async fn read_frame(&self) -> Result<Frame, CameraError> {
        read_frame_inner(&self.state, &self.source).await
    }

    /// MJPEG preview stream. Ends when the session closes or a frame cannot
    /// be produced; each delivered frame refreshes the idle clock via the
    /// regular read path.
    pub fn mjpeg_stream(&self) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        async_stream::stream! {
            loop {
                match read_frame_inner(&state, &source).await {
                    Ok(frame) => match frame.to_jpeg() {
                        Ok(jpeg) => {
                            let mut part = Vec::with_capacity(jpeg.len() + 64);
                            part.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
                            part.extend_from_slice(&jpeg);
                            part.extend_from_slice(b"\r\n");
                            yield Ok(Bytes::from(part));
                        }
                        Err(e) => {
                            warn!("Failed to encode preview frame: {e}");
                            break;
                        }
                    },
                    Err(CameraError::NotActive) => break,
                    Err(e) => {
                        warn!("Preview stream ended: {e}");
                        break;
                    }
                }
                sleep(PREVIEW_FRAME_INTERVAL).await;
            }
        }
    }

    fn spawn_watchdog(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let source = Arc::clone(&self.source);
        let idle_timeout = self.idle_timeout;
        tokio::spawn(async move {
            loop {
                sleep(WATCHDOG_INTERVAL).await;
                let mut slot = state.lock().await;
                if slot.generation != generation {
                    return;
                }
                let Some(session) = slot.active.as_ref() else {
                    return;
                };
                if session.last_read.elapsed() >= idle_timeout {
                    info!("Camera session idle for {idle_timeout:?}, auto-closing");
                    slot.active = None;
                    slot.generation += 1;
                    drop(slot);
                    close_device(&source).await;
                    return;
                }
            }
        });
    }
}

async fn read_frame_inner(
    state: &Mutex<SessionSlot>,
    source: &Arc<dyn FrameSource>,
) -> Result<Frame, CameraError> {
    let mut slot = state.lock().await;
    if slot.active.is_none() {
        return Err(CameraError::NotActive);
    }

    let read_source = Arc::clone(source);
    let result = tokio::task::spawn_blocking(move || read_source.read()).await?;

    match result {
        Ok(frame) => {
            if let Some(session) = slot.active.as_mut() {
                session.last_read = Instant::now();
            }
            Ok(frame)
        }
        Err(e) => {
            slot.active = None;
            slot.generation += 1;
            drop(slot);
            close_device(source).await;
            Err(CameraError::CaptureFailed(e))
        }
    }
}

async fn close_device(source: &Arc<dyn FrameSource>) {
    let source = Arc::clone(source);
    if let Err(e) = tokio::task::spawn_blocking(move || source.close()).await {
        warn!("Camera close task failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotion_inference::{InferenceError, Result as InferenceResult};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubFrameSource {
        open_calls: AtomicUsize,
        /// Currently held device handles; must end at 0 once released.
        held: AtomicUsize,
        fail_reads: AtomicBool,
    }

    impl StubFrameSource {
        fn held_devices(&self) -> usize {
            self.held.load(Ordering::SeqCst)
        }
    }

    impl FrameSource for StubFrameSource {
        fn open(&self) -> InferenceResult<()> {
            self.open_calls.fetch_add(1, Ordering::SeqCst);
            self.held.store(1, Ordering::SeqCst);
            Ok(())
        }

        fn read(&self) -> InferenceResult<Frame> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(InferenceError::CaptureFailed("stub".into()));
            }
            Frame::new(2, 2, vec![0; 12])
        }

        fn close(&self) {
            self.held.store(0, Ordering::SeqCst);
        }
    }

    fn service_with(source: Arc<StubFrameSource>) -> Arc<CameraService> {
        let settings = app_state::AppSettings::for_tests().camera;
        CameraService::new(source, &settings)
    }

    #[tokio::test]
    async fn double_start_leaves_one_active_session() {
        let source = Arc::new(StubFrameSource::default());
        let service = service_with(Arc::clone(&source));

        service.start().await.expect("first start");
        service.start().await.expect("second start");

        assert!(service.is_active().await);
        assert_eq!(source.open_calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.held_devices(), 1);
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_releases_device() {
        let source = Arc::new(StubFrameSource::default());
        let service = service_with(Arc::clone(&source));

        service.start().await.expect("start");
        service.stop().await;
        service.stop().await;

        assert!(!service.is_active().await);
        assert_eq!(source.held_devices(), 0);
    }

    #[tokio::test]
    async fn failed_read_destroys_session() {
        let source = Arc::new(StubFrameSource::default());
        let service = service_with(Arc::clone(&source));

        service.start().await.expect("start");
        source.fail_reads.store(true, Ordering::SeqCst);

        let result = service.read_frame().await;
        assert!(matches!(result, Err(CameraError::CaptureFailed(_))));
        assert!(!service.is_active().await);
        assert_eq!(source.held_devices(), 0);
    }

    #[tokio::test]
    async fn read_without_session_is_rejected() {
        let source = Arc::new(StubFrameSource::default());
        let service = service_with(source);

        assert!(matches!(
            service.read_frame().await,
            Err(CameraError::NotActive)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_auto_closes_after_timeout() {
        let source = Arc::new(StubFrameSource::default());
        let service = service_with(Arc::clone(&source));

        service.start().await.expect("start");
        assert!(service.is_active().await);

        // 30 simulated seconds without a read.
        sleep(Duration::from_secs(31)).await;

        assert!(!service.is_active().await);
        assert_eq!(source.held_devices(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reads_keep_the_session_alive() {
        let source = Arc::new(StubFrameSource::default());
        let service = service_with(Arc::clone(&source));

        service.start().await.expect("start");
        for _ in 0..4 {
            sleep(Duration::from_secs(10)).await;
            service.read_frame().await.expect("read");
        }

        assert!(service.is_active().await);
    }
}
