use crate::error::{InferenceError, Result};
use crate::frame::Frame;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Acquires single frames from a capture device.
///
/// `open` and `read` are blocking; callers on an async runtime should wrap
/// them in `spawn_blocking`. `close` must release the device on every path
/// and is idempotent.
pub trait FrameSource: Send + Sync {
    fn open(&self) -> Result<()>;
    fn read(&self) -> Result<Frame>;
    fn close(&self);
}

enum Command {
    Open(Sender<Result<()>>),
    Read(Sender<Result<Frame>>),
    Close(Sender<()>),
}

/// Webcam frame source.
///
/// The capture handle is not `Send` on every platform, so the device lives on
/// a dedicated thread and calls are forwarded over a channel. The thread is
/// the only owner of the device, which also makes `close` unconditional.
pub struct CameraFrameSource {
    commands: Mutex<Sender<Command>>,
}

impl CameraFrameSource {
    /// Spawns the camera thread. The device itself is only acquired on
    /// `open`.
    ///
    /// # Panics
    /// if the camera thread can't be spawned.
    #[must_use]
    pub fn spawn(device_index: u32, open_attempts: u32, retry_delay: Duration) -> Self {
        let (commands, receiver) = channel();
        thread::Builder::new()
            .name("camera".to_string())
            .spawn(move || camera_loop(&receiver, device_index, open_attempts, retry_delay))
            .expect("Failed to spawn camera thread");
        Self {
            commands: Mutex::new(commands),
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        let sender = self
            .commands
            .lock()
            .map_err(|_| InferenceError::DeviceUnavailable("camera thread lock poisoned".into()))?;
        sender
            .send(command)
            .map_err(|_| InferenceError::DeviceUnavailable("camera thread stopped".into()))
    }
}

impl FrameSource for CameraFrameSource {
    fn open(&self) -> Result<()> {
        let (reply, response) = channel();
        self.send(Command::Open(reply))?;
        response
            .recv()
            .map_err(|_| InferenceError::DeviceUnavailable("camera thread stopped".into()))?
    }

    fn read(&self) -> Result<Frame> {
        let (reply, response) = channel();
        self.send(Command::Read(reply))?;
        response
            .recv()
            .map_err(|_| InferenceError::CaptureFailed("camera thread stopped".into()))?
    }

    fn close(&self) {
        let (reply, response) = channel();
        if self.send(Command::Close(reply)).is_ok() {
            let _ = response.recv();
        }
    }
}

fn camera_loop(
    commands: &Receiver<Command>,
    device_index: u32,
    open_attempts: u32,
    retry_delay: Duration,
) {
    let mut camera: Option<Camera> = None;

    while let Ok(command) = commands.recv() {
        match command {
            Command::Open(reply) => {
                let result = if camera.is_some() {
                    Ok(())
                } else {
                    open_camera(device_index, open_attempts, retry_delay).map(|device| {
                        info!("Camera {device_index} opened");
                        camera = Some(device);
                    })
                };
                let _ = reply.send(result);
            }
            Command::Read(reply) => {
                let result = match camera.as_mut() {
                    None => Err(InferenceError::CaptureFailed("camera is not open".into())),
                    Some(device) => read_frame(device),
                };
                if result.is_err() {
                    // A failed read invalidates the session; release the device.
                    release(&mut camera);
                }
                let _ = reply.send(result);
            }
            Command::Close(reply) => {
                release(&mut camera);
                let _ = reply.send(());
            }
        }
    }
    release(&mut camera);
}

fn open_camera(device_index: u32, attempts: u32, retry_delay: Duration) -> Result<Camera> {
    let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut last_error = String::new();

    for attempt in 0..attempts.max(1) {
        if attempt > 0 {
            thread::sleep(retry_delay);
        }
        match Camera::new(CameraIndex::Index(device_index), format) {
            Ok(mut device) => match device.open_stream() {
                Ok(()) => return Ok(device),
                Err(e) => last_error = e.to_string(),
            },
            Err(e) => last_error = e.to_string(),
        }
        warn!("Attempt {} to open camera {device_index} failed: {last_error}", attempt + 1);
    }

    Err(InferenceError::DeviceUnavailable(last_error))
}

fn read_frame(device: &mut Camera) -> Result<Frame> {
    let captured = device
        .frame()
        .map_err(|e| InferenceError::CaptureFailed(e.to_string()))?;
    let decoded = captured
        .decode_image::<RgbFormat>()
        .map_err(|e| InferenceError::CaptureFailed(format!("failed to decode frame: {e}")))?;
    Ok(Frame::from_rgb_image(decoded))
}

fn release(camera: &mut Option<Camera>) {
    if let Some(mut device) = camera.take() {
        if let Err(e) = device.stop_stream() {
            warn!("Error stopping camera stream: {e}");
        }
        info!("Camera released");
    }
}
