//! Live webcam capture through `nokhwa`.
//!
//! The camera handle lives on its own thread for its whole life; the
//! [`WebcamSource`] talks to it over channels.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::{Camera, NokhwaError};
use tracing::{debug, info, warn};

use crate::camera::{CameraConstraints, CameraDevice, CameraError};
use crate::error::{Error, Result};
use crate::frame::{Frame, FrameSource};

enum Command {
    Grab(mpsc::Sender<Result<Frame>>),
    Stop,
}

struct Opened {
    name: String,
    resolution: (u32, u32),
}

/// Opens the system webcam.
#[derive(Debug, Default)]
pub struct Webcam;

impl Webcam {
    /// Create a device handle. Nothing is opened until acquisition.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CameraDevice for Webcam {
    fn acquire(
        &mut self,
        constraints: &CameraConstraints,
    ) -> std::result::Result<Box<dyn FrameSource>, CameraError> {
        WebcamSource::spawn(constraints).map(|s| Box::new(s) as Box<dyn FrameSource>)
    }
}

/// A running webcam stream.
pub struct WebcamSource {
    name: String,
    resolution: (u32, u32),
    commands: mpsc::Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for WebcamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebcamSource")
            .field("name", &self.name)
            .field("resolution", &self.resolution)
            .field("stopped", &self.worker.is_none())
            .finish()
    }
}

impl WebcamSource {
    fn spawn(constraints: &CameraConstraints) -> std::result::Result<Self, CameraError> {
        let (commands, inbox) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let constraints = *constraints;

        let worker = thread::Builder::new()
            .name("webcam".to_string())
            .spawn(move || {
                let mut camera = match open_camera(&constraints) {
                    Ok(camera) => camera,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let resolution = camera.resolution();
                let _ = ready_tx.send(Ok(Opened {
                    name: camera.info().human_name(),
                    resolution: (resolution.width(), resolution.height()),
                }));
                serve(&mut camera, &inbox);
                if let Err(e) = camera.stop_stream() {
                    warn!(error = %e, "Failed to stop camera stream");
                }
            })
            .map_err(|e| CameraError::Device(format!("failed to start camera thread: {e}")))?;

        let opened = ready_rx
            .recv()
            .map_err(|_| CameraError::Device("camera thread exited".to_string()))??;

        info!(
            camera = %opened.name,
            width = opened.resolution.0,
            height = opened.resolution.1,
            "Opened camera"
        );
        Ok(Self {
            name: opened.name,
            resolution: opened.resolution,
            commands,
            worker: Some(worker),
        })
    }
}

fn open_camera(constraints: &CameraConstraints) -> std::result::Result<Camera, CameraError> {
    let index = CameraIndex::Index(constraints.device_index);
    let ideal = RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestResolution(
        Resolution::new(constraints.ideal_width, constraints.ideal_height),
    ));

    let mut camera = match Camera::new(index.clone(), ideal) {
        Ok(camera) => camera,
        Err(e) => {
            debug!(error = %e, "Ideal resolution unavailable, using device default");
            let fallback =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
            Camera::new(index, fallback).map_err(classify)?
        }
    };
    camera.open_stream().map_err(classify)?;
    Ok(camera)
}

fn serve(camera: &mut Camera, inbox: &mpsc::Receiver<Command>) {
    while let Ok(Command::Grab(reply)) = inbox.recv() {
        let frame = camera
            .frame()
            .and_then(|buffer| buffer.decode_image::<RgbFormat>())
            .map(Frame::from)
            .map_err(|e| Error::camera_device(e.to_string()));
        let _ = reply.send(frame);
    }
}

/// Operating systems report refused camera access through ordinary open
/// errors; the message is the only signal.
fn classify(error: NokhwaError) -> CameraError {
    let message = error.to_string();
    let lower = message.to_lowercase();
    if ["permission", "denied", "not authorized", "notallowed"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        CameraError::PermissionDenied
    } else {
        CameraError::Device(message)
    }
}

impl FrameSource for WebcamSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn grab(&mut self) -> Result<Frame> {
        if self.worker.is_none() {
            return Err(Error::CameraNotReady);
        }
        let (reply, response) = mpsc::channel();
        self.commands
            .send(Command::Grab(reply))
            .map_err(|_| Error::camera_device("camera thread exited"))?;
        response
            .recv()
            .map_err(|_| Error::camera_device("camera thread exited"))?
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.commands.send(Command::Stop);
            if worker.join().is_err() {
                warn!(camera = %self.name, "Camera thread panicked");
            }
            debug!(camera = %self.name, "Camera released");
        }
    }

    fn is_stopped(&self) -> bool {
        self.worker.is_none()
    }
}

impl Drop for WebcamSource {
    fn drop(&mut self) {
        self.stop();
    }
}
