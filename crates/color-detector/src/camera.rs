//! Camera session management.
//!
//! A [`CameraSession`] acquires a frame source from a [`CameraDevice`],
//! tracks the resulting [`CameraStatus`], and releases the device on
//! teardown. There is no automatic retry; callers invoke [`CameraSession::retry`]
//! in response to a user action.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::frame::{Frame, FrameSource, StillImageSource};

/// Message shown when the user refuses camera access.
pub const PERMISSION_MESSAGE: &str = "Camera access denied. Please grant permission.";

/// Errors reported by a camera device during acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// The user or platform denied access.
    #[error("permission denied")]
    PermissionDenied,

    /// Any other acquisition failure.
    #[error("{0}")]
    Device(String),
}

impl From<CameraError> for crate::error::Error {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::PermissionDenied => Self::PermissionDenied(PERMISSION_MESSAGE.to_string()),
            CameraError::Device(message) => Self::CameraDevice(message),
        }
    }
}

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Rear camera, pointed at the scene.
    #[default]
    Environment,
    /// Front camera, pointed at the user.
    User,
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "environment"),
            Self::User => write!(f, "user"),
        }
    }
}

/// What to ask the device for when acquiring a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConstraints {
    /// Preferred facing mode.
    pub facing: Facing,
    /// Preferred width; the device may pick another.
    pub ideal_width: u32,
    /// Preferred height; the device may pick another.
    pub ideal_height: u32,
    /// Device index for platforms that enumerate cameras.
    pub device_index: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::Environment,
            ideal_width: 1280,
            ideal_height: 720,
            device_index: 0,
        }
    }
}

/// A camera capture device.
pub trait CameraDevice: Send {
    /// Request a live stream matching `constraints`.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::PermissionDenied`] if access is refused, or
    /// [`CameraError::Device`] for any other failure.
    fn acquire(
        &mut self,
        constraints: &CameraConstraints,
    ) -> std::result::Result<Box<dyn FrameSource>, CameraError>;
}

/// Status of the camera session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraStatus {
    /// Acquisition is in progress (or nothing is bound).
    #[default]
    Loading,
    /// A live stream is bound.
    Ready,
    /// Access was denied; carries the user-facing message.
    Permission(String),
    /// Acquisition failed; carries the user-facing message.
    Error(String),
}

impl CameraStatus {
    /// Check whether a stream is bound.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// User-facing message for failure states.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Permission(message) | Self::Error(message) => Some(message),
            Self::Loading | Self::Ready => None,
        }
    }

    /// Check whether the UI should offer a retry action.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Permission(_) | Self::Error(_))
    }
}

impl fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Permission(_) => write!(f, "permission"),
            Self::Error(_) => write!(f, "error"),
        }
    }
}

/// Owns the camera device and the stream acquired from it.
pub struct CameraSession {
    device: Box<dyn CameraDevice>,
    constraints: CameraConstraints,
    source: Option<Box<dyn FrameSource>>,
    status: CameraStatus,
    attempts: u32,
}

impl fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraSession")
            .field("constraints", &self.constraints)
            .field("status", &self.status)
            .field("attempts", &self.attempts)
            .field("bound", &self.source.is_some())
            .finish_non_exhaustive()
    }
}

impl CameraSession {
    /// Create a session; nothing is acquired until [`initialize`](Self::initialize).
    #[must_use]
    pub fn new(device: Box<dyn CameraDevice>, constraints: CameraConstraints) -> Self {
        Self {
            device,
            constraints,
            source: None,
            status: CameraStatus::Loading,
            attempts: 0,
        }
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> &CameraStatus {
        &self.status
    }

    /// Number of acquisition attempts so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The constraints used for acquisition.
    #[must_use]
    pub fn constraints(&self) -> &CameraConstraints {
        &self.constraints
    }

    /// Name of the bound source, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<String> {
        self.source.as_ref().map(|s| s.name())
    }

    /// Native resolution of the bound source, if any.
    #[must_use]
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.source.as_ref().map(|s| s.resolution())
    }

    /// Request the camera and bind its stream.
    ///
    /// Moves to `Loading`, then to `Ready`, `Permission` or `Error`.
    pub fn initialize(&mut self) -> &CameraStatus {
        self.release();
        self.set_status(CameraStatus::Loading);
        self.attempts += 1;

        debug!(
            facing = %self.constraints.facing,
            width = self.constraints.ideal_width,
            height = self.constraints.ideal_height,
            attempt = self.attempts,
            "Requesting camera"
        );

        match self.device.acquire(&self.constraints) {
            Ok(source) => {
                info!("Camera stream bound: {}", source.name());
                self.source = Some(source);
                self.set_status(CameraStatus::Ready);
            }
            Err(CameraError::PermissionDenied) => {
                warn!("Camera permission denied");
                self.set_status(CameraStatus::Permission(PERMISSION_MESSAGE.to_string()));
            }
            Err(CameraError::Device(message)) => {
                warn!(error = %message, "Camera acquisition failed");
                self.set_status(CameraStatus::Error(format!("Camera error: {message}")));
            }
        }

        &self.status
    }

    /// Re-run [`initialize`](Self::initialize).
    pub fn retry(&mut self) -> &CameraStatus {
        info!("Retrying camera acquisition");
        self.initialize()
    }

    /// Stop all tracks and release the camera.
    ///
    /// Safe to call at any time, including when acquisition never succeeded.
    pub fn teardown(&mut self) {
        if self.release() {
            info!("Camera released");
        }
        self.set_status(CameraStatus::Loading);
    }

    /// Grab a frame from the bound stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraNotReady`](crate::Error::CameraNotReady) if no
    /// stream is bound, or the source's own error.
    pub fn grab(&mut self) -> crate::Result<Frame> {
        if !self.status.is_ready() {
            return Err(crate::Error::CameraNotReady);
        }
        match self.source.as_mut() {
            Some(source) => source.grab(),
            None => Err(crate::Error::CameraNotReady),
        }
    }

    fn release(&mut self) -> bool {
        match self.source.take() {
            Some(mut source) => {
                source.stop();
                true
            }
            None => false,
        }
    }

    fn set_status(&mut self, status: CameraStatus) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "Camera status changed");
        }
        self.status = status;
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// A device backed by an image file; every acquisition decodes it afresh.
#[derive(Debug, Clone)]
pub struct StillImageDevice {
    path: PathBuf,
}

impl StillImageDevice {
    /// Create a device for the image at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CameraDevice for StillImageDevice {
    fn acquire(
        &mut self,
        _constraints: &CameraConstraints,
    ) -> std::result::Result<Box<dyn FrameSource>, CameraError> {
        StillImageSource::open(&self.path)
            .map(|source| Box::new(source) as Box<dyn FrameSource>)
            .map_err(|e| CameraError::Device(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::color::Rgb;

    /// A frame source that counts how often a stream was stopped.
    pub(crate) struct TrackedSource {
        inner: StillImageSource,
        stops: Arc<AtomicU32>,
    }

    impl FrameSource for TrackedSource {
        fn name(&self) -> String {
            self.inner.name()
        }

        fn resolution(&self) -> (u32, u32) {
            self.inner.resolution()
        }

        fn grab(&mut self) -> crate::Result<Frame> {
            self.inner.grab()
        }

        fn stop(&mut self) {
            if !self.inner.is_stopped() {
                self.stops.fetch_add(1, Ordering::SeqCst);
            }
            self.inner.stop();
        }

        fn is_stopped(&self) -> bool {
            self.inner.is_stopped()
        }
    }

    /// A device that replays scripted acquisition results.
    pub(crate) struct ScriptedDevice {
        script: VecDeque<std::result::Result<Rgb, CameraError>>,
        pub(crate) calls: Arc<AtomicU32>,
        pub(crate) stops: Arc<AtomicU32>,
    }

    impl ScriptedDevice {
        pub(crate) fn new(script: Vec<std::result::Result<Rgb, CameraError>>) -> Self {
            Self {
                script: script.into(),
                calls: Arc::new(AtomicU32::new(0)),
                stops: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    impl CameraDevice for ScriptedDevice {
        fn acquire(
            &mut self,
            _constraints: &CameraConstraints,
        ) -> std::result::Result<Box<dyn FrameSource>, CameraError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rgb = self
                .script
                .pop_front()
                .unwrap_or_else(|| Err(CameraError::Device("no camera".to_string())))?;

            let frame = Frame::solid(8, 6, rgb).expect("valid frame");
            Ok(Box::new(TrackedSource {
                inner: StillImageSource::new("scripted", frame),
                stops: Arc::clone(&self.stops),
            }))
        }
    }

    fn session(script: Vec<std::result::Result<Rgb, CameraError>>) -> CameraSession {
        CameraSession::new(
            Box::new(ScriptedDevice::new(script)),
            CameraConstraints::default(),
        )
    }

    #[test]
    fn test_initial_status_is_loading() {
        let session = session(vec![]);
        assert_eq!(session.status(), &CameraStatus::Loading);
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn test_initialize_success() {
        let mut session = session(vec![Ok(Rgb::new(1, 2, 3))]);
        assert_eq!(session.initialize(), &CameraStatus::Ready);
        assert_eq!(session.resolution(), Some((8, 6)));
        assert_eq!(session.grab().unwrap().center_pixel(), Rgb::new(1, 2, 3));
    }

    #[test]
    fn test_permission_denied_then_retry() {
        let mut session = session(vec![
            Err(CameraError::PermissionDenied),
            Ok(Rgb::new(10, 20, 30)),
        ]);

        let status = session.initialize().clone();
        assert_eq!(status, CameraStatus::Permission(PERMISSION_MESSAGE.to_string()));
        assert!(status.can_retry());
        assert!(session.grab().is_err());

        assert_eq!(session.retry(), &CameraStatus::Ready);
        assert_eq!(session.attempts(), 2);
    }

    #[test]
    fn test_device_error_message() {
        let mut session = session(vec![Err(CameraError::Device(
            "Could not start video source".to_string(),
        ))]);

        let status = session.initialize();
        assert_eq!(status.to_string(), "error");
        assert_eq!(
            status.message(),
            Some("Camera error: Could not start video source")
        );
    }

    #[test]
    fn test_error_then_retry_fails_again() {
        let mut session = session(vec![
            Err(CameraError::Device("busy".to_string())),
            Err(CameraError::Device("still busy".to_string())),
        ]);
        session.initialize();
        let status = session.retry();
        assert_eq!(status.message(), Some("Camera error: still busy"));
    }

    #[test]
    fn test_teardown_stops_tracks() {
        let device = ScriptedDevice::new(vec![Ok(Rgb::new(0, 0, 0))]);
        let stops = Arc::clone(&device.stops);
        let mut session = CameraSession::new(Box::new(device), CameraConstraints::default());
        session.initialize();
        assert!(session.status().is_ready());
        assert_eq!(stops.load(Ordering::SeqCst), 0);

        session.teardown();
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(session.status(), &CameraStatus::Loading);
        assert!(session.source_name().is_none());
        assert!(session.grab().is_err());
    }

    #[test]
    fn test_teardown_without_stream_is_safe() {
        let mut session = session(vec![Err(CameraError::PermissionDenied)]);
        session.teardown();
        session.initialize();
        session.teardown();
        session.teardown();
        assert_eq!(session.status(), &CameraStatus::Loading);
    }

    #[test]
    fn test_retry_releases_previous_stream() {
        let device = ScriptedDevice::new(vec![Ok(Rgb::new(1, 1, 1)), Ok(Rgb::new(2, 2, 2))]);
        let calls = Arc::clone(&device.calls);
        let stops = Arc::clone(&device.stops);
        let mut session = CameraSession::new(Box::new(device), CameraConstraints::default());

        session.initialize();
        session.retry();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
        assert_eq!(session.grab().unwrap().center_pixel(), Rgb::new(2, 2, 2));
    }

    #[test]
    fn test_drop_releases_stream() {
        let device = ScriptedDevice::new(vec![Ok(Rgb::new(1, 1, 1))]);
        let stops = Arc::clone(&device.stops);
        {
            let mut session =
                CameraSession::new(Box::new(device), CameraConstraints::default());
            session.initialize();
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_camera_error_into_crate_error() {
        let err: crate::Error = CameraError::PermissionDenied.into();
        assert!(err.is_permission_error());

        let err: crate::Error = CameraError::Device("gone".to_string()).into();
        assert!(matches!(err, crate::Error::CameraDevice(m) if m == "gone"));
    }

    #[test]
    fn test_default_constraints() {
        let constraints = CameraConstraints::default();
        assert_eq!(constraints.facing, Facing::Environment);
        assert_eq!(constraints.ideal_width, 1280);
        assert_eq!(constraints.ideal_height, 720);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CameraStatus::Loading.to_string(), "loading");
        assert_eq!(CameraStatus::Ready.to_string(), "ready");
        assert_eq!(
            CameraStatus::Permission(String::new()).to_string(),
            "permission"
        );
        assert_eq!(CameraStatus::Error(String::new()).to_string(), "error");
    }

    #[test]
    fn test_still_image_device() {
        let path = std::env::temp_dir().join(format!("colordet-still-{}.png", std::process::id()));
        image::RgbImage::from_pixel(5, 3, image::Rgb([18, 52, 86]))
            .save(&path)
            .unwrap();

        let mut session = CameraSession::new(
            Box::new(StillImageDevice::new(&path)),
            CameraConstraints::default(),
        );
        assert!(session.initialize().is_ready());
        assert_eq!(session.resolution(), Some((5, 3)));
        assert_eq!(session.grab().unwrap().center_pixel(), Rgb::new(18, 52, 86));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_still_image_device_missing_file() {
        let mut session = CameraSession::new(
            Box::new(StillImageDevice::new("/nonexistent/frame.png")),
            CameraConstraints::default(),
        );
        assert!(matches!(
            session.initialize(),
            CameraStatus::Error(msg) if msg.starts_with("Camera error: ")
        ));
    }
}
