//! The color detector: one camera session, one sampler and the favorites
//! list, driven together.
//!
//! While [`Detector::run`] holds the detector, other tasks reach it through
//! a [`DetectorControl`]: retrying the camera, saving the live color and
//! pausing are handled between ticks without disturbing the tick schedule.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::camera::{CameraDevice, CameraSession, CameraStatus};
use crate::color::{Rgb, Sample};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::favorites::Favorites;
use crate::history::History;
use crate::naming::ColorNamer;
use crate::sampler::{ColorSampler, Pace, Reading, SamplerHandle};
use crate::storage::KeyValueStore;

/// Queued commands for a running detector.
const COMMAND_QUEUE: usize = 8;

/// A request for [`Detector::run`], answered on its reply channel.
#[derive(Debug)]
enum Command {
    Retry(oneshot::Sender<CameraStatus>),
    FavoriteCurrent(oneshot::Sender<Result<(Sample, bool)>>),
    TogglePause(oneshot::Sender<bool>),
}

/// Owns everything a detector screen needs.
#[derive(Debug)]
pub struct Detector {
    session: CameraSession,
    sampler: ColorSampler,
    favorites: Favorites,
    handle: SamplerHandle,
    control: DetectorControl,
    commands: mpsc::Receiver<Command>,
}

impl Detector {
    /// Assemble a detector from configuration.
    ///
    /// Favorites are loaded from `store` once, here.
    ///
    /// # Errors
    ///
    /// Returns an error if the store can't be read.
    pub fn new(
        config: &Config,
        device: Box<dyn CameraDevice>,
        namer: Arc<dyn ColorNamer>,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self> {
        let session = CameraSession::new(device, config.camera_constraints());
        let sampler = ColorSampler::new(
            namer,
            History::with_capacity(config.sampler.history_len),
            config.sample_interval(),
        );
        let favorites = Favorites::load(store)?;
        let (tx, commands) = mpsc::channel(COMMAND_QUEUE);

        Ok(Self {
            session,
            sampler,
            favorites,
            handle: SamplerHandle::new(),
            control: DetectorControl { tx },
            commands,
        })
    }

    /// Acquire the camera.
    pub fn start(&mut self) -> &CameraStatus {
        self.session.initialize()
    }

    /// Re-acquire the camera after a permission or device failure.
    pub fn retry(&mut self) -> &CameraStatus {
        self.session.retry()
    }

    /// Camera status.
    #[must_use]
    pub fn status(&self) -> &CameraStatus {
        self.session.status()
    }

    /// The camera session.
    #[must_use]
    pub fn session(&self) -> &CameraSession {
        &self.session
    }

    /// A handle for pausing or stopping [`Detector::run`] from elsewhere.
    #[must_use]
    pub fn handle(&self) -> SamplerHandle {
        self.handle.clone()
    }

    /// A control for a detector that is inside [`Detector::run`].
    #[must_use]
    pub fn control(&self) -> DetectorControl {
        self.control.clone()
    }

    /// Pause or resume sampling; returns whether it is now paused.
    pub fn toggle_pause(&self) -> bool {
        let paused = self.handle.toggle_pause();
        info!(paused, "Sampling toggled");
        paused
    }

    /// The most recent sample.
    #[must_use]
    pub fn current(&self) -> &Sample {
        self.sampler.current()
    }

    /// Text color that stays readable on the current swatch.
    #[must_use]
    pub fn current_contrast(&self) -> Rgb {
        self.sampler
            .current()
            .rgb()
            .map(Rgb::contrast_text)
            .unwrap_or_default()
    }

    /// Recent distinct samples, newest first.
    #[must_use]
    pub fn history(&self) -> &History {
        self.sampler.history()
    }

    /// Saved favorites.
    #[must_use]
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Save the current color. Returns false if it was already saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites can't be persisted.
    pub fn favorite_current(&mut self) -> Result<bool> {
        let sample = self.sampler.current().clone();
        self.favorites.add(sample)
    }

    /// Save a specific sample, e.g. one picked from history.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites can't be persisted.
    pub fn add_favorite(&mut self, sample: Sample) -> Result<bool> {
        self.favorites.add(sample)
    }

    /// Delete a favorite by hex.
    ///
    /// # Errors
    ///
    /// Returns an error if the favorites can't be persisted.
    pub fn remove_favorite(&mut self, hex: &str) -> Result<bool> {
        self.favorites.remove(hex)
    }

    /// Sample the camera until the handle is stopped or `tx` is closed.
    ///
    /// Commands sent through [`Detector::control`] are applied between
    /// ticks. Ticks are skipped while the camera is not ready, so a
    /// successful retry resumes readings on the next tick.
    pub async fn run(&mut self, tx: mpsc::Sender<Reading>) {
        let mut pacer = self.sampler.pacer(&self.handle);
        debug!(
            interval_ms = self.sampler.period().as_millis(),
            "Starting detector"
        );

        loop {
            tokio::select! {
                pace = pacer.next() => {
                    if pace == Pace::Stop {
                        break;
                    }
                    let Some(reading) = self.sampler.tick(&mut self.session) else {
                        continue;
                    };
                    if tx.send(reading).await.is_err() {
                        debug!("Reading channel closed, stopping detector");
                        break;
                    }
                }
                Some(command) = self.commands.recv() => self.apply(command),
            }
        }

        debug!("Detector stopped");
    }

    fn apply(&mut self, command: Command) {
        // A dropped reply means the caller gave up; the command still applies.
        match command {
            Command::Retry(reply) => {
                let status = self.retry().clone();
                let _ = reply.send(status);
            }
            Command::FavoriteCurrent(reply) => {
                let sample = self.current().clone();
                let result = self.favorites.add(sample.clone()).map(|added| (sample, added));
                let _ = reply.send(result);
            }
            Command::TogglePause(reply) => {
                let _ = reply.send(self.toggle_pause());
            }
        }
    }

    /// Stop sampling and release the camera.
    pub fn shutdown(&mut self) {
        self.handle.stop();
        self.session.teardown();
    }
}

/// Sends commands to a detector running [`Detector::run`].
///
/// Each call waits for the detector to apply the command, so it only
/// completes while `run` is being polled.
#[derive(Debug, Clone)]
pub struct DetectorControl {
    tx: mpsc::Sender<Command>,
}

impl DetectorControl {
    /// Re-acquire the camera; returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector has been dropped.
    pub async fn retry(&self) -> Result<CameraStatus> {
        self.request(Command::Retry).await
    }

    /// Save the live color to favorites.
    ///
    /// Returns the saved sample and whether it was new.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector has been dropped or the favorites
    /// can't be persisted.
    pub async fn favorite_current(&self) -> Result<(Sample, bool)> {
        self.request(Command::FavoriteCurrent).await?
    }

    /// Pause or resume sampling; returns whether it is now paused.
    ///
    /// # Errors
    ///
    /// Returns an error if the detector has been dropped.
    pub async fn toggle_pause(&self) -> Result<bool> {
        self.request(Command::TogglePause).await
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, answer) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| Error::internal("detector is gone"))?;
        answer
            .await
            .map_err(|_| Error::internal("detector dropped the command"))
    }
}
