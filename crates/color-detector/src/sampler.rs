//! Periodic center-pixel sampling.
//!
//! [`ColorSampler::sample_frame`] turns one frame into a [`Reading`];
//! [`ColorSampler::run`] drives it from a camera session on a fixed
//! interval paced by a [`Pacer`]. The loop is controlled through a cloneable
//! [`SamplerHandle`]:
//! pausing stops sampling without releasing the camera, resuming restarts the
//! timer from now with no catch-up, and stopping ends the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::camera::CameraSession;
use crate::color::{Rgb, Sample};
use crate::frame::Frame;
use crate::history::History;
use crate::naming::ColorNamer;

/// Default interval between samples.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// One sampler tick's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// The raw center pixel.
    pub rgb: Rgb,
    /// The named sample.
    pub sample: Sample,
    /// Whether the sample was added to history (false for a repeat of the head).
    pub added_to_history: bool,
}

/// Run state of the sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerState {
    /// Sampling on every tick.
    #[default]
    Running,
    /// Timer stopped; the camera stays bound.
    Paused,
    /// The loop exits.
    Stopped,
}

/// A handle to control a running sampler from other tasks.
#[derive(Debug, Clone)]
pub struct SamplerHandle {
    state: Arc<watch::Sender<SamplerState>>,
}

impl SamplerHandle {
    /// Create a handle in the `Running` state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SamplerState::Running);
        Self {
            state: Arc::new(tx),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SamplerState {
        *self.state.borrow()
    }

    /// Check whether sampling is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state() == SamplerState::Paused
    }

    /// Pause sampling.
    pub fn pause(&self) {
        self.transition(SamplerState::Paused);
    }

    /// Resume sampling.
    pub fn resume(&self) {
        self.transition(SamplerState::Running);
    }

    /// Flip between paused and running; returns whether it is now paused.
    pub fn toggle_pause(&self) -> bool {
        if self.is_paused() {
            self.resume();
            false
        } else {
            self.pause();
            true
        }
    }

    /// Signal the loop to exit.
    pub fn stop(&self) {
        self.state.send_replace(SamplerState::Stopped);
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.state() == SamplerState::Stopped
    }

    fn transition(&self, next: SamplerState) {
        // Stop is final.
        self.state.send_if_modified(|state| {
            if *state == SamplerState::Stopped || *state == next {
                return false;
            }
            *state = next;
            true
        });
    }

    fn subscribe(&self) -> watch::Receiver<SamplerState> {
        self.state.subscribe()
    }
}

impl Default for SamplerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns frames into named samples and tracks the current color and history.
pub struct ColorSampler {
    namer: Arc<dyn ColorNamer>,
    history: History,
    current: Sample,
    period: Duration,
}

impl std::fmt::Debug for ColorSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorSampler")
            .field("history", &self.history)
            .field("current", &self.current)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl ColorSampler {
    /// Create a sampler.
    #[must_use]
    pub fn new(namer: Arc<dyn ColorNamer>, history: History, period: Duration) -> Self {
        Self {
            namer,
            history,
            current: Sample::default(),
            period,
        }
    }

    /// The latest sample, or the `Waiting...` placeholder.
    #[must_use]
    pub fn current(&self) -> &Sample {
        &self.current
    }

    /// Recent distinct samples, newest first.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Interval between ticks.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sample the center pixel of `frame`.
    ///
    /// Always updates the current color; only updates history when the hex
    /// differs from the history head.
    pub fn sample_frame(&mut self, frame: &Frame) -> Reading {
        let rgb = frame.center_pixel();
        let sample = Sample::new(rgb, self.namer.name(rgb));
        trace!(hex = sample.hex(), name = sample.name(), "Sampled center pixel");

        self.current = sample.clone();
        let added_to_history = self.history.push(sample.clone());

        Reading {
            rgb,
            sample,
            added_to_history,
        }
    }

    /// Sample the session's current frame, if the camera is ready.
    ///
    /// A failed frame grab is logged and yields `None`.
    pub fn tick(&mut self, session: &mut CameraSession) -> Option<Reading> {
        if !session.status().is_ready() {
            trace!(status = %session.status(), "Camera not ready, skipping tick");
            return None;
        }

        match session.grab() {
            Ok(frame) => Some(self.sample_frame(&frame)),
            Err(e) => {
                warn!(error = %e, "Failed to grab frame");
                None
            }
        }
    }

    /// A pacer for this sampler's period, following `handle`.
    #[must_use]
    pub fn pacer(&self, handle: &SamplerHandle) -> Pacer {
        Pacer::new(handle, self.period)
    }

    /// Sample `session` every period until stopped.
    ///
    /// Ticks are skipped while the session is not `Ready` or the handle is
    /// paused. The loop ends when the handle is stopped or the receiver is
    /// dropped.
    pub async fn run(
        &mut self,
        session: &mut CameraSession,
        handle: &SamplerHandle,
        tx: mpsc::Sender<Reading>,
    ) {
        let mut pacer = self.pacer(handle);

        debug!(
            interval_ms = self.period.as_millis(),
            "Starting color sampler"
        );

        while pacer.next().await == Pace::Tick {
            let Some(reading) = self.tick(session) else {
                continue;
            };
            if tx.send(reading).await.is_err() {
                debug!("Reading channel closed, stopping sampler");
                break;
            }
        }

        debug!("Color sampler stopped");
    }
}

/// What a [`Pacer`] decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    /// Time to sample.
    Tick,
    /// The handle was stopped.
    Stop,
}

/// Tick timer for a sampling loop that honors a [`SamplerHandle`].
///
/// No ticks are produced while paused; leaving a pause restarts the timer
/// from now, so a long pause produces no backlog. [`Pacer::next`] is cancel
/// safe and can sit in a `select!` next to other work.
#[derive(Debug)]
pub struct Pacer {
    state_rx: watch::Receiver<SamplerState>,
    ticker: Interval,
    period: Duration,
    paused: bool,
}

impl Pacer {
    fn new(handle: &SamplerHandle, period: Duration) -> Self {
        Self {
            state_rx: handle.subscribe(),
            ticker: ticker(period),
            period,
            paused: false,
        }
    }

    /// Wait for the next tick, or for the handle to stop.
    pub async fn next(&mut self) -> Pace {
        loop {
            let state = *self.state_rx.borrow_and_update();
            match state {
                SamplerState::Stopped => return Pace::Stop,
                SamplerState::Paused => {
                    if !self.paused {
                        trace!("Sampler paused");
                        self.paused = true;
                    }
                    if self.state_rx.changed().await.is_err() {
                        return Pace::Stop;
                    }
                    continue;
                }
                SamplerState::Running => {
                    if self.paused {
                        self.paused = false;
                        self.ticker = ticker(self.period);
                    }
                }
            }

            tokio::select! {
                _ = self.ticker.tick() => return Pace::Tick,
                changed = self.state_rx.changed() => {
                    if changed.is_err() {
                        return Pace::Stop;
                    }
                }
            }
        }
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
