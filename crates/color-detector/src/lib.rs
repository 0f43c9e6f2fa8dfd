//! `color-detector` - Name the color at the center of a camera frame
//!
//! This library samples the center pixel of a live camera (or a still image)
//! on a fixed interval, names the nearest color, keeps a short history and a
//! persisted favorites list, and carries the offline asset cache that lets
//! the app shell load without a network.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod camera;
pub mod cli;
pub mod clipboard;
pub mod color;
pub mod config;
pub mod detector;
pub mod error;
pub mod favorites;
pub mod frame;
pub mod history;
pub mod install;
pub mod logging;
pub mod naming;
pub mod offline;
pub mod sampler;
pub mod storage;
#[cfg(feature = "webcam")]
pub mod webcam;

pub use camera::{CameraSession, CameraStatus};
pub use color::{Rgb, Sample};
pub use config::Config;
pub use detector::{Detector, DetectorControl};
pub use error::{Error, Result};
pub use favorites::Favorites;
pub use history::History;
pub use logging::init_logging;
pub use sampler::{ColorSampler, Pacer, Reading, SamplerHandle};
pub use storage::{KeyValueStore, MemoryStore, Storage, StorageStats};
