//! Copying color codes to the system clipboard.
//!
//! [`Copier`] writes a sample's hex code and keeps a short-lived "copied"
//! acknowledgement, cleared [`COPIED_FEEDBACK`] after the last copy.

use std::time::{Duration, Instant};

use clipboard_rs::{Clipboard, ClipboardContext};
use tracing::debug;

use crate::color::Sample;
use crate::error::{Error, Result};

/// How long a copy stays acknowledged.
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

/// Somewhere text can be copied to.
pub trait ClipboardWriter: Send {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Clipboard`] if the clipboard can't be written.
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The platform clipboard.
///
/// A context is opened per write, so the struct holds no platform handle.
/// On X11 the contents are served by this process and disappear when it
/// exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let ctx = ClipboardContext::new().map_err(|e| Error::clipboard(e.to_string()))?;
        ctx.set_text(text.to_string())
            .map_err(|e| Error::clipboard(e.to_string()))
    }
}

/// Copies samples and tracks the "copied" acknowledgement.
#[derive(Debug)]
pub struct Copier<W> {
    writer: W,
    copied_at: Option<Instant>,
}

impl<W: ClipboardWriter> Copier<W> {
    /// Wrap a clipboard writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            copied_at: None,
        }
    }

    /// Copy the sample's hex code.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard can't be written; the previous
    /// acknowledgement is left as it was.
    pub fn copy(&mut self, sample: &Sample) -> Result<()> {
        self.copy_at(sample, Instant::now())
    }

    /// Copy the sample's hex code, stamping the acknowledgement with `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard can't be written.
    pub fn copy_at(&mut self, sample: &Sample, now: Instant) -> Result<()> {
        self.writer.write_text(sample.hex())?;
        debug!(hex = sample.hex(), "Copied to clipboard");
        self.copied_at = Some(now);
        Ok(())
    }

    /// Check whether the last copy is still acknowledged.
    #[must_use]
    pub fn is_copied(&self) -> bool {
        self.is_copied_at(Instant::now())
    }

    /// Check whether the last copy is acknowledged at `now`.
    #[must_use]
    pub fn is_copied_at(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPIED_FEEDBACK)
    }

    /// The underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }
}
