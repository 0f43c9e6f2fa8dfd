//! Video frames and the sources that produce them.
//!
//! A [`Frame`] is an RGB8 raster at the source's native resolution. The
//! sampler only ever reads one pixel from it, so there is no format
//! negotiation beyond "three bytes per pixel, row-major".

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::debug;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// An RGB8 raster captured from a frame source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap a row-major RGB8 buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFrame`] if either dimension is zero or the
    /// buffer length is not `width * height * 3`.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidFrame(format!(
                "frame has no pixels ({width}x{height})"
            )));
        }

        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(Error::InvalidFrame(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a frame filled with a single color.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn solid(width: u32, height: u32, rgb: Rgb) -> Result<Self> {
        let pixels = width as usize * height as usize;
        let data = [rgb.r, rgb.g, rgb.b].repeat(pixels);
        Self::from_rgb8(width, height, data)
    }

    /// Frame width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read the pixel at `(x, y)`, or `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        let px = self.data.get(offset..offset + 3)?;
        Some(Rgb::new(px[0], px[1], px[2]))
    }

    /// Coordinates of the center pixel: `(floor(w/2), floor(h/2))`.
    #[must_use]
    pub fn center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }

    /// Read the center pixel.
    #[must_use]
    pub fn center_pixel(&self) -> Rgb {
        let (x, y) = self.center();
        // Dimensions are validated non-zero, so the center is always in bounds.
        self.pixel(x, y).unwrap_or_default()
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// A live source of frames, such as a camera stream.
///
/// The session that acquired the source owns it exclusively; `stop` releases
/// the underlying device and must be safe to call more than once.
pub trait FrameSource: Send {
    /// Human-readable name of the source.
    fn name(&self) -> String;

    /// Native resolution as `(width, height)`.
    fn resolution(&self) -> (u32, u32);

    /// Capture the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be read or decoded.
    fn grab(&mut self) -> Result<Frame>;

    /// Stop all tracks and release the device.
    fn stop(&mut self);

    /// Check whether the source has been stopped.
    fn is_stopped(&self) -> bool;
}

/// A frame source that replays one still image.
///
/// Useful for sampling a photo from disk and for exercising the sampler
/// without a camera.
#[derive(Debug, Clone)]
pub struct StillImageSource {
    name: String,
    frame: Frame,
    stopped: bool,
}

impl StillImageSource {
    /// Create a source that always yields `frame`.
    #[must_use]
    pub fn new(name: impl Into<String>, frame: Frame) -> Self {
        Self {
            name: name.into(),
            frame,
            stopped: false,
        }
    }

    /// Decode an image file (PNG or JPEG) into a still source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageDecode`] if the file cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Decoding still image {}", path.display());

        let image = image::open(path)
            .map_err(|source| Error::ImageDecode {
                path: PathBuf::from(path),
                source,
            })?
            .to_rgb8();

        Ok(Self::new(path.display().to_string(), Frame::from(image)))
    }
}

impl FrameSource for StillImageSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn resolution(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }

    fn grab(&mut self) -> Result<Frame> {
        if self.stopped {
            return Err(Error::CameraNotReady);
        }
        Ok(self.frame.clone())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }
}
