//! Error types for color-detector.
//!
//! This module defines all error types used throughout the color-detector crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for color-detector operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Camera Errors ===
    /// The user or platform refused access to the camera.
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// The camera could not be acquired or read for any other reason.
    #[error("camera device error: {0}")]
    CameraDevice(String),

    /// No camera stream is currently bound.
    #[error("camera is not ready")]
    CameraNotReady,

    // === Color Errors ===
    /// A string could not be parsed as a `#rrggbb` color.
    #[error("invalid hex color: {value}")]
    InvalidHex {
        /// The rejected input.
        value: String,
    },

    /// A frame had no pixels or a buffer that doesn't match its dimensions.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// An image file could not be decoded into a frame.
    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        /// Path to the image file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: image::ImageError,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A persisted payload could not be parsed.
    #[error("failed to parse stored value '{key}': {message}")]
    StorageParse {
        /// Storage key that held the payload.
        key: String,
        /// Description of the parse failure.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Offline Cache Errors ===
    /// Neither the network nor the cache could answer a request.
    #[error("no cached response for {url}")]
    CacheMiss {
        /// URL of the request.
        url: String,
    },

    /// A network fetch failed.
    #[error("network error: {0}")]
    Network(String),

    /// A URL could not be parsed.
    #[error("invalid URL '{value}': {source}")]
    InvalidUrl {
        /// The rejected input.
        value: String,
        /// The underlying error.
        #[source]
        source: url::ParseError,
    },

    // === Clipboard Errors ===
    /// The system clipboard could not be written.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for color-detector operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new camera device error.
    #[must_use]
    pub fn camera_device(message: impl Into<String>) -> Self {
        Self::CameraDevice(message.into())
    }

    /// Create a new network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new clipboard error.
    #[must_use]
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Create an invalid hex error.
    #[must_use]
    pub fn invalid_hex(value: impl Into<String>) -> Self {
        Self::InvalidHex {
            value: value.into(),
        }
    }

    /// Create a cache miss error.
    #[must_use]
    pub fn cache_miss(url: impl Into<String>) -> Self {
        Self::CacheMiss { url: url.into() }
    }

    /// Check if this error is a camera permission issue.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Check if this error is an offline cache miss.
    #[must_use]
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::CameraNotReady;
        assert_eq!(err.to_string(), "camera is not ready");

        let err = Error::camera_device("device busy");
        assert_eq!(err.to_string(), "camera device error: device busy");
    }

    #[test]
    fn test_error_is_permission_error() {
        let err = Error::PermissionDenied("NotAllowedError".to_string());
        assert!(err.is_permission_error());
        assert!(!Error::CameraNotReady.is_permission_error());
    }

    #[test]
    fn test_error_is_cache_miss() {
        let err = Error::cache_miss("https://app.local/missing.png");
        assert!(err.is_cache_miss());
        assert!(err.to_string().contains("/missing.png"));
        assert!(!Error::network("offline").is_cache_miss());
    }

    #[test]
    fn test_clipboard_error_display() {
        let err = Error::clipboard("no display");
        assert_eq!(err.to_string(), "clipboard error: no display");
    }

    #[test]
    fn test_invalid_hex_display() {
        let err = Error::invalid_hex("#12345");
        assert_eq!(err.to_string(), "invalid hex color: #12345");
    }

    #[test]
    fn test_storage_parse_display() {
        let err = Error::StorageParse {
            key: "colorDetectorFavorites".to_string(),
            message: "expected value".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("colorDetectorFavorites"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "interval_ms must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("interval_ms"));
    }

    #[test]
    fn test_invalid_url_display() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = Error::InvalidUrl {
            value: "not a url".to_string(),
            source,
        };
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
