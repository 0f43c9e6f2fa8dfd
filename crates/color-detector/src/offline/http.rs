//! Request and response types seen by the offline boundary.

use async_trait::async_trait;
use url::Url;

use crate::error::{Error, Result};

/// How a request was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// A top-level page navigation.
    Navigate,
    /// A same-origin subresource.
    #[default]
    SameOrigin,
    /// A cross-origin request with CORS.
    Cors,
    /// A cross-origin request without CORS.
    NoCors,
}

/// An intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute request URL.
    pub url: Url,
    /// How the request was initiated.
    pub mode: RequestMode,
}

impl FetchRequest {
    /// Build a subresource request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `url` is not absolute.
    pub fn get(url: &str) -> Result<Self> {
        Ok(Self {
            url: parse_url(url)?,
            mode: RequestMode::SameOrigin,
        })
    }

    /// Build a navigation request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `url` is not absolute.
    pub fn navigate(url: &str) -> Result<Self> {
        Ok(Self {
            url: parse_url(url)?,
            mode: RequestMode::Navigate,
        })
    }

    /// Check whether this is a page navigation.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// The key this request is cached under: the URL without its fragment.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }
}

/// The kind of response, mirroring how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Same-origin response.
    #[default]
    Basic,
    /// Cross-origin response with CORS.
    Cors,
    /// Cross-origin response without CORS; body and status hidden.
    Opaque,
    /// Network error.
    Error,
}

/// A response from the network or the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// How the response was obtained.
    pub response_type: ResponseType,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// A `200 OK` same-origin response.
    #[must_use]
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            response_type: ResponseType::Basic,
            content_type: Some(content_type.to_string()),
            body: body.into(),
        }
    }

    /// A same-origin response with the given status and an empty body.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self {
            status,
            response_type: ResponseType::Basic,
            content_type: None,
            body: Vec::new(),
        }
    }

    /// Check for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check whether this response may be stored opportunistically:
    /// exactly `200` and same-origin.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.response_type == ResponseType::Basic
    }
}

/// The network behind the offline boundary.
#[async_trait]
pub trait Network: Send + Sync {
    /// Perform the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] when the network is unreachable. A response
    /// with an error status is not an error.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

pub(crate) fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|source| Error::InvalidUrl {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_drops_fragment() {
        let request = FetchRequest::get("https://app.local/icons.png?v=2#top").unwrap();
        assert_eq!(request.cache_key(), "https://app.local/icons.png?v=2");
    }

    #[test]
    fn test_navigation_mode() {
        assert!(FetchRequest::navigate("https://app.local/").unwrap().is_navigation());
        assert!(!FetchRequest::get("https://app.local/").unwrap().is_navigation());
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            FetchRequest::get("/icons.png"),
            Err(Error::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_cacheable() {
        assert!(FetchResponse::ok("text/html", "hi").is_cacheable());
        assert!(!FetchResponse::status(404).is_cacheable());
        assert!(!FetchResponse::status(204).is_cacheable());

        let mut opaque = FetchResponse::ok("image/png", vec![1, 2]);
        opaque.response_type = ResponseType::Opaque;
        assert!(!opaque.is_cacheable());
    }

    #[test]
    fn test_is_success() {
        assert!(FetchResponse::status(204).is_success());
        assert!(!FetchResponse::status(500).is_success());
    }
}
