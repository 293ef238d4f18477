// THEORY:
// The `fetcher` module is the only component that touches the network. Its
// contract is narrow: one URL in, one decoded image out, or a typed,
// recoverable error that tells the caller which stage failed. The fetcher
// never logs and never retries; reporting a skip is the calling worker's
// job, and it must cost exactly one log line per failure.
//
// The response body is fully read into memory and the connection released
// before decoding starts, so a slow decode can never pin a network resource.

use image::DynamicImage;
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// The ways fetching a single URL can fail. All variants are recoverable:
/// the URL is skipped and the pipeline moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connect, timeout, or body-read failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status code.
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    /// The body was not a decodable raster image.
    #[error("image decode failure: {0}")]
    Decode(#[from] image::ImageError),
}

/// Retrieves raw image bytes over HTTP and decodes them into a
/// pixel-addressable image. One instance is shared by all fetch workers so
/// they draw from a single connection pool.
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Performs the GET, checks the status, reads the body, and decodes it
    /// with the standard raster decoders (JPEG, PNG, and the rest of the
    /// `image` crate's default set).
    pub async fn fetch(&self, url: &str) -> Result<DynamicImage, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(image::load_from_memory(&body)?)
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchError, ImageFetcher};

    #[tokio::test]
    async fn malformed_url_is_a_transport_error() {
        let fetcher = ImageFetcher::new();
        let result = fetcher.fetch("https://malformed url").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let fetcher = ImageFetcher::new();
        // Reserved port with nothing listening; the connection is refused.
        let result = fetcher.fetch("http://127.0.0.1:1/image.png").await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
