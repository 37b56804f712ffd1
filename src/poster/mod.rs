pub mod http_poster;

pub use http_poster::HttpPoster;

use async_trait::async_trait;

use crate::app::Result;

/// Delivers a rendered body and returns the receiver's response body.
#[async_trait]
pub trait Poster {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>>;

    /// Where bodies are delivered, for diagnostics.
    fn target(&self) -> &str;
}
