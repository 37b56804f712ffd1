use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::app::{Result, Rss2HttpError};
use crate::poster::Poster;

pub struct HttpPoster {
    client: Client,
    url: String,
}

impl HttpPoster {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Poster for HttpPoster {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>> {
        tracing::info!("Posting {} bytes to {}", body.len(), self.url);
        let response = self
            .client
            .post(self.url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Rss2HttpError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(Rss2HttpError::BodyRead)?;
        tracing::debug!(
            "Response from {}: {}",
            self.url,
            String::from_utf8_lossy(&bytes)
        );

        Ok(bytes.to_vec())
    }

    fn target(&self) -> &str {
        &self.url
    }
}
