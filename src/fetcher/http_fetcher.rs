use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::app::{Result, Rss2HttpError};
use crate::config::HttpConfig;
use crate::fetcher::Downloader;

/// Builds the client shared by the downloader and the poster for one run.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .pool_max_idle_per_host(config.max_idle_connections)
        .pool_idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .gzip(true)
        .brotli(true)
        .user_agent(config.user_agent.as_str())
        .build()?;

    Ok(client)
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for HttpFetcher {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::info!("Downloading {}", url);
        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(Rss2HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(Rss2HttpError::BodyRead)?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}
