pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::{Result, Rss2HttpError};
use crate::cache::{CacheReader, CacheWriter};

#[async_trait]
pub trait Downloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    /// Served from the cache without touching the network
    Cache,
    /// Downloaded during this run
    Network,
}

#[derive(Debug)]
pub struct Fetched {
    pub body: Vec<u8>,
    pub source: FetchSource,
    /// Set when the download succeeded but storing it in the cache failed.
    pub cache_error: Option<Rss2HttpError>,
}

/// Returns the cached body for `url` if the reader has one, otherwise downloads
/// it and hands it to the writer.
///
/// A cache hit is returned as-is, empty or not. Only a download failure is an
/// `Err`; a failed cache write still yields the downloaded body, with the write
/// error in [`Fetched::cache_error`].
pub async fn fetch_cached_or_download<R, W, D>(
    url: &str,
    reader: &R,
    writer: &W,
    downloader: &D,
) -> Result<Fetched>
where
    R: CacheReader + ?Sized,
    W: CacheWriter + ?Sized,
    D: Downloader + ?Sized,
{
    match reader.read(url) {
        Ok(body) => {
            tracing::debug!("Cache hit for {}", url);
            return Ok(Fetched {
                body,
                source: FetchSource::Cache,
                cache_error: None,
            });
        }
        Err(e) => tracing::debug!("Cache miss for {}: {}", url, e),
    }

    let body = downloader.download(url).await?;
    let cache_error = writer.write(url, &body).err();

    Ok(Fetched {
        body,
        source: FetchSource::Network,
        cache_error,
    })
}
