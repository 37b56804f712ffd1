use std::sync::Arc;

use crate::app::error::{Result, Rss2HttpError};
use crate::cache::FileCache;
use crate::config::Config;
use crate::fetcher::http_fetcher::{build_client, HttpFetcher};
use crate::fetcher::Downloader;
use crate::normalizer::Normalizer;
use crate::poster::{HttpPoster, Poster};
use crate::template::ItemTemplate;

/// Everything one run needs, built from a resolved [`Config`].
pub struct AppContext {
    pub config: Config,
    pub cache: FileCache,
    pub downloader: Arc<dyn Downloader + Send + Sync>,
    pub poster: Arc<dyn Poster + Send + Sync>,
    pub normalizer: Normalizer,
}

impl AppContext {
    /// Wires the HTTP downloader and poster over one shared client.
    pub fn new(config: Config) -> Result<Self> {
        let client = build_client(&config.http)?;
        let downloader: Arc<dyn Downloader + Send + Sync> =
            Arc::new(HttpFetcher::new(client.clone()));
        let poster: Arc<dyn Poster + Send + Sync> =
            Arc::new(HttpPoster::new(client, config.post.clone()));

        Ok(Self::with_transport(config, downloader, poster))
    }

    pub fn with_transport(
        config: Config,
        downloader: Arc<dyn Downloader + Send + Sync>,
        poster: Arc<dyn Poster + Send + Sync>,
    ) -> Self {
        let cache = FileCache::new(config.cache.clone());

        Self {
            config,
            cache,
            downloader,
            poster,
            normalizer: Normalizer::new(),
        }
    }

    pub fn compile_template(&self) -> Result<ItemTemplate> {
        ItemTemplate::compile(&self.config.tpl).map_err(Rss2HttpError::from)
    }
}
