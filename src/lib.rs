//! # rss2http
//!
//! Picks a random item from an RSS/podcast feed and posts it to a webhook.
//!
//! ## Architecture
//!
//! One run flows straight through:
//!
//! ```text
//! Cache/Fetcher → Normalizer → Selector → Template → Poster
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! rss2http --rss https://example.com/feed.xml \
//!          --post https://hooks.example.com/abc \
//!          --tpl '{"text": "{{ .Title | json }} {{ .Link }}"}'
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the cache, downloader, normalizer and
/// poster for one run.
pub mod app;

/// On-disk feed cache keyed by the SHA-256 of the feed URL.
pub mod cache;

/// Command-line flags and the run sequence.
pub mod cli;

/// Defaults, the optional TOML config file, and flag overrides.
pub mod config;

/// Core domain model: [`FeedItem`](domain::FeedItem).
pub mod domain;

/// Downloading with a cache in front.
///
/// - [`Downloader`](fetcher::Downloader): async trait for fetching a URL
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`fetch_cached_or_download`](fetcher::fetch_cached_or_download): cache-or-download
pub mod fetcher;

/// Feed parsing into [`FeedItem`](domain::FeedItem)s.
pub mod normalizer;

/// Webhook delivery.
pub mod poster;

/// Random item selection.
pub mod selector;

/// `{{ .Field }}` templates rendered with one item.
pub mod template;
