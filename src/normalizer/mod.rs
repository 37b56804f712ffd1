use serde::Deserialize;

use crate::app::{Result, Rss2HttpError};
use crate::domain::FeedItem;

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parses a feed body into items in document order.
    ///
    /// RSS `pubDate` and JSON Feed `date_published` are copied byte for byte.
    /// Atom dates keep their offset; a `Z` suffix is written as `+00:00`.
    pub fn normalize(&self, body: &[u8]) -> Result<Vec<FeedItem>> {
        if body.trim_ascii_start().starts_with(b"{") {
            let feed: JsonFeed = serde_json::from_slice(body)
                .map_err(|e| Rss2HttpError::FeedParse(format!("JSON Feed: {e}")))?;
            return Ok(Self::from_json_feed(feed));
        }

        let rss_err = match rss::Channel::read_from(body) {
            Ok(channel) => return Ok(Self::from_rss(&channel)),
            Err(e) => e,
        };
        tracing::debug!("Not an RSS document ({}), trying Atom", rss_err);

        match atom_syndication::Feed::read_from(body) {
            Ok(feed) => Ok(Self::from_atom(&feed)),
            Err(atom_err) => Err(Rss2HttpError::FeedParse(format!(
                "not RSS ({rss_err}) or Atom ({atom_err})"
            ))),
        }
    }

    fn from_rss(channel: &rss::Channel) -> Vec<FeedItem> {
        channel
            .items()
            .iter()
            .map(|item| {
                let link = item
                    .link()
                    .or_else(|| item.guid().filter(|g| g.is_permalink()).map(|g| g.value()))
                    .unwrap_or_default();
                let published = item
                    .pub_date()
                    .or_else(|| {
                        item.dublin_core_ext()
                            .and_then(|dc| dc.dates().first())
                            .map(String::as_str)
                    })
                    .unwrap_or_default();

                // The XML reader has already resolved entities; titles are used as-is.
                FeedItem::new(item.title().unwrap_or_default(), link, published)
            })
            .collect()
    }

    fn from_atom(feed: &atom_syndication::Feed) -> Vec<FeedItem> {
        feed.entries()
            .iter()
            .map(|entry| {
                let link = entry
                    .links()
                    .iter()
                    .find(|l| l.rel() == "alternate")
                    .or_else(|| entry.links().first())
                    .map(|l| l.href())
                    .unwrap_or_default();
                let published = entry.published().unwrap_or(entry.updated()).to_rfc3339();

                FeedItem::new(entry.title().as_str(), link, published)
            })
            .collect()
    }

    fn from_json_feed(feed: JsonFeed) -> Vec<FeedItem> {
        feed.items
            .into_iter()
            .map(|item| FeedItem {
                title: item.title.unwrap_or_default(),
                link: item.url.or(item.external_url).unwrap_or_default(),
                published: item
                    .date_published
                    .or(item.date_modified)
                    .unwrap_or_default(),
            })
            .collect()
    }
}

/// The subset of JSON Feed (https://jsonfeed.org) that maps onto [`FeedItem`].
#[derive(Debug, Deserialize)]
struct JsonFeed {
    #[serde(default)]
    items: Vec<JsonFeedItem>,
}

#[derive(Debug, Deserialize)]
struct JsonFeedItem {
    title: Option<String>,
    url: Option<String>,
    external_url: Option<String>,
    date_published: Option<String>,
    date_modified: Option<String>,
}
