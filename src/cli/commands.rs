use std::io::Write;

use crate::app::{AppContext, RunError};
use crate::domain::FeedItem;
use crate::fetcher::{fetch_cached_or_download, FetchSource};
use crate::selector::{pick, rng_for};

/// What a successful run did.
#[derive(Debug)]
pub struct RunReport {
    pub item: FeedItem,
    pub source: FetchSource,
    /// Webhook response body; `None` on a dry run.
    pub response: Option<Vec<u8>>,
}

/// Fetch the feed (cached or not), pick one item, render it and post it.
pub async fn post_random_item(ctx: &AppContext, dry_run: bool) -> Result<RunReport, RunError> {
    let template = ctx.compile_template().map_err(RunError::Template)?;
    let url = ctx.config.rss.as_str();

    let fetched = fetch_cached_or_download(url, &ctx.cache, &ctx.cache, ctx.downloader.as_ref())
        .await
        .map_err(|source| RunError::Fetch {
            url: url.to_string(),
            source,
        })?;

    if let Some(e) = &fetched.cache_error {
        tracing::warn!(
            "Could not cache {} in {}: {}",
            url,
            ctx.cache.dir().display(),
            e
        );
    }

    if fetched.body.is_empty() {
        return Err(RunError::EmptyResponse(url.to_string()));
    }

    let items = ctx
        .normalizer
        .normalize(&fetched.body)
        .map_err(|source| RunError::Parse {
            url: url.to_string(),
            source,
        })?;
    tracing::info!("Parsed {} items from {:?} {}", items.len(), fetched.source, url);

    let mut rng = rng_for(ctx.config.seed);
    let item = pick(&items, &mut rng)
        .cloned()
        .ok_or_else(|| RunError::NoItems(url.to_string()))?;
    tracing::info!("Picked {}", item.display_title());

    let body = template.render(&item).map_err(RunError::Render)?;

    if dry_run {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(&body)
            .and_then(|_| stdout.write_all(b"\n"))
            .map_err(|e| RunError::Render(e.into()))?;
        return Ok(RunReport {
            item,
            source: fetched.source,
            response: None,
        });
    }

    let response = ctx
        .poster
        .post(body)
        .await
        .map_err(|source| RunError::Post {
            url: ctx.poster.target().to_string(),
            source,
        })?;

    Ok(RunReport {
        item,
        source: fetched.source,
        response: Some(response),
    })
}
