use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rss2http::app::AppContext;
use rss2http::cli::{commands, Cli};
use rss2http::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for --dry-run output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let ctx = AppContext::new(config)?;
    let report = commands::post_random_item(&ctx, cli.dry_run).await?;

    if report.response.is_some() {
        tracing::info!("Posted {} ({:?})", report.item.display_title(), report.source);
    }
    Ok(())
}
