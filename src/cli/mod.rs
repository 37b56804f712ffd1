pub mod commands;

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "rss2http")]
#[command(about = "Post a random feed item to a webhook", long_about = None)]
pub struct Cli {
    /// Http url of the rss feed
    #[arg(long, value_name = "URL")]
    pub rss: Option<String>,

    /// Http url to post the rendered item to
    #[arg(long, value_name = "URL")]
    pub post: Option<String>,

    /// Template rendered with the picked item, e.g. '{"text": "{{ .Title | json }}"}'
    #[arg(long, value_name = "TEMPLATE")]
    pub tpl: Option<String>,

    /// Cache directory (default: ./tmp)
    #[arg(long, value_name = "DIR")]
    pub cache: Option<PathBuf>,

    /// Config file (default: ~/.config/rss2http/config.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for picking the item; time-based when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the rendered body instead of posting it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Overlay the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(rss) = &self.rss {
            config.rss = rss.clone();
        }
        if let Some(post) = &self.post {
            config.post = post.clone();
        }
        if let Some(tpl) = &self.tpl {
            config.tpl = tpl.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache = cache.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}
