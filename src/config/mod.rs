//! Configuration for a run.
//!
//! Values come from, in increasing precedence: built-in defaults, a TOML file
//! (`--config <file>`, or `~/.config/rss2http/config.toml` when present), and
//! command-line flags.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_RSS: &str = "https://feed.pippa.io/public/shows/5aeff6d96eb47cc259946df2";
pub const DEFAULT_POST: &str = "https://127.0.0.1:9000/test";
pub const DEFAULT_CACHE_DIR: &str = "tmp";
pub const DEFAULT_TEMPLATE: &str = r##"{
	"channel": "#kerekasztal",
	"username": "webhookbot",
	"text": "Listen now to <a href='{{ .Link }}'>{{ .Title | json }}</a>, published {{ .Published }}",
	"icon_emoji": ":ghost:"
}"##;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed to pick an item from
    pub rss: String,
    /// Webhook receiving the rendered item
    pub post: String,
    /// Body template, see [`crate::template`]
    pub tpl: String,
    /// Directory holding cached feed bodies
    pub cache: PathBuf,
    /// Fixed seed for item selection; time-based when unset
    pub seed: Option<u64>,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rss: DEFAULT_RSS.to_string(),
            post: DEFAULT_POST.to_string(),
            tpl: DEFAULT_TEMPLATE.to_string(),
            cache: PathBuf::from(DEFAULT_CACHE_DIR),
            seed: None,
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Idle connections kept per host (default: 10)
    pub max_idle_connections: usize,
    /// Seconds before an idle connection is closed (default: 30)
    pub idle_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_idle_connections: 10,
            idle_timeout_secs: 30,
            user_agent: concat!("rss2http/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the default path is
    /// used if a file is there; otherwise the built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `~/.config/rss2http/config.toml` or the platform equivalent.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rss2http").join("config.toml"))
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
