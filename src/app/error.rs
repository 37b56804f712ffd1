use thiserror::Error;

use crate::template::TemplateError;

#[derive(Error, Debug)]
pub enum Rss2HttpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Status error: {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Read body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

pub type Result<T> = std::result::Result<T, Rss2HttpError>;

/// Failure of one stage of a run. `main` prints these with their cause chain.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Error while compiling template")]
    Template(#[source] Rss2HttpError),

    #[error("Error while downloading/saving {url}")]
    Fetch {
        url: String,
        #[source]
        source: Rss2HttpError,
    },

    #[error("Empty response returned from {0}")]
    EmptyResponse(String),

    #[error("Error while parsing feed {url}")]
    Parse {
        url: String,
        #[source]
        source: Rss2HttpError,
    },

    #[error("Feed {0} contains no items")]
    NoItems(String),

    #[error("Error while rendering template")]
    Render(#[source] Rss2HttpError),

    #[error("Error while posting data to {url}")]
    Post {
        url: String,
        #[source]
        source: Rss2HttpError,
    },
}
