//! On-disk cache of raw feed bodies.
//!
//! Each source URL maps to one file inside the cache directory, named by the
//! hex SHA-256 of the URL. Entries are never expired or rewritten on a hit.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::app::Result;

/// Derives a cache key from a URL.
pub trait UrlHasher {
    fn hash(&self, url: &str) -> String;
}

impl<F> UrlHasher for F
where
    F: Fn(&str) -> String,
{
    fn hash(&self, url: &str) -> String {
        self(url)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl UrlHasher for Sha256Hasher {
    fn hash(&self, url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Returns the cached bytes for a URL, or an error on a miss.
pub trait CacheReader {
    fn read(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F> CacheReader for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn read(&self, url: &str) -> Result<Vec<u8>> {
        self(url)
    }
}

/// Stores the bytes downloaded for a URL.
pub trait CacheWriter {
    fn write(&self, url: &str, contents: &[u8]) -> Result<()>;
}

impl<F> CacheWriter for F
where
    F: Fn(&str, &[u8]) -> Result<()>,
{
    fn write(&self, url: &str, contents: &[u8]) -> Result<()> {
        self(url, contents)
    }
}

#[derive(Debug, Clone)]
pub struct FileCache<H = Sha256Hasher> {
    dir: PathBuf,
    hasher: H,
}

impl FileCache<Sha256Hasher> {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_hasher(dir, Sha256Hasher)
    }
}

impl<H: UrlHasher> FileCache<H> {
    pub fn with_hasher(dir: impl Into<PathBuf>, hasher: H) -> Self {
        Self {
            dir: dir.into(),
            hasher,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(self.hasher.hash(url))
    }
}

impl<H: UrlHasher> CacheReader for FileCache<H> {
    fn read(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.path_for(url);
        let contents = fs::read(&path)?;
        tracing::debug!("Read {} cached bytes from {}", contents.len(), path.display());
        Ok(contents)
    }
}

impl<H: UrlHasher> CacheWriter for FileCache<H> {
    fn write(&self, url: &str, contents: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(url);
        fs::write(&path, contents)?;
        tracing::debug!("Cached {} bytes at {}", contents.len(), path.display());
        Ok(())
    }
}
