//! Local cache for sales CSV files fetched over HTTP(S).
//!
//! Remote files are downloaded once into the cache directory and reused on
//! later loads. The server's `ETag` is stored next to each file; when a
//! `HEAD` request reports a different tag the file is downloaded again.
//! Gzip-compressed bodies are decompressed before they hit the cache.

use crate::config;
use crate::error::{DashboardError, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use reqwest::header::ETAG;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Bytes of the URL digest kept in cache file names (12 hex characters).
const URL_TAG_BYTES: usize = 6;

/// Downloads and caches remote sales CSV files.
pub struct CacheManager {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use cached files only).
    pub offline: bool,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            timeout,
            client: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            let client = Client::builder()
                .timeout(self.timeout)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?;
            self.client = Some(client);
        }
        self.client
            .as_ref()
            .ok_or_else(|| DashboardError::InvalidArgument("HTTP client unavailable".into()))
    }

    /// Local path a remote URL is cached under.
    ///
    /// Uses the last path segment of the URL (query and fragment removed,
    /// a trailing `.gz` stripped) with unsafe characters replaced by `_`,
    /// tagged with a short hash of the full URL so that same-named files
    /// from different sources never share a cache entry, e.g.
    /// `ventas-1a2b3c4d5e6f.csv`.
    pub fn cache_path(&self, url: &str) -> Result<PathBuf> {
        let name = cache_file_name(url)?;
        Ok(self.cache_dir.join(name))
    }

    fn etag_path(local: &Path) -> PathBuf {
        let mut name = local
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".etag");
        local.with_file_name(name)
    }

    fn local_etag(local: &Path) -> Option<String> {
        fs::read_to_string(Self::etag_path(local))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn save_etag(local: &Path, etag: Option<&str>) {
        let path = Self::etag_path(local);
        match etag {
            Some(tag) => {
                let _ = fs::write(path, tag);
            }
            None => {
                let _ = fs::remove_file(path);
            }
        }
    }

    /// Fetch the current `ETag` of a remote file with a `HEAD` request.
    ///
    /// Returns `None` when offline, when the server sends no tag, or when the
    /// server is unreachable.
    pub fn remote_etag(&mut self, url: &str) -> Result<Option<String>> {
        if self.offline {
            return Ok(None);
        }
        let client = self.client()?.clone();
        match client.head(url).send() {
            Ok(resp) => {
                let resp = resp.error_for_status()?;
                Ok(resp
                    .headers()
                    .get(ETAG)
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.to_string()))
            }
            Err(e) => {
                log::warn!("Failed to check {} for changes: {}", url, e);
                Ok(None)
            }
        }
    }

    /// Check whether the cached copy of `url` is missing or out of date.
    ///
    /// Returns `false` when the freshness cannot be determined (offline, no
    /// stored tag, server unreachable).
    pub fn is_stale(&mut self, url: &str) -> Result<bool> {
        let local_path = self.cache_path(url)?;
        if !local_path.exists() {
            return Ok(true);
        }
        let Some(local_tag) = Self::local_etag(&local_path) else {
            return Ok(false);
        };
        match self.remote_etag(url)? {
            None => Ok(false),
            Some(remote_tag) => Ok(remote_tag != local_tag),
        }
    }

    /// Download `url` into `dest`, returning the response `ETag`.
    ///
    /// Writes to a temp file in the cache directory first and persists it on
    /// success, so an interrupted download never leaves a partial file behind.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<Option<String>> {
        log::info!("Downloading {}", url);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let client = self.client()?.clone();
        let resp = client.get(url).send()?.error_for_status()?;
        let etag = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = resp.bytes()?;
        let body = decompress_if_gzip(&bytes)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)?;
        tmp.write_all(&body)?;
        tmp.flush()?;
        tmp.persist(dest).map_err(|e| DashboardError::Io(e.error))?;

        log::info!("Cached {} -> {}", url, dest.display());
        Ok(etag)
    }

    /// Ensure a remote CSV is cached locally, downloading if needed.
    ///
    /// # Returns
    ///
    /// Local filesystem path to the cached CSV file.
    pub fn ensure_remote(&mut self, url: &str) -> Result<PathBuf> {
        let local_path = self.cache_path(url)?;

        if self.offline {
            if local_path.exists() {
                return Ok(local_path);
            }
            return Err(DashboardError::NotFound(format!(
                "{} is not cached and offline mode is enabled",
                url
            )));
        }

        if self.is_stale(url)? {
            let etag = self.download_file(url, &local_path)?;
            Self::save_etag(&local_path, etag.as_deref());
        }

        Ok(local_path)
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn cache_file_name(url: &str) -> Result<String> {
    let invalid = || {
        DashboardError::InvalidArgument(format!(
            "Cannot derive a cache file name from URL: {}",
            url
        ))
    };

    let without_query = url.split(&['?', '#'][..]).next().unwrap_or("");
    let (_, rest) = without_query.split_once("://").ok_or_else(invalid)?;
    let path = rest.split_once('/').map(|(_, p)| p).unwrap_or("");
    let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let last = last.strip_suffix(".gz").unwrap_or(last);

    let name: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() || name.chars().all(|c| c == '.') {
        return Err(invalid());
    }

    let digest = Sha256::digest(url.as_bytes());
    let tag = hex::encode(&digest[..URL_TAG_BYTES]);
    Ok(match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{tag}.{ext}"),
        _ => format!("{name}-{tag}"),
    })
}

fn decompress_if_gzip(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(bytes);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    } else {
        Ok(bytes.to_vec())
    }
}
