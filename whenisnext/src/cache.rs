//! Persistent single-slot cache for departure results.
//!
//! The tool runs as a short-lived process on every invocation (shell prompt,
//! status bar), so the last successful result is kept on disk together with
//! the time it was fetched. While that record is younger than the configured
//! TTL it is served as-is and no request is made.
//!
//! There is exactly one record. Its staleness is judged on every read; it is
//! never deleted, only overwritten by the next successful fetch.
//!
//! Concurrent invocations are not coordinated. Two processes that both see a
//! stale record will both fetch and both write, and the later write wins.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::domain::{Departure, RouteFilter};
use crate::sl::SlError;

/// Errors from writing the cache file.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to create cache directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize cache record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write cache file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The single cached result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// When `departures` was obtained.
    pub retrieved_at: DateTime<Utc>,
    /// Matching departures, in API order.
    pub departures: Vec<Departure>,
}

impl CacheRecord {
    pub fn new(retrieved_at: DateTime<Utc>, departures: Vec<Departure>) -> Self {
        Self {
            retrieved_at,
            departures,
        }
    }
}

/// Whether a record may still be served at `now`.
///
/// Fresh iff `0 <= now - retrieved_at <= ttl`. A record stamped in the future
/// means the clock has moved backwards, and is treated as stale.
pub fn is_fresh(record: &CacheRecord, now: DateTime<Utc>, ttl: Duration) -> bool {
    let elapsed = now - record.retrieved_at;
    if elapsed < TimeDelta::zero() {
        return false;
    }
    elapsed.to_std().is_ok_and(|elapsed| elapsed <= ttl)
}

/// File-backed store for the single cache record.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store backed by the given file. Nothing is touched on disk
    /// until the first read or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the record, if there is a usable one.
    ///
    /// A missing file is the normal first-run case. An unreadable or corrupt
    /// file is logged and also reported as absent.
    pub fn read(&self) -> Option<CacheRecord> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache record yet");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read cache file");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt cache file");
                None
            }
        }
    }

    /// Replace the stored record.
    ///
    /// Each call writes its own uniquely named temporary file in the same
    /// directory and renames it over the target. Readers never see a partial
    /// file, and of several concurrent writers the last rename wins.
    pub fn write(&self, record: &CacheRecord) -> Result<(), CacheError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(record)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| CacheError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        tmp.write_all(json.as_bytes()).map_err(|source| CacheError::Write {
            path: tmp.path().to_path_buf(),
            source,
        })?;
        tmp.persist(&self.path).map_err(|e| CacheError::Write {
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!(
            path = %self.path.display(),
            count = record.departures.len(),
            "wrote cache record"
        );
        Ok(())
    }
}

/// Something that can fetch the current departures for a route.
#[allow(async_fn_in_trait)]
pub trait DepartureSource {
    async fn fetch_departures(&self, route: &RouteFilter) -> Result<Vec<Departure>, SlError>;
}

/// How a result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from a fresh record, no request made.
    Hit,
    /// No usable record, fetched.
    Miss,
    /// Record too old, fetched.
    Stale,
}

/// Departures plus where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResult {
    pub departures: Vec<Departure>,
    pub outcome: CacheOutcome,
}

/// A departure source with a persistent freshness-window cache in front.
pub struct CachedDepartures<S> {
    source: S,
    store: CacheStore,
    ttl: Duration,
}

impl<S: DepartureSource> CachedDepartures<S> {
    /// Create a new cached source.
    pub fn new(source: S, store: CacheStore, ttl: Duration) -> Self {
        Self { source, store, ttl }
    }

    /// Get departures for `route`, using the cache if it is fresh at `now`.
    ///
    /// On a miss or stale record this makes exactly one fetch. A failed
    /// fetch is returned and the old record is left alone. A failed cache
    /// write is logged; the fetched departures are still returned.
    pub async fn get(
        &self,
        route: &RouteFilter,
        now: DateTime<Utc>,
    ) -> Result<CachedResult, SlError> {
        let outcome = match self.store.read() {
            Some(record) if is_fresh(&record, now, self.ttl) => {
                debug!(
                    retrieved_at = %record.retrieved_at,
                    count = record.departures.len(),
                    "serving cached departures"
                );
                return Ok(CachedResult {
                    departures: record.departures,
                    outcome: CacheOutcome::Hit,
                });
            }
            Some(record) => {
                debug!(retrieved_at = %record.retrieved_at, "cache record is stale");
                CacheOutcome::Stale
            }
            None => CacheOutcome::Miss,
        };

        let departures = self.source.fetch_departures(route).await?;
        info!(count = departures.len(), ?outcome, "fetched departures");

        let record = CacheRecord::new(Utc::now(), departures);
        if let Err(e) = self.store.write(&record) {
            warn!(error = %e, "failed to update departure cache");
        }

        Ok(CachedResult {
            departures: record.departures,
            outcome,
        })
    }

    /// Access the underlying store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn source(&self) -> &S {
        &self.source
    }
}
