//! The two run modes, wired from settings.

use chrono::{Local, Utc};
use tracing::debug;

use crate::cache::{CacheStore, CachedDepartures};
use crate::config::{ConfigError, Settings};
use crate::present::{format_departures, format_sites};
use crate::sl::{SlClient, SlError};

/// Errors that end an invocation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sl(#[from] SlError),
}

impl AppError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 1,
            AppError::Sl(_) => 2,
        }
    }
}

/// Departures mode: cached summary line for the configured route.
pub async fn departures_line(settings: &Settings) -> Result<String, AppError> {
    let client = SlClient::new(settings.sl_config())?;
    let store = CacheStore::new(&settings.store_path);
    let cached = CachedDepartures::new(client, store, settings.cache_ttl);

    let result = cached.get(&settings.route, Utc::now()).await?;
    debug!(outcome = ?result.outcome, count = result.departures.len(), "departures ready");

    Ok(format_departures(
        &result.departures,
        Local::now().naive_local(),
    ))
}

/// Lookup mode: stop candidates matching `search`. Never touches the cache.
pub async fn lookup_text(settings: &Settings, search: &str) -> Result<String, AppError> {
    settings.lookup_key()?;
    let client = SlClient::new(settings.sl_config())?;
    let sites = client.lookup_sites(search).await?;
    debug!(count = sites.len(), "lookup results");
    Ok(format_sites(&sites))
}
