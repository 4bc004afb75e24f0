//! Settings file loading.
//!
//! Settings live in a TOML file, by default `~/.whenisnext/settings.toml`.
//! The file is read once at startup into a validated [`Settings`] value that
//! is passed to the components that need it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{RouteFilter, TransportMode};
use crate::sl::{DEFAULT_BASE_URL, SlConfig};

/// Directory under the home directory holding settings and the cache.
pub const BASE_DIR: &str = ".whenisnext";

/// Settings file name inside [`BASE_DIR`].
pub const SETTINGS_FILE: &str = "settings.toml";

/// Cache file name inside [`BASE_DIR`].
pub const STORE_FILE: &str = "store.json";

/// Printed whenever the settings cannot be used.
pub const EXAMPLE_SETTINGS: &str = r#"transport_mode = "Buses"
line_number = "2"
destination = "Sofia"
cache_ttl_seconds = 330
api_key_realtime = "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"
station_id = 1073
# Only needed for --lookup
# api_key_lookup = "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx""#;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("missing configuration, create {} like so:\n\n{}\n", path.display(), EXAMPLE_SETTINGS)]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "invalid configuration in {}: {source}\n\nexpected something like:\n\n{}\n",
        path.display(),
        EXAMPLE_SETTINGS
    )]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(
        "missing {} in {}, expected something like:\n\n{}\n",
        fields.join(", "),
        path.display(),
        EXAMPLE_SETTINGS
    )]
    MissingFields {
        path: PathBuf,
        fields: Vec<&'static str>,
    },

    #[error(
        "invalid {field} in {}: {reason}\n\nexpected something like:\n\n{}\n",
        path.display(),
        EXAMPLE_SETTINGS
    )]
    Invalid {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },

    #[error(
        "api_key_lookup must be set in {} to use --lookup, for example:\n\n{}\n",
        path.display(),
        EXAMPLE_SETTINGS.replace("# api_key_lookup", "api_key_lookup")
    )]
    MissingLookupKey { path: PathBuf },
}

/// A setting that may be written as a string or a bare integer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrInt {
    Str(String),
    Int(i64),
}

impl StringOrInt {
    fn into_string(self) -> String {
        match self {
            StringOrInt::Str(s) => s,
            StringOrInt::Int(n) => n.to_string(),
        }
    }
}

/// The settings file as written. Every field is optional here so that all
/// missing fields can be reported at once.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    transport_mode: Option<String>,
    line_number: Option<StringOrInt>,
    destination: Option<String>,
    cache_ttl_seconds: Option<u64>,
    api_key_realtime: Option<String>,
    station_id: Option<u32>,
    api_key_lookup: Option<String>,
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    store_path: Option<PathBuf>,
}

/// Validated settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The tracked route.
    pub route: RouteFilter,
    /// Freshness window for the departure cache.
    pub cache_ttl: Duration,
    pub api_key_realtime: String,
    pub api_key_lookup: Option<String>,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Cache file location.
    pub store_path: PathBuf,
    /// Where these settings were loaded from.
    pub source_path: PathBuf,
}

/// `~/.whenisnext`
pub fn default_base_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(BASE_DIR))
        .ok_or(ConfigError::NoHomeDir)
}

impl Settings {
    /// Load settings from `path`. The cache file defaults to
    /// [`STORE_FILE`] next to the settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let store = path
            .parent()
            .map(|dir| dir.join(STORE_FILE))
            .unwrap_or_else(|| PathBuf::from(STORE_FILE));
        Self::load_with_store(path, store)
    }

    fn load_with_store(path: &Path, default_store: PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&contents, path, default_store)
    }

    /// Parse and validate settings text. `path` is only used in messages.
    pub fn parse(contents: &str, path: &Path, default_store: PathBuf) -> Result<Self, ConfigError> {
        let raw: RawSettings = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut missing = Vec::new();
        if raw.transport_mode.is_none() {
            missing.push("transport_mode");
        }
        if raw.line_number.is_none() {
            missing.push("line_number");
        }
        if raw.destination.is_none() {
            missing.push("destination");
        }
        if raw.cache_ttl_seconds.is_none() {
            missing.push("cache_ttl_seconds");
        }
        if raw.api_key_realtime.is_none() {
            missing.push("api_key_realtime");
        }
        if raw.station_id.is_none() {
            missing.push("station_id");
        }

        let (
            Some(transport_mode),
            Some(line_number),
            Some(destination),
            Some(cache_ttl_seconds),
            Some(api_key_realtime),
            Some(station_id),
        ) = (
            raw.transport_mode,
            raw.line_number,
            raw.destination,
            raw.cache_ttl_seconds,
            raw.api_key_realtime,
            raw.station_id,
        )
        else {
            return Err(ConfigError::MissingFields {
                path: path.to_path_buf(),
                fields: missing,
            });
        };

        let transport_mode: TransportMode =
            transport_mode.parse().map_err(|e| ConfigError::Invalid {
                path: path.to_path_buf(),
                field: "transport_mode",
                reason: format!("{e}"),
            })?;

        let line_number = non_blank(path, "line_number", line_number.into_string())?;
        let destination = non_blank(path, "destination", destination)?;
        let api_key_realtime = non_blank(path, "api_key_realtime", api_key_realtime)?;
        let api_key_lookup = raw
            .api_key_lookup
            .map(|key| non_blank(path, "api_key_lookup", key))
            .transpose()?;

        let request_timeout_secs = raw.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                field: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            route: RouteFilter::new(transport_mode, line_number, destination, station_id),
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
            api_key_realtime,
            api_key_lookup,
            api_base_url: raw
                .api_base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout_secs,
            store_path: raw.store_path.unwrap_or(default_store),
            source_path: path.to_path_buf(),
        })
    }

    /// Override the cache file location.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// The lookup key, required in lookup mode.
    pub fn lookup_key(&self) -> Result<&str, ConfigError> {
        self.api_key_lookup
            .as_deref()
            .ok_or_else(|| ConfigError::MissingLookupKey {
                path: self.source_path.clone(),
            })
    }

    /// Client configuration derived from these settings.
    pub fn sl_config(&self) -> SlConfig {
        let config = SlConfig::new(&self.api_key_realtime)
            .with_base_url(&self.api_base_url)
            .with_timeout(self.request_timeout_secs);
        match &self.api_key_lookup {
            Some(key) => config.with_lookup_key(key),
            None => config,
        }
    }
}

fn non_blank(path: &Path, field: &'static str, value: String) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(contents: &str) -> Result<Settings, ConfigError> {
        Settings::parse(
            contents,
            Path::new("/home/me/.whenisnext/settings.toml"),
            PathBuf::from("/home/me/.whenisnext/store.json"),
        )
    }

    #[test]
    fn example_parses() {
        let settings = parse(EXAMPLE_SETTINGS).unwrap();
        assert_eq!(
            settings.route,
            RouteFilter::new(TransportMode::Buses, "2", "Sofia", 1073)
        );
        assert_eq!(settings.cache_ttl, Duration::from_secs(330));
        assert_eq!(settings.api_key_lookup, None);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(
            settings.store_path,
            PathBuf::from("/home/me/.whenisnext/store.json")
        );
    }

    #[test]
    fn integer_line_number() {
        let settings = parse(
            r#"
            transport_mode = "Trams"
            line_number = 7
            destination = "Sergels torg"
            cache_ttl_seconds = 60
            api_key_realtime = "k"
            station_id = 9000
            api_key_lookup = "l"
            store_path = "/tmp/whenisnext.json"
            "#,
        )
        .unwrap();
        assert_eq!(settings.route.line_number, "7");
        assert_eq!(settings.route.transport_mode, TransportMode::Trams);
        assert_eq!(settings.lookup_key().unwrap(), "l");
        assert_eq!(settings.store_path, PathBuf::from("/tmp/whenisnext.json"));
    }

    #[test]
    fn all_missing_fields_reported() {
        let err = parse("transport_mode = \"Buses\"\nstation_id = 1").unwrap_err();
        match &err {
            ConfigError::MissingFields { fields, .. } => assert_eq!(
                fields,
                &vec![
                    "line_number",
                    "destination",
                    "cache_ttl_seconds",
                    "api_key_realtime"
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("cache_ttl_seconds = 330"));
    }

    #[test]
    fn unknown_mode_is_invalid() {
        let contents = EXAMPLE_SETTINGS.replace("Buses", "Zeppelins");
        let err = parse(&contents).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "transport_mode",
                ..
            }
        ));
        let msg = err.to_string();
        assert!(msg.contains("Zeppelins"));
        assert!(msg.contains("/home/me/.whenisnext/settings.toml"));
        assert!(msg.contains("cache_ttl_seconds = 330"));
    }

    #[test]
    fn blank_key_is_invalid() {
        let contents = EXAMPLE_SETTINGS.replace("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx", " ");
        let err = parse(&contents).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "api_key_realtime",
                ..
            }
        ));
        let msg = err.to_string();
        assert!(msg.contains("/home/me/.whenisnext/settings.toml"));
        assert!(msg.contains("cache_ttl_seconds = 330"));
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let contents = format!("{EXAMPLE_SETTINGS}
request_timeout_secs = 0
");
        let err = parse(&contents).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "request_timeout_secs",
                ..
            }
        ));
        assert!(err.to_string().contains("cache_ttl_seconds = 330"));
    }

    #[test]
    fn unknown_field_is_parse_error() {
        let contents = format!("{EXAMPLE_SETTINGS}\nSTATIONID = 1073\n");
        assert!(matches!(
            parse(&contents).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn python_style_settings_rejected() {
        let err = parse("TRANSPORTMODE = 'Buses'\nCACHETIME = 330").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_lookup_key() {
        let settings = parse(EXAMPLE_SETTINGS).unwrap();
        let err = settings.lookup_key().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/home/me/.whenisnext/settings.toml"));
        assert!(msg.contains("cache_ttl_seconds = 330"));
        assert!(msg.contains("\napi_key_lookup = \"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx\""));
    }

    #[test]
    fn missing_file_shows_example() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        let msg = err.to_string();
        assert!(msg.contains("settings.toml"));
        assert!(msg.contains("transport_mode = \"Buses\""));
    }

    #[test]
    fn load_puts_store_next_to_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, EXAMPLE_SETTINGS).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.store_path, dir.path().join(STORE_FILE));
        assert_eq!(settings.source_path, path);
    }

    #[test]
    fn sl_config_carries_keys() {
        let contents =
            format!("{EXAMPLE_SETTINGS}\napi_key_lookup = \"lk\"\nrequest_timeout_secs = 5\n");
        let config = parse(&contents).unwrap().sl_config();
        assert_eq!(config.realtime_key, "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx");
        assert_eq!(config.lookup_key.as_deref(), Some("lk"));
        assert_eq!(config.timeout_secs, 5);
    }
}
