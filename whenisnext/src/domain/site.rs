//! Stop lookup results.

/// A stop candidate returned by the lookup API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Human-readable stop name.
    pub name: String,
    /// Internal id, used as `station_id` in the settings file.
    pub site_id: String,
}

impl Site {
    pub fn new(name: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            site_id: site_id.into(),
        }
    }
}
