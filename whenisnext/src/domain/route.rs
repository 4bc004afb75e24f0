//! Route identity types.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an unknown transport mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode {0:?} (expected one of Buses, Metros, Trains, Trams, Ships)")]
pub struct InvalidTransportMode(String);

/// A transport mode group as it appears in the realtime departures response.
///
/// The upstream API groups departures under one key per mode, and the key
/// names are exactly the variant names here.
///
/// # Examples
///
/// ```
/// use whenisnext::domain::TransportMode;
///
/// let mode: TransportMode = "Buses".parse().unwrap();
/// assert_eq!(mode.as_str(), "Buses");
///
/// // Keys are case sensitive upstream, so they are here too
/// assert!("buses".parse::<TransportMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Buses,
    Metros,
    Trains,
    Trams,
    Ships,
}

impl TransportMode {
    /// All modes, in the order the API documents them.
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Buses,
        TransportMode::Metros,
        TransportMode::Trains,
        TransportMode::Trams,
        TransportMode::Ships,
    ];

    /// Returns the response key for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Buses => "Buses",
            TransportMode::Metros => "Metros",
            TransportMode::Trains => "Trains",
            TransportMode::Trams => "Trams",
            TransportMode::Ships => "Ships",
        }
    }
}

impl FromStr for TransportMode {
    type Err = InvalidTransportMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| InvalidTransportMode(s.to_string()))
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single route a configured instance of the tool tracks.
///
/// Departures are kept only when they match `transport_mode`, `line_number`
/// and `destination` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFilter {
    pub transport_mode: TransportMode,
    pub line_number: String,
    pub destination: String,
    pub station_id: u32,
}

impl RouteFilter {
    /// Create a new route filter.
    pub fn new(
        transport_mode: TransportMode,
        line_number: impl Into<String>,
        destination: impl Into<String>,
        station_id: u32,
    ) -> Self {
        Self {
            transport_mode,
            line_number: line_number.into(),
            destination: destination.into(),
            station_id,
        }
    }

    /// Whether a departure entry belongs to this route.
    pub fn matches(&self, line_number: &str, destination: &str) -> bool {
        self.line_number == line_number && self.destination == destination
    }
}

impl fmt::Display for RouteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} towards {} from site {}",
            self.transport_mode, self.line_number, self.destination, self.station_id
        )
    }
}
