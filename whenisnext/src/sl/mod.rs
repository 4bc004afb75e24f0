//! SL (Stockholm public transport) API client.
//!
//! Two endpoints are used:
//! - `realtimedeparturesV4` for the expected departures at a site, grouped
//!   by transport mode
//! - `typeahead` for resolving a stop name to its site id
//!
//! Both authenticate with a `key` query parameter, and each uses its own key.

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIME_WINDOW_MINS, SlClient, SlConfig};
pub use convert::{convert_realtime, convert_sites, filter_departures};
pub use error::{ErrorKind, SlError};
pub use types::{DepartureDto, RealtimeData, RealtimeResponse, SiteDto, TypeaheadResponse};
