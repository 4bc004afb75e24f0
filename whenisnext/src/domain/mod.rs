//! Domain types for the departures tool.
//!
//! Types here are validated at construction, so code receiving them can
//! trust their contents.

mod route;
mod site;
mod time;

pub use route::{InvalidTransportMode, RouteFilter, TransportMode};
pub use site::Site;
pub use time::{Departure, EXPECTED_DATE_TIME_FORMAT, MAX_MINUTES_AHEAD, TimeError};
