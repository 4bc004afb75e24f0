//! Text output.

use chrono::NaiveDateTime;

use crate::domain::{Departure, Site};

/// Format departures as one line: `HH:MM (N mins)` joined by `; `.
///
/// Order is kept as given. Departures in the past or implausibly far ahead
/// (see [`Departure::minutes_ahead`]) are left out. No departures gives an
/// empty string.
pub fn format_departures(departures: &[Departure], now: NaiveDateTime) -> String {
    departures
        .iter()
        .filter_map(|dep| {
            dep.minutes_ahead(now)
                .map(|mins| format!("{dep} ({mins} mins)"))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Format lookup results, one `Name:`/`Id:` block per site.
pub fn format_sites(sites: &[Site]) -> String {
    sites
        .iter()
        .map(|site| format!("Name: {}\nId: {}\n", site.name, site.site_id))
        .collect::<Vec<_>>()
        .join("\n")
}
