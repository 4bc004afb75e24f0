//! Conversion from SL DTOs to domain types.
//!
//! Filtering happens here: only entries of the configured mode, line and
//! destination survive, in the order the API sent them.

use crate::domain::{Departure, RouteFilter, Site, TransportMode};

use super::error::SlError;
use super::types::{DepartureDto, RealtimeData, RealtimeResponse, SiteDto, TypeaheadResponse};

/// Pick the departure group for a transport mode.
fn group(data: &RealtimeData, mode: TransportMode) -> &[DepartureDto] {
    let group = match mode {
        TransportMode::Buses => &data.buses,
        TransportMode::Metros => &data.metros,
        TransportMode::Trains => &data.trains,
        TransportMode::Trams => &data.trams,
        TransportMode::Ships => &data.ships,
    };
    group.as_deref().unwrap_or(&[])
}

/// Fail when the envelope carries a non-zero upstream status code.
fn check_status(code: Option<i64>, message: Option<&str>) -> Result<(), SlError> {
    match code {
        None | Some(0) => Ok(()),
        Some(code) => Err(SlError::Upstream {
            code,
            message: message.unwrap_or("no message").to_string(),
        }),
    }
}

/// Convert a realtime response into the departures for one route.
///
/// A mode with no group in the response yields an empty list.
pub fn convert_realtime(
    response: &RealtimeResponse,
    route: &RouteFilter,
) -> Result<Vec<Departure>, SlError> {
    check_status(response.status_code, response.message.as_deref())?;

    let data = response
        .response_data
        .as_ref()
        .ok_or(SlError::MissingField("ResponseData"))?;

    filter_departures(data, route)
}

/// Keep only the entries that match the route, parsing their expected times.
pub fn filter_departures(
    data: &RealtimeData,
    route: &RouteFilter,
) -> Result<Vec<Departure>, SlError> {
    let mut departures = Vec::new();

    for entry in group(data, route.transport_mode) {
        let line = entry
            .line_number
            .as_deref()
            .ok_or(SlError::MissingField("LineNumber"))?;
        let destination = entry
            .destination
            .as_deref()
            .ok_or(SlError::MissingField("Destination"))?;

        if !route.matches(line, destination) {
            continue;
        }

        let expected = entry
            .expected_date_time
            .as_deref()
            .ok_or(SlError::MissingField("ExpectedDateTime"))?;
        departures.push(Departure::parse(expected)?);
    }

    Ok(departures)
}

/// Convert a typeahead response into stop candidates, in API order.
pub fn convert_sites(response: &TypeaheadResponse) -> Result<Vec<Site>, SlError> {
    check_status(response.status_code, response.message.as_deref())?;

    let sites = response
        .response_data
        .as_ref()
        .ok_or(SlError::MissingField("ResponseData"))?;

    sites.iter().map(convert_site).collect()
}

fn convert_site(dto: &SiteDto) -> Result<Site, SlError> {
    let name = dto.name.as_deref().ok_or(SlError::MissingField("Name"))?;
    let site_id = dto
        .site_id
        .as_deref()
        .ok_or(SlError::MissingField("SiteId"))?;
    Ok(Site::new(name, site_id))
}
