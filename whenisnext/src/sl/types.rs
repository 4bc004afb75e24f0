//! SL API response DTOs.
//!
//! These map directly to the JSON returned by `realtimedeparturesV4` and
//! `typeahead`. Fields are `Option` throughout: the API drops or nulls fields
//! freely, and absence of a field we need is reported as a protocol error by
//! the conversion layer rather than as a deserialization failure.

use serde::{Deserialize, Deserializer};

/// Envelope of a realtime departures response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RealtimeResponse {
    /// 0 on success, an error code otherwise.
    pub status_code: Option<i64>,

    /// Error text when `status_code` is non-zero.
    pub message: Option<String>,

    /// Departures grouped by transport mode.
    pub response_data: Option<RealtimeData>,
}

/// Departures grouped by transport mode.
///
/// Each group is absent or null when the site has no traffic of that kind in
/// the requested window.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RealtimeData {
    pub latest_update: Option<String>,
    pub data_age: Option<i64>,
    pub buses: Option<Vec<DepartureDto>>,
    pub metros: Option<Vec<DepartureDto>>,
    pub trains: Option<Vec<DepartureDto>>,
    pub trams: Option<Vec<DepartureDto>>,
    pub ships: Option<Vec<DepartureDto>>,
}

/// A single departure entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepartureDto {
    /// Final stop shown on the vehicle.
    pub destination: Option<String>,

    /// Line designation. Usually a string, occasionally a bare number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub line_number: Option<String>,

    /// Expected departure, `YYYY-MM-DDTHH:MM:SS` local time.
    pub expected_date_time: Option<String>,

    /// Timetabled departure, same format.
    pub time_tabled_date_time: Option<String>,

    /// Short display text ("Nu", "5 min", "10:45").
    pub display_time: Option<String>,

    /// Stop area name at the site.
    pub stop_area_name: Option<String>,
}

/// Envelope of a typeahead response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeaheadResponse {
    pub status_code: Option<i64>,
    pub message: Option<String>,
    pub response_data: Option<Vec<SiteDto>>,
}

/// A stop candidate from the typeahead API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteDto {
    pub name: Option<String>,

    /// Numeric id, sent as a string by the API.
    #[serde(default, deserialize_with = "string_or_number")]
    pub site_id: Option<String>,

    /// Kind of place ("Station", "Address", "Poi").
    #[serde(rename = "Type")]
    pub kind: Option<String>,
}

/// Accept either a JSON string or number and keep it as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    }))
}
