use serde::Deserialize;

use crate::geodesy::{self, GeoPos};
use super::runway::Runway;

// ---------------------------------------------------------------------------
// Airport reference data
// ---------------------------------------------------------------------------

/// Static airport record, loaded once at startup and never written back.
///
/// Keys follow the database's mixed casing; the all-lowercase spelling of
/// each key is accepted too. Other casings are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Airport {
    #[serde(rename = "Ident", alias = "ident")]
    pub ident: String,
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "Latitude_deg", alias = "latitude_deg")]
    pub latitude_deg: f64,
    #[serde(rename = "longitude_deg", alias = "Longitude_deg")]
    pub longitude_deg: f64,
    #[serde(rename = "Runways", alias = "runways", default)]
    pub runways: Vec<Runway>,
}

impl Airport {
    /// Airport reference point at zero altitude.
    pub fn position(&self) -> GeoPos {
        GeoPos::from_degrees(self.latitude_deg, self.longitude_deg, 0.0)
    }
}

/// Case-insensitive lookup by identifier (surrounding whitespace ignored).
pub fn find_airport<'a>(airports: &'a [Airport], ident: &str) -> Option<&'a Airport> {
    let wanted = ident.trim();
    if wanted.is_empty() {
        return None;
    }
    airports.iter().find(|a| a.ident.eq_ignore_ascii_case(wanted))
}

/// Closest airport that has at least one runway.
pub fn nearest_airport<'a>(pos: &GeoPos, airports: &'a [Airport]) -> Option<&'a Airport> {
    airports
        .iter()
        .filter(|a| !a.runways.is_empty())
        .map(|a| (a, geodesy::central_angle(pos, &a.position())))
        .min_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
        .map(|(a, _)| a)
}
