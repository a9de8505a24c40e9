use std::f64::consts::PI;

use serde::Deserialize;

use crate::geodesy::{self, GeoPos};

// ---------------------------------------------------------------------------
// Runway ends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RunwayEnd {
    pub ident: String,
    pub position: GeoPos, // threshold lat/lon (rad), elevation (m)
    pub true_heading: f64, // rad
}

// ---------------------------------------------------------------------------
// Runway: two physical ends, one of them selected for landing
// ---------------------------------------------------------------------------

/// A runway and its approach geometry.
///
/// `use_le` and `glide_path_rad` are runtime navigation state; everything
/// else comes from the airport database and is read-only. All deviation
/// queries read the selected end at call time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RunwayRecord")]
pub struct Runway {
    pub length_m: f64,
    pub width_m: f64,
    pub surface: String,
    pub le: RunwayEnd, // low end
    pub he: RunwayEnd, // high end
    pub use_le: bool,
    pub glide_path_rad: f64,
}

pub const DEFAULT_GLIDE_PATH_DEG: f64 = 3.0;

impl Runway {
    pub fn new(le: RunwayEnd, he: RunwayEnd) -> Self {
        Self {
            length_m: 0.0,
            width_m: 0.0,
            surface: String::new(),
            le,
            he,
            use_le: true,
            glide_path_rad: DEFAULT_GLIDE_PATH_DEG.to_radians(),
        }
    }

    pub fn selected_end(&self) -> &RunwayEnd {
        if self.use_le {
            &self.le
        } else {
            &self.he
        }
    }

    /// Identifier of the end in use, e.g. "27L".
    pub fn ident(&self) -> &str {
        &self.selected_end().ident
    }

    /// Threshold of the end in use.
    pub fn threshold(&self) -> GeoPos {
        self.selected_end().position
    }

    /// True heading flown when landing on the end in use, rad in [0, 2pi).
    ///
    /// Derived from the low end's heading; the high end is its reciprocal.
    pub fn effective_heading(&self) -> f64 {
        if self.use_le {
            geodesy::normalize_angle(self.le.true_heading)
        } else {
            geodesy::normalize_angle(self.le.true_heading + PI)
        }
    }

    /// Reverse the approach direction.
    pub fn swap_end(&mut self) {
        self.use_le = !self.use_le;
    }

    pub fn set_glide_path_deg(&mut self, deg: f64) {
        self.glide_path_rad = deg.to_radians();
    }

    /// Bearing from the aircraft to the threshold in use.
    pub fn bearing_from(&self, aircraft: &GeoPos) -> f64 {
        geodesy::bearing(aircraft, &self.threshold())
    }

    pub fn distance_from(&self, aircraft: &GeoPos, radius: f64) -> f64 {
        geodesy::distance(aircraft, &self.threshold(), radius)
    }

    /// Elevation angle of the aircraft as seen from the threshold (rad),
    /// regardless of the configured glide path.
    pub fn vertical_angle(&self, aircraft: &GeoPos, radius: f64) -> f64 {
        let threshold = self.threshold();
        let horizontal = geodesy::distance(aircraft, &threshold, radius);
        (aircraft.alt - threshold.alt).atan2(horizontal)
    }

    /// Angular cross-track error from the extended centerline (rad).
    /// Positive = right of the centerline looking along the landing direction.
    pub fn lateral_deviation(&self, aircraft: &GeoPos, _radius: f64) -> f64 {
        geodesy::cross_track_from(&self.threshold(), self.effective_heading(), aircraft)
    }

    /// Cross-track distance from the extended centerline (m), same sign.
    pub fn lateral_deviation_m(&self, aircraft: &GeoPos, radius: f64) -> f64 {
        self.lateral_deviation(aircraft, radius) * radius
    }

    /// Angle above (+) or below (-) the configured glide path (rad).
    pub fn vertical_deviation(&self, aircraft: &GeoPos, radius: f64) -> f64 {
        self.vertical_angle(aircraft, radius) - self.glide_path_rad
    }

    /// Height above (+) or below (-) the glide path at the aircraft's range (m).
    pub fn vertical_deviation_m(&self, aircraft: &GeoPos, radius: f64) -> f64 {
        let threshold = self.threshold();
        let horizontal = geodesy::distance(aircraft, &threshold, radius);
        let on_path = self.glide_path_rad.tan() * horizontal;
        (aircraft.alt - threshold.alt) - on_path
    }
}

// ---------------------------------------------------------------------------
// Database record (flat JSON layout of the airport file)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RunwayRecord {
    #[serde(rename = "Length_m", alias = "length_m", default)]
    length_m: f64,
    #[serde(rename = "Width_m", alias = "width_m", default)]
    width_m: f64,
    #[serde(rename = "Surface", alias = "surface", default)]
    surface: String,
    #[serde(rename = "Le_Ident", alias = "le_ident")]
    le_ident: String,
    #[serde(rename = "Le_Latitude_rad", alias = "le_latitude_rad")]
    le_latitude_rad: f64,
    #[serde(rename = "Le_Longitude_rad", alias = "le_longitude_rad")]
    le_longitude_rad: f64,
    #[serde(rename = "Le_Elevation_m", alias = "le_elevation_m", default)]
    le_elevation_m: f64,
    #[serde(rename = "Le_True_Heading_rad", alias = "le_true_heading_rad")]
    le_true_heading_rad: f64,
    #[serde(rename = "He_Ident", alias = "he_ident")]
    he_ident: String,
    #[serde(rename = "He_Latitude_rad", alias = "he_latitude_rad")]
    he_latitude_rad: f64,
    #[serde(rename = "He_Longitude_rad", alias = "he_longitude_rad")]
    he_longitude_rad: f64,
    #[serde(rename = "He_Elevation_m", alias = "he_elevation_m", default)]
    he_elevation_m: f64,
    #[serde(rename = "He_True_Heading_rad", alias = "he_true_heading_rad", default)]
    he_true_heading_rad: Option<f64>,
    #[serde(rename = "Use_LE", alias = "use_le", default)]
    use_le: bool,
    #[serde(rename = "glideSlopeRad", alias = "glideslope_rad", alias = "glide_slope_rad", default)]
    glide_slope_rad: Option<f64>,
}

impl From<RunwayRecord> for Runway {
    fn from(r: RunwayRecord) -> Self {
        let he_heading = r
            .he_true_heading_rad
            .unwrap_or_else(|| geodesy::normalize_angle(r.le_true_heading_rad + PI));
        Runway {
            length_m: r.length_m,
            width_m: r.width_m,
            surface: r.surface,
            le: RunwayEnd {
                ident: r.le_ident,
                position: GeoPos::new(r.le_latitude_rad, r.le_longitude_rad, r.le_elevation_m),
                true_heading: r.le_true_heading_rad,
            },
            he: RunwayEnd {
                ident: r.he_ident,
                position: GeoPos::new(r.he_latitude_rad, r.he_longitude_rad, r.he_elevation_m),
                true_heading: he_heading,
            },
            use_le: r.use_le,
            glide_path_rad: r
                .glide_slope_rad
                .filter(|gs| *gs > 0.0)
                .unwrap_or_else(|| DEFAULT_GLIDE_PATH_DEG.to_radians()),
        }
    }
}
