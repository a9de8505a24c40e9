use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Reference constants
// ---------------------------------------------------------------------------

/// Mean Earth radius, m. Callers pass the radius of whatever body they fly over.
pub const EARTH_RADIUS: f64 = 6_371_000.0;

// ---------------------------------------------------------------------------
// Geodetic position on a sphere
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    pub lat: f64, // rad, [-pi/2, pi/2]
    pub lon: f64, // rad, [-pi, pi]
    pub alt: f64, // m above the reference sphere
}

impl GeoPos {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    pub fn from_degrees(lat_deg: f64, lon_deg: f64, alt: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians(), alt)
    }

    /// Geodetic position of a body-fixed cartesian point (m, origin at the body centre).
    pub fn from_cartesian(p: &Vector3<f64>, radius: f64) -> Self {
        let r = p.norm();
        if r < 1e-9 {
            return Self::default();
        }
        Self {
            lat: (p.z / r).clamp(-1.0, 1.0).asin(),
            lon: p.y.atan2(p.x),
            alt: r - radius,
        }
    }

    /// Body-fixed cartesian coordinates (m).
    pub fn to_cartesian(&self, radius: f64) -> Vector3<f64> {
        let r = radius + self.alt;
        Vector3::new(
            r * self.lat.cos() * self.lon.cos(),
            r * self.lat.cos() * self.lon.sin(),
            r * self.lat.sin(),
        )
    }

    /// Same horizontal position at a different altitude.
    pub fn with_alt(self, alt: f64) -> Self {
        Self { alt, ..self }
    }
}

// ---------------------------------------------------------------------------
// Angle helpers
// ---------------------------------------------------------------------------

/// Wrap an angle into [0, 2pi).
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Wrap an angle into (-pi, pi].
pub fn wrap_pi(angle: f64) -> f64 {
    let a = normalize_angle(angle);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

// ---------------------------------------------------------------------------
// Great-circle navigation
// ---------------------------------------------------------------------------

/// Initial great-circle bearing from `from` to `to`, rad in [0, 2pi).
///
/// Coincident points have no defined bearing; this returns 0 (true north) for
/// them so the result is always finite.
pub fn bearing(from: &GeoPos, to: &GeoPos) -> f64 {
    if from.lat == to.lat && from.lon == to.lon {
        return 0.0;
    }
    let d_lon = to.lon - from.lon;
    let y = d_lon.sin() * to.lat.cos();
    let x = from.lat.cos() * to.lat.sin() - from.lat.sin() * to.lat.cos() * d_lon.cos();
    normalize_angle(y.atan2(x))
}

/// Haversine arc length between two positions, in the units of `radius`.
/// Altitude is ignored.
pub fn distance(pos1: &GeoPos, pos2: &GeoPos, radius: f64) -> f64 {
    radius * central_angle(pos1, pos2)
}

/// Central angle between two positions (rad).
pub fn central_angle(pos1: &GeoPos, pos2: &GeoPos) -> f64 {
    let sin_lat = ((pos2.lat - pos1.lat) * 0.5).sin();
    let sin_lon = ((pos2.lon - pos1.lon) * 0.5).sin();
    let a = (sin_lat * sin_lat + pos1.lat.cos() * pos2.lat.cos() * sin_lon * sin_lon).clamp(0.0, 1.0);
    2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Signed angular cross-track distance of point 3 from the great circle
/// leaving point 1 on course `course_bearing` (theta12).
///
/// `d13` is the central angle 1->3 and `bearing13` the initial bearing 1->3.
/// Positive = right of course. Multiply by the radius for a linear distance.
pub fn cross_track_angle(d13: f64, bearing13: f64, course_bearing: f64) -> f64 {
    (d13.sin() * (bearing13 - course_bearing).sin()).clamp(-1.0, 1.0).asin()
}

/// Cross-track angle of `point` from the course leaving `origin` on `course_bearing`.
pub fn cross_track_from(origin: &GeoPos, course_bearing: f64, point: &GeoPos) -> f64 {
    cross_track_angle(central_angle(origin, point), bearing(origin, point), course_bearing)
}

/// Position reached from `from` travelling `dist` along the initial bearing
/// `course` on a sphere of `radius`. Altitude is carried over unchanged.
pub fn destination(from: &GeoPos, course: f64, dist: f64, radius: f64) -> GeoPos {
    let delta = dist / radius;
    let lat = (from.lat.sin() * delta.cos() + from.lat.cos() * delta.sin() * course.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon = from.lon
        + (course.sin() * delta.sin() * from.lat.cos()).atan2(delta.cos() - from.lat.sin() * lat.sin());
    GeoPos {
        lat,
        lon: wrap_pi(lon),
        alt: from.alt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn due_east_on_equator() {
        let a = GeoPos::new(0.0, 0.0, 0.0);
        let b = GeoPos::new(0.0, 0.01, 0.0);
        assert_abs_diff_eq!(bearing(&a, &b), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(distance(&a, &b, EARTH_RADIUS), EARTH_RADIUS * 0.01, epsilon = 1e-6);
    }

    #[test]
    fn bearing_is_normalized() {
        let origin = GeoPos::from_degrees(47.0, 8.0, 0.0);
        for i in 0..36 {
            let course = (i as f64 * 10.0 + 0.5).to_radians();
            let p = destination(&origin, course, 50_000.0, EARTH_RADIUS);
            let b = bearing(&origin, &p);
            assert!((0.0..TAU).contains(&b), "bearing {} out of range", b);
            assert!((b - course).abs() < 1e-6, "expected {}, got {}", course, b);
        }
    }

    #[test]
    fn coincident_points_bear_north() {
        let p = GeoPos::from_degrees(10.0, 20.0, 300.0);
        assert_eq!(bearing(&p, &p), 0.0);
        assert_eq!(distance(&p, &p, EARTH_RADIUS), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPos::from_degrees(51.47, -0.45, 0.0);
        let b = GeoPos::from_degrees(40.64, -73.78, 0.0);
        let ab = distance(&a, &b, EARTH_RADIUS);
        let ba = distance(&b, &a, EARTH_RADIUS);
        assert_abs_diff_eq!(ab, ba, epsilon = 1e-6);
        // LHR-JFK is roughly 5,540 km
        assert!(ab > 5.4e6 && ab < 5.7e6, "got {}", ab);
    }

    #[test]
    fn point_on_course_has_no_cross_track() {
        let from = GeoPos::from_degrees(45.0, 5.0, 0.0);
        let to = GeoPos::from_degrees(46.0, 7.0, 0.0);
        let course = bearing(&from, &to);
        let d = distance(&from, &to, EARTH_RADIUS);
        let mid = destination(&from, course, d * 0.4, EARTH_RADIUS);
        assert_abs_diff_eq!(cross_track_from(&from, course, &mid) * EARTH_RADIUS, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn cross_track_sign_right_of_course() {
        let from = GeoPos::new(0.0, 0.0, 0.0);
        // Course due north, point to the east is right of course
        let east = GeoPos::new(0.001, 0.001, 0.0);
        let west = GeoPos::new(0.001, -0.001, 0.0);
        assert!(cross_track_from(&from, 0.0, &east) > 0.0);
        assert!(cross_track_from(&from, 0.0, &west) < 0.0);
    }

    #[test]
    fn cartesian_roundtrip_keeps_altitude() {
        let p = GeoPos::from_degrees(-33.9, 151.2, 1_200.0);
        let back = GeoPos::from_cartesian(&p.to_cartesian(EARTH_RADIUS), EARTH_RADIUS);
        assert_abs_diff_eq!(back.lat, p.lat, epsilon = 1e-12);
        assert_abs_diff_eq!(back.lon, p.lon, epsilon = 1e-12);
        assert_abs_diff_eq!(back.alt, p.alt, epsilon = 1e-6);
    }

    #[test]
    fn wrap_helpers() {
        assert_abs_diff_eq!(normalize_angle(-FRAC_PI_2), 1.5 * PI, epsilon = 1e-12);
        assert_eq!(normalize_angle(-1e-18), 0.0);
        assert_abs_diff_eq!(wrap_pi(1.5 * PI), -FRAC_PI_2, epsilon = 1e-12);
    }
}
