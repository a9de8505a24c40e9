use std::f64::consts::FRAC_PI_2;

use crate::geodesy::{self, GeoPos};

// ---------------------------------------------------------------------------
// Heading frame
// ---------------------------------------------------------------------------

/// Sensed and commanded headings live in the actuator's east-north-up body
/// frame, which sits a quarter turn behind true course:
/// `true_course = heading + HEADING_FRAME_OFFSET`.
pub const HEADING_FRAME_OFFSET: f64 = FRAC_PI_2;

/// True course (rad, [0, 2pi)) of an actuator-frame heading.
pub fn true_course(heading: f64) -> f64 {
    geodesy::normalize_angle(heading + HEADING_FRAME_OFFSET)
}

// ---------------------------------------------------------------------------
// Sensor snapshot supplied by the vehicle each tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorState {
    pub position: GeoPos,
    pub heading: f64,        // rad, actuator frame
    pub roll: f64,           // rad
    pub pitch: f64,          // rad
    pub vertical_speed: f64, // m/s
    pub airspeed: f64,       // m/s
    pub radar_altitude: f64, // m
}

impl SensorState {
    pub fn altitude(&self) -> f64 {
        self.position.alt
    }
}

// ---------------------------------------------------------------------------
// Commanded attitude sent to the actuator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttitudeCommand {
    pub roll: f64,    // rad
    pub pitch: f64,   // rad, positive = nose up
    pub heading: f64, // rad, actuator frame
}

impl AttitudeCommand {
    /// All-zero attitude request issued when the autopilot lets go.
    pub fn neutral() -> Self {
        Self::default()
    }
}
