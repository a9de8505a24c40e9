use nalgebra::Vector3;

use crate::geodesy::{self, GeoPos};
use crate::gnc::{AttitudeActuator, AttitudeFrame};
use super::state::{true_course, AttitudeCommand, SensorState};

// ---------------------------------------------------------------------------
// Kinematic aircraft: rate-limited attitude tracking, point-mass motion
// ---------------------------------------------------------------------------

/// Minimal aircraft that flies at constant airspeed and slews its heading
/// and pitch toward the last attitude target it was given.
///
/// Stands in for the host vehicle in closed-loop runs: it provides the
/// sensor snapshot and accepts the autopilot's attitude commands.
#[derive(Debug, Clone)]
pub struct SimAircraft {
    pub position: GeoPos,
    pub heading: f64,           // rad, actuator frame
    pub pitch: f64,             // rad
    pub roll: f64,              // rad
    pub airspeed: f64,          // m/s
    pub turn_rate_max: f64,     // rad/s
    pub pitch_rate_max: f64,    // rad/s
    pub terrain_elevation: f64, // m, flat terrain under the aircraft
    target: Option<AttitudeCommand>,
}

impl SimAircraft {
    pub fn new(position: GeoPos, heading: f64, airspeed: f64) -> Self {
        Self {
            position,
            heading,
            pitch: 0.0,
            roll: 0.0,
            airspeed,
            turn_rate_max: 3.0_f64.to_radians(), // standard rate turn
            pitch_rate_max: 2.0_f64.to_radians(),
            terrain_elevation: 0.0,
            target: None,
        }
    }

    /// Velocity in the local east-north-up frame (m/s).
    pub fn velocity_enu(&self) -> Vector3<f64> {
        let course = true_course(self.heading);
        let ground_speed = self.airspeed * self.pitch.cos();
        Vector3::new(
            ground_speed * course.sin(),
            ground_speed * course.cos(),
            self.airspeed * self.pitch.sin(),
        )
    }

    pub fn sensors(&self) -> SensorState {
        SensorState {
            position: self.position,
            heading: self.heading,
            roll: self.roll,
            pitch: self.pitch,
            vertical_speed: self.velocity_enu().z,
            airspeed: self.airspeed,
            radar_altitude: self.position.alt - self.terrain_elevation,
        }
    }

    /// Advance the aircraft by `dt` seconds over a sphere of `radius`.
    pub fn step(&mut self, dt: f64, radius: f64) {
        if let Some(target) = self.target {
            let max_turn = self.turn_rate_max * dt;
            let d_heading = geodesy::wrap_pi(target.heading - self.heading).clamp(-max_turn, max_turn);
            self.heading = geodesy::wrap_pi(self.heading + d_heading);

            let max_pitch = self.pitch_rate_max * dt;
            self.pitch += (target.pitch - self.pitch).clamp(-max_pitch, max_pitch);
            self.roll = target.roll;
        }

        let v = self.velocity_enu();
        let horizontal = v.xy().norm();
        if horizontal > 1e-9 {
            let track = v.x.atan2(v.y);
            self.position = geodesy::destination(&self.position, track, horizontal * dt, radius);
        }
        self.position.alt += v.z * dt;
    }
}

impl AttitudeActuator for SimAircraft {
    fn command_attitude(&mut self, command: AttitudeCommand, _frame: AttitudeFrame) {
        self.target = Some(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::EARTH_RADIUS;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn heading_zero_flies_east() {
        let mut ac = SimAircraft::new(GeoPos::new(0.0, 0.0, 1000.0), 0.0, 100.0);
        for _ in 0..100 {
            ac.step(0.1, EARTH_RADIUS);
        }
        assert!(ac.position.lon > 0.0);
        assert!(ac.position.lat.abs() < 1e-9);
        let flown = geodesy::distance(&GeoPos::default(), &ac.position, EARTH_RADIUS);
        assert!((flown - 1000.0).abs() < 1e-3, "flew {} m", flown);
        assert!((ac.position.alt - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn turn_is_rate_limited() {
        let mut ac = SimAircraft::new(GeoPos::default(), 0.0, 100.0);
        ac.command_attitude(
            AttitudeCommand { roll: 0.0, pitch: 0.0, heading: FRAC_PI_2 },
            AttitudeFrame::EnuBody,
        );
        ac.step(1.0, EARTH_RADIUS);
        assert!((ac.heading - ac.turn_rate_max).abs() < 1e-12);
        for _ in 0..60 {
            ac.step(1.0, EARTH_RADIUS);
        }
        assert!((ac.heading - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn nose_up_climbs() {
        let mut ac = SimAircraft::new(GeoPos::new(0.0, 0.0, 500.0), 0.0, 80.0);
        ac.command_attitude(
            AttitudeCommand { roll: 0.0, pitch: 0.1, heading: 0.0 },
            AttitudeFrame::EnuBody,
        );
        for _ in 0..50 {
            ac.step(0.1, EARTH_RADIUS);
        }
        assert!(ac.sensors().vertical_speed > 0.0);
        assert!(ac.position.alt > 500.0);
    }
}
