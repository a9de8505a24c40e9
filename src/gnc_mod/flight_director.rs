use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::aircraft::{AttitudeCommand, SensorState, HEADING_FRAME_OFFSET};
use crate::config::AvionicsConfig;
use crate::nav::NavSolution;
use crate::units::UnitSystem;
use super::controller::Controller;
use super::pid::Pid;

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LateralMode {
    HeadingHold,
    /// Not yet distinct from heading hold
    Approach,
    Nav,
    #[default]
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalMode {
    AltitudeHold,
    VerticalSpeedHold,
    Vnav,
    #[default]
    Off,
}

/// Size of a selector nudge on the altitude knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetpointStep {
    Small,
    Large,
}

pub const MAX_PITCH_RAD: f64 = 0.5;
pub const VNAV_ERROR_SCALE: f64 = -10_000.0;

// ---------------------------------------------------------------------------
// Flight director: mode logic + cascaded altitude/vertical-speed loops
// ---------------------------------------------------------------------------

/// Turns the selected modes, setpoints and navigation solution into a
/// commanded roll/pitch/heading.
///
/// Vertical axis: altitude error (outer PID) -> target vertical speed,
/// clamped to the vertical-speed setpoint magnitude; vertical-speed error
/// (inner PID) -> pitch, clamped to the pitch limit. Lateral axis: hold the
/// sensed heading, or steer to the navigation bearing in NAV.
#[derive(Debug, Clone)]
pub struct FlightDirector {
    lateral_mode: LateralMode,
    vertical_mode: VerticalMode,
    target_altitude_m: f64,
    target_vs_mps: f64,
    altitude_pid: Pid,
    vs_pid: Pid,
    max_pitch_rad: f64,
    vnav_error_scale: f64,
    commanded_vs: f64,
    command: AttitudeCommand,
}

impl FlightDirector {
    pub fn new(config: &AvionicsConfig) -> Self {
        Self {
            lateral_mode: LateralMode::Off,
            vertical_mode: VerticalMode::Off,
            target_altitude_m: 0.0,
            target_vs_mps: 0.0,
            altitude_pid: Pid::from_gains(config.altitude_gains),
            vs_pid: Pid::from_gains(config.vertical_speed_gains),
            max_pitch_rad: config.max_pitch_rad,
            vnav_error_scale: config.vnav_error_scale,
            commanded_vs: 0.0,
            command: AttitudeCommand::neutral(),
        }
    }

    // -----------------------------------------------------------------------
    // Mode selection
    // -----------------------------------------------------------------------

    pub fn lateral_mode(&self) -> LateralMode {
        self.lateral_mode
    }

    pub fn vertical_mode(&self) -> VerticalMode {
        self.vertical_mode
    }

    pub fn set_lateral_mode(&mut self, mode: LateralMode) {
        if mode != self.lateral_mode {
            info!(from = ?self.lateral_mode, to = ?mode, "lateral mode selected");
            self.lateral_mode = mode;
        }
    }

    pub fn set_vertical_mode(&mut self, mode: VerticalMode) {
        if mode != self.vertical_mode {
            info!(from = ?self.vertical_mode, to = ?mode, "vertical mode selected");
            self.vertical_mode = mode;
        }
    }

    // -----------------------------------------------------------------------
    // Setpoints (SI internally, display units at the edges)
    // -----------------------------------------------------------------------

    pub fn target_altitude(&self) -> f64 {
        self.target_altitude_m
    }

    /// Altitude setpoint in metres; negative values are raised to zero.
    pub fn set_target_altitude(&mut self, meters: f64) {
        self.target_altitude_m = meters.max(0.0);
    }

    pub fn target_vertical_speed(&self) -> f64 {
        self.target_vs_mps
    }

    pub fn set_target_vertical_speed(&mut self, mps: f64) {
        self.target_vs_mps = mps;
    }

    /// Set the altitude from a display value (ft or m), rounded to 100.
    pub fn set_target_altitude_display(&mut self, value: f64, units: UnitSystem) {
        let meters = units.small_distance_to_m(value);
        self.set_target_altitude(units.round_altitude_m(meters));
    }

    /// Nudge the altitude setpoint by one selector step.
    pub fn step_target_altitude(&mut self, step: SetpointStep, up: bool, units: UnitSystem) {
        let (large, small) = units.altitude_steps_m();
        let delta = match step {
            SetpointStep::Large => large,
            SetpointStep::Small => small,
        };
        let delta = if up { delta } else { -delta };
        self.set_target_altitude(units.round_altitude_m(self.target_altitude_m + delta));
    }

    /// Set the vertical speed from a display value (fpm or m/s), rounded to a step.
    pub fn set_target_vertical_speed_display(&mut self, value: f64, units: UnitSystem) {
        let mps = units.small_speed_to_mps(value);
        self.target_vs_mps = units.round_vertical_speed_mps(mps);
    }

    pub fn step_target_vertical_speed(&mut self, up: bool, units: UnitSystem) {
        let step = units.vertical_speed_step_mps();
        let delta = if up { step } else { -step };
        self.target_vs_mps = units.round_vertical_speed_mps(self.target_vs_mps + delta);
    }

    // -----------------------------------------------------------------------
    // Outputs
    // -----------------------------------------------------------------------

    /// Last commanded roll/pitch/heading.
    pub fn command(&self) -> AttitudeCommand {
        self.command
    }

    /// Vertical speed requested of the inner loop on the last update (m/s).
    pub fn commanded_vertical_speed(&self) -> f64 {
        self.commanded_vs
    }

    // -----------------------------------------------------------------------
    // Per-tick update
    // -----------------------------------------------------------------------

    pub fn update(&mut self, sensors: &SensorState, nav: &NavSolution, dt: f64) -> AttitudeCommand {
        let bearing = nav.bearing_to_target();

        if bearing.is_none() {
            if self.lateral_mode == LateralMode::Nav {
                warn!("NAV has no bearing to target, reverting to heading hold");
                self.lateral_mode = LateralMode::HeadingHold;
            }
            if self.vertical_mode == VerticalMode::Vnav {
                warn!("VNAV has no active guidance, reverting to altitude hold");
                self.vertical_mode = VerticalMode::AltitudeHold;
            }
        }

        // Pitch
        let altitude = sensors.altitude();
        let current_vs = sensors.vertical_speed;
        match self.vertical_mode {
            VerticalMode::AltitudeHold => {
                let target_vs = self.outer_loop(self.target_altitude_m - altitude, dt);
                self.inner_loop(target_vs, current_vs, dt);
            }
            VerticalMode::VerticalSpeedHold => {
                self.inner_loop(self.target_vs_mps, current_vs, dt);
            }
            VerticalMode::Vnav => {
                let path_error = nav.vertical_path_error.unwrap_or(0.0);
                let target_vs = self.outer_loop(path_error * self.vnav_error_scale, dt);
                self.inner_loop(target_vs, current_vs, dt);
            }
            // The actuator cannot release a single axis, so pitch keeps its
            // last commanded value
            VerticalMode::Off => {}
        }

        // Heading
        self.command.heading = match (self.lateral_mode, bearing) {
            (LateralMode::Nav, Some(b)) => b - HEADING_FRAME_OFFSET,
            _ => sensors.heading,
        };
        self.command.roll = 0.0;

        debug!(
            lateral = ?self.lateral_mode,
            vertical = ?self.vertical_mode,
            target_alt = self.target_altitude_m,
            alt = altitude,
            target_vs = self.commanded_vs,
            vs = current_vs,
            pitch = self.command.pitch,
            heading = self.command.heading,
            "flight director"
        );

        self.command
    }

    /// Outer loop: error -> target vertical speed within the setpoint magnitude.
    fn outer_loop(&mut self, error: f64, dt: f64) -> f64 {
        let limit = self.target_vs_mps.abs();
        self.altitude_pid.update(error, dt).clamp(-limit, limit)
    }

    /// Inner loop: vertical speed error -> pitch within the pitch limit.
    fn inner_loop(&mut self, target_vs: f64, current_vs: f64, dt: f64) {
        self.commanded_vs = target_vs;
        let pitch = self.vs_pid.update(target_vs - current_vs, dt);
        self.command.pitch = pitch.clamp(-self.max_pitch_rad, self.max_pitch_rad);
    }

    pub fn reset(&mut self) {
        self.altitude_pid.reset();
        self.vs_pid.reset();
    }
}

impl Default for FlightDirector {
    fn default() -> Self {
        Self::new(&AvionicsConfig::default())
    }
}

impl Controller for FlightDirector {
    fn control(&mut self, sensors: &SensorState, nav: &NavSolution, dt: f64) -> AttitudeCommand {
        self.update(sensors, nav, dt)
    }

    fn reset(&mut self) {
        FlightDirector::reset(self);
    }

    fn name(&self) -> &str {
        "FlightDirector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::GeoPos;
    use crate::nav::{LateralGuidance, LateralSource};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn sensors(alt: f64, vs: f64, heading: f64) -> SensorState {
        SensorState {
            position: GeoPos::new(0.0, 0.0, alt),
            heading,
            vertical_speed: vs,
            airspeed: 100.0,
            radar_altitude: alt,
            ..Default::default()
        }
    }

    fn nav_with_bearing(bearing: f64, vertical_path_error: Option<f64>) -> NavSolution {
        NavSolution {
            source: LateralSource::FlightPlan,
            lateral: Some(LateralGuidance {
                target: GeoPos::default(),
                bearing_to_target: bearing,
                distance_to_target: 10_000.0,
                desired_track: bearing,
                cross_track_error_m: 0.0,
                cross_track_angle: 0.0,
            }),
            vertical_path_error,
        }
    }

    #[test]
    fn nav_without_guidance_falls_back_to_heading_hold() {
        let mut fd = FlightDirector::default();
        fd.set_lateral_mode(LateralMode::Nav);
        let s = sensors(1000.0, 0.0, 1.234);
        let cmd = fd.update(&s, &NavSolution::no_guidance(), 0.1);
        assert_eq!(fd.lateral_mode(), LateralMode::HeadingHold);
        assert_eq!(cmd.heading, 1.234);
    }

    #[test]
    fn nav_heading_is_bearing_minus_quarter_turn() {
        let mut fd = FlightDirector::default();
        fd.set_lateral_mode(LateralMode::Nav);
        let cmd = fd.update(&sensors(1000.0, 0.0, 0.3), &nav_with_bearing(PI, None), 0.1);
        assert_eq!(fd.lateral_mode(), LateralMode::Nav);
        assert_abs_diff_eq!(cmd.heading, PI - FRAC_PI_2, epsilon = 1e-12);

        // Not normalised: bearing 0 commands -pi/2
        let cmd = fd.update(&sensors(1000.0, 0.0, 0.3), &nav_with_bearing(0.0, None), 0.1);
        assert_abs_diff_eq!(cmd.heading, -FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn heading_hold_approach_and_off_track_sensed_heading() {
        for mode in [LateralMode::HeadingHold, LateralMode::Approach, LateralMode::Off] {
            let mut fd = FlightDirector::default();
            fd.set_lateral_mode(mode);
            let cmd = fd.update(&sensors(0.0, 0.0, -0.7), &nav_with_bearing(2.0, None), 0.1);
            assert_eq!(cmd.heading, -0.7, "{:?}", mode);
            assert_eq!(fd.lateral_mode(), mode);
        }
    }

    #[test]
    fn vnav_without_guidance_falls_back_to_altitude_hold() {
        let mut fd = FlightDirector::default();
        fd.set_vertical_mode(VerticalMode::Vnav);
        fd.set_target_altitude(2_000.0);
        fd.set_target_vertical_speed(5.0);
        let cmd = fd.update(&sensors(1_000.0, 0.0, 0.0), &NavSolution::no_guidance(), 0.1);
        assert_eq!(fd.vertical_mode(), VerticalMode::AltitudeHold);
        assert!(cmd.pitch > 0.0, "should climb toward the selected altitude");
    }

    #[test]
    fn altitude_hold_clamps_vertical_speed_and_pitch() {
        let mut fd = FlightDirector::default();
        fd.set_vertical_mode(VerticalMode::AltitudeHold);
        fd.set_target_altitude(10_000.0);
        fd.set_target_vertical_speed(-4.0); // magnitude is what matters
        let cmd = fd.update(&sensors(0.0, 0.0, 0.0), &NavSolution::no_guidance(), 0.1);
        assert_abs_diff_eq!(fd.commanded_vertical_speed(), 4.0, epsilon = 1e-12);
        assert!(cmd.pitch <= MAX_PITCH_RAD && cmd.pitch > 0.0);

        // Far above target: descend, but never beyond the pitch limit
        let cmd = fd.update(&sensors(50_000.0, 200.0, 0.0), &NavSolution::no_guidance(), 0.1);
        assert_abs_diff_eq!(fd.commanded_vertical_speed(), -4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cmd.pitch, -MAX_PITCH_RAD, epsilon = 1e-12);
    }

    #[test]
    fn vertical_speed_hold_uses_setpoint_directly() {
        let mut fd = FlightDirector::default();
        fd.set_vertical_mode(VerticalMode::VerticalSpeedHold);
        fd.set_target_vertical_speed(-3.0);
        let cmd = fd.update(&sensors(1_000.0, 0.0, 0.0), &NavSolution::no_guidance(), 0.1);
        assert_eq!(fd.commanded_vertical_speed(), -3.0);
        assert!(cmd.pitch < 0.0);
    }

    #[test]
    fn vnav_descends_when_above_path() {
        let mut fd = FlightDirector::default();
        fd.set_vertical_mode(VerticalMode::Vnav);
        fd.set_target_vertical_speed(5.0);
        let cmd = fd.update(&sensors(1_000.0, 0.0, 0.0), &nav_with_bearing(0.0, Some(0.01)), 0.1);
        assert_eq!(fd.vertical_mode(), VerticalMode::Vnav);
        assert_abs_diff_eq!(fd.commanded_vertical_speed(), -5.0, epsilon = 1e-12);
        assert!(cmd.pitch < 0.0);
    }

    #[test]
    fn vertical_off_keeps_last_pitch() {
        let mut fd = FlightDirector::default();
        fd.set_vertical_mode(VerticalMode::VerticalSpeedHold);
        fd.set_target_vertical_speed(2.0);
        let climbing = fd.update(&sensors(0.0, 0.0, 0.0), &NavSolution::no_guidance(), 0.1).pitch;
        fd.set_vertical_mode(VerticalMode::Off);
        let cmd = fd.update(&sensors(0.0, 50.0, 0.0), &NavSolution::no_guidance(), 0.1);
        assert_eq!(cmd.pitch, climbing);
    }

    #[test]
    fn reset_through_controller_trait() {
        let mut fd = FlightDirector::default();
        fd.set_vertical_mode(VerticalMode::VerticalSpeedHold);
        fd.set_target_vertical_speed(0.05);
        let first = fd.update(&sensors(0.0, 0.0, 0.0), &NavSolution::no_guidance(), 0.1).pitch;
        let second = fd.update(&sensors(0.0, 0.0, 0.0), &NavSolution::no_guidance(), 0.1).pitch;
        assert_ne!(first, second, "derivative kick only on the first sample");

        let ctl: &mut dyn Controller = &mut fd;
        ctl.reset();
        assert_eq!(ctl.name(), "FlightDirector");
        let again = ctl.control(&sensors(0.0, 0.0, 0.0), &NavSolution::no_guidance(), 0.1).pitch;
        assert_eq!(again, first);
    }

    #[test]
    fn setpoint_selectors_work_in_display_units() {
        let mut fd = FlightDirector::default();
        let units = UnitSystem::NauticalMiles;
        fd.step_target_altitude(SetpointStep::Large, true, units);
        fd.step_target_altitude(SetpointStep::Small, true, units);
        assert_abs_diff_eq!(units.small_distance(fd.target_altitude()), 1_100.0, epsilon = 1e-6);

        fd.step_target_altitude(SetpointStep::Large, false, units);
        fd.step_target_altitude(SetpointStep::Large, false, units);
        assert_eq!(fd.target_altitude(), 0.0, "altitude never goes negative");

        fd.set_target_altitude_display(4_567.0, UnitSystem::Kilometers);
        assert_abs_diff_eq!(fd.target_altitude(), 4_600.0, epsilon = 1e-9);

        fd.set_target_vertical_speed_display(-740.0, units);
        assert_abs_diff_eq!(units.small_speed(fd.target_vertical_speed()), -700.0, epsilon = 1e-6);
        fd.step_target_vertical_speed(false, units);
        assert_abs_diff_eq!(units.small_speed(fd.target_vertical_speed()), -800.0, epsilon = 1e-6);
    }
}
