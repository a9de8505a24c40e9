use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aircraft::{SensorState, SimAircraft};
use crate::error::{AvionicsError, Result};
use crate::geodesy::EARTH_RADIUS;
use super::computer::{AvionicsComputer, TickOutput};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub dt: f64,       // s
    pub max_time: f64, // s
    pub radius: f64,   // m, planet radius
    /// Hands-off until this run time, then the autopilot engages (s)
    pub engage_at: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { dt: 0.1, max_time: 600.0, radius: EARTH_RADIUS, engage_at: None }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(AvionicsError::InvalidConfig(format!("dt must be positive, got {}", self.dt)));
        }
        if !(self.max_time >= 0.0 && self.max_time.is_finite()) {
            return Err(AvionicsError::InvalidConfig(format!(
                "max_time must be finite and non-negative, got {}",
                self.max_time
            )));
        }
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(AvionicsError::InvalidConfig(format!("radius must be positive, got {}", self.radius)));
        }
        if let Some(t) = self.engage_at {
            if !t.is_finite() {
                return Err(AvionicsError::InvalidConfig(format!("engage_at must be finite, got {}", t)));
            }
        }
        Ok(())
    }
}

/// One tick of a closed-loop run: the sensors the computer saw and what it
/// produced from them.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRecord {
    pub time: f64,
    pub sensors: SensorState,
    pub output: TickOutput,
}

// ---------------------------------------------------------------------------
// Closed-loop run
// ---------------------------------------------------------------------------

/// Fly `aircraft` under `computer` until `max_time` or until it reaches the
/// ground. The aircraft is the actuator: engaged commands become its
/// attitude targets.
pub fn simulate(
    computer: &mut AvionicsComputer,
    aircraft: &mut SimAircraft,
    config: &SimConfig,
) -> Result<Vec<TickRecord>> {
    config.validate()?;

    let capacity = (config.max_time / config.dt) as usize + 1;
    let mut records = Vec::with_capacity(capacity.min(200_000));
    let mut handed_off = false;

    let mut time = 0.0;
    while time < config.max_time {
        // Scheduled hand-off
        if !handed_off && config.engage_at.is_some_and(|t| time >= t) {
            handed_off = true;
            computer.engage_autopilot();
            info!(time, "autopilot engaged");
        }

        let sensors = aircraft.sensors();
        let output = computer.tick(&sensors, config.dt, config.radius, aircraft);
        records.push(TickRecord { time, sensors, output });

        aircraft.step(config.dt, config.radius);
        time += config.dt;

        // Ground contact
        if aircraft.sensors().radar_altitude <= 0.0 {
            break;
        }
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
