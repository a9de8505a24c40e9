use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AvionicsError, Result};
use crate::gnc::{MAX_PITCH_RAD, VNAV_ERROR_SCALE};
use crate::units::UnitSystem;

// ---------------------------------------------------------------------------
// PID gains
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Avionics configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvionicsConfig {
    pub units: UnitSystem,
    /// Outer loop: altitude error (m) -> target vertical speed (m/s)
    pub altitude_gains: PidGains,
    /// Inner loop: vertical speed error (m/s) -> pitch (rad)
    pub vertical_speed_gains: PidGains,
    pub max_pitch_rad: f64,
    /// Multiplier applied to the vertical path error in VNAV. Tuning constant.
    pub vnav_error_scale: f64,
    /// Glide path given to a newly selected approach runway, deg
    pub glide_path_deg: f64,
    /// Capture radius for automatic leg sequencing, m. None disables it.
    pub sequence_radius_m: Option<f64>,
}

impl Default for AvionicsConfig {
    fn default() -> Self {
        Self {
            units: UnitSystem::NauticalMiles,
            altitude_gains: PidGains::new(0.1, 0.0, 0.2),
            vertical_speed_gains: PidGains::new(0.3, 0.0, 0.5),
            max_pitch_rad: MAX_PITCH_RAD, // ~28.6 deg
            vnav_error_scale: VNAV_ERROR_SCALE,
            glide_path_deg: 3.0,
            sequence_radius_m: None,
        }
    }
}

impl AvionicsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AvionicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), units = ?config.units, "loaded avionics config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_pitch_rad > 0.0 && self.max_pitch_rad.is_finite()) {
            return Err(AvionicsError::InvalidConfig(format!(
                "max_pitch_rad must be positive, got {}",
                self.max_pitch_rad
            )));
        }
        if !self.altitude_gains.is_finite() || !self.vertical_speed_gains.is_finite() {
            return Err(AvionicsError::InvalidConfig("PID gains must be finite".into()));
        }
        if !self.vnav_error_scale.is_finite() || !self.glide_path_deg.is_finite() {
            return Err(AvionicsError::InvalidConfig(
                "vnav_error_scale and glide_path_deg must be finite".into(),
            ));
        }
        if let Some(r) = self.sequence_radius_m {
            if !(r > 0.0) {
                return Err(AvionicsError::InvalidConfig(format!(
                    "sequence_radius_m must be positive, got {}",
                    r
                )));
            }
        }
        Ok(())
    }
}
