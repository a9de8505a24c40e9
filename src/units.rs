use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Conversion factors
// ---------------------------------------------------------------------------

pub const MI_TO_M: f64 = 1609.34;
pub const KM_TO_M: f64 = 1000.0;
pub const NM_TO_M: f64 = 1852.0;
pub const M_TO_FT: f64 = 3.28084;
pub const MPS_TO_FPM: f64 = 196.850_394;
pub const MPS_TO_KPH: f64 = 3.6;
pub const MPS_TO_MPH: f64 = 2.236_94;
pub const MPS_TO_KNOT: f64 = 1.943_84;

// ---------------------------------------------------------------------------
// Display unit system
// ---------------------------------------------------------------------------

/// Unit system used for pilot-facing values (setpoints, distances).
///
/// Internally everything is SI; this only selects the display scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// mi, ft, fpm, mph
    StatuteMiles,
    /// km, m, m/s, kph
    Kilometers,
    /// nm, ft, fpm, kt
    #[default]
    NauticalMiles,
}

impl UnitSystem {
    /// Metres -> mi / km / nm.
    pub fn big_distance(self, meters: f64) -> f64 {
        meters / self.big_distance_factor()
    }

    pub fn big_distance_to_m(self, value: f64) -> f64 {
        value * self.big_distance_factor()
    }

    fn big_distance_factor(self) -> f64 {
        match self {
            UnitSystem::StatuteMiles => MI_TO_M,
            UnitSystem::Kilometers => KM_TO_M,
            UnitSystem::NauticalMiles => NM_TO_M,
        }
    }

    /// Metres -> ft (imperial systems) or m.
    pub fn small_distance(self, meters: f64) -> f64 {
        match self {
            UnitSystem::Kilometers => meters,
            _ => meters * M_TO_FT,
        }
    }

    pub fn small_distance_to_m(self, value: f64) -> f64 {
        match self {
            UnitSystem::Kilometers => value,
            _ => value / M_TO_FT,
        }
    }

    /// m/s -> fpm (imperial systems) or m/s.
    pub fn small_speed(self, mps: f64) -> f64 {
        match self {
            UnitSystem::Kilometers => mps,
            _ => mps * MPS_TO_FPM,
        }
    }

    pub fn small_speed_to_mps(self, value: f64) -> f64 {
        match self {
            UnitSystem::Kilometers => value,
            _ => value / MPS_TO_FPM,
        }
    }

    /// m/s -> mph / kph / kt.
    pub fn big_speed(self, mps: f64) -> f64 {
        mps * self.big_speed_factor()
    }

    pub fn big_speed_to_mps(self, value: f64) -> f64 {
        value / self.big_speed_factor()
    }

    fn big_speed_factor(self) -> f64 {
        match self {
            UnitSystem::StatuteMiles => MPS_TO_MPH,
            UnitSystem::Kilometers => MPS_TO_KPH,
            UnitSystem::NauticalMiles => MPS_TO_KNOT,
        }
    }

    // -----------------------------------------------------------------------
    // Setpoint stepping
    // -----------------------------------------------------------------------

    /// (large, small) altitude selector steps in metres: 1000/100 display units.
    pub fn altitude_steps_m(self) -> (f64, f64) {
        (self.small_distance_to_m(1000.0), self.small_distance_to_m(100.0))
    }

    /// Vertical-speed selector step: 1 m/s metric, 100 fpm otherwise.
    pub fn vertical_speed_step_mps(self) -> f64 {
        match self {
            UnitSystem::Kilometers => 1.0,
            _ => self.small_speed_to_mps(100.0),
        }
    }

    /// Round an altitude setpoint to the nearest 100 display units.
    pub fn round_altitude_m(self, meters: f64) -> f64 {
        let display = self.small_distance(meters);
        self.small_distance_to_m((display / 100.0).round() * 100.0)
    }

    /// Round a vertical-speed setpoint to the nearest selector step.
    pub fn round_vertical_speed_mps(self, mps: f64) -> f64 {
        let step = self.small_speed(self.vertical_speed_step_mps());
        let display = self.small_speed(mps);
        self.small_speed_to_mps((display / step).round() * step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn big_distance_roundtrip() {
        for units in [UnitSystem::StatuteMiles, UnitSystem::Kilometers, UnitSystem::NauticalMiles] {
            let v = units.big_distance(12_345.0);
            assert_relative_eq!(units.big_distance_to_m(v), 12_345.0, epsilon = 1e-9);
        }
        assert_relative_eq!(UnitSystem::NauticalMiles.big_distance(1852.0), 1.0);
    }

    #[test]
    fn altitude_rounds_in_display_units() {
        // 3048 m = 10,000 ft exactly (to converter precision)
        let rounded = UnitSystem::NauticalMiles.round_altitude_m(3040.0);
        assert_relative_eq!(UnitSystem::NauticalMiles.small_distance(rounded), 10_000.0, epsilon = 1e-6);
        assert_relative_eq!(UnitSystem::Kilometers.round_altitude_m(1449.0), 1400.0);
    }

    #[test]
    fn vertical_speed_steps() {
        assert_relative_eq!(UnitSystem::Kilometers.vertical_speed_step_mps(), 1.0);
        let fpm = UnitSystem::StatuteMiles.small_speed(UnitSystem::StatuteMiles.vertical_speed_step_mps());
        assert_relative_eq!(fpm, 100.0, epsilon = 1e-9);
        let vs = UnitSystem::NauticalMiles.round_vertical_speed_mps(5.2); // ~1024 fpm
        assert_relative_eq!(UnitSystem::NauticalMiles.small_speed(vs), 1000.0, epsilon = 1e-6);
    }
}
