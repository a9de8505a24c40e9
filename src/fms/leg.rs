use crate::geodesy::GeoPos;
use crate::nav::runway::Runway;

// ---------------------------------------------------------------------------
// Waypoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub name: String,
    pub position: GeoPos,
    pub altitude_constraint: Option<f64>, // m MSL
    pub speed_constraint: Option<f64>,    // m/s
}

impl Waypoint {
    pub fn new(name: impl Into<String>, position: GeoPos) -> Self {
        Self {
            name: name.into(),
            position,
            altitude_constraint: None,
            speed_constraint: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Leg classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegType {
    /// Great-circle track between two fixes
    TrackToFix,
    /// From present position to a fix
    DirectToFix,
    /// Intercept and follow a course to a fix
    CourseToFix,
    /// DME arc
    ArcToFix,
    Hold,
    /// Radar vector (heading only)
    Vector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegPhase {
    Departure,
    #[default]
    Enroute,
    Arrival,
    Approach,
    MissedApproach,
    Hold,
}

// ---------------------------------------------------------------------------
// Flight plan leg
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlanLeg {
    pub leg_type: LegType,
    pub phase: LegPhase,
    pub from: Waypoint,
    pub to: Waypoint,
    pub runway: Option<Runway>,
    pub at_or_above_alt_msl: Option<f64>, // m
    pub at_or_below_alt_msl: Option<f64>, // m
    pub speed_limit: Option<f64>,         // m/s
}

impl FlightPlanLeg {
    pub fn track_to_fix(from: Waypoint, to: Waypoint) -> Self {
        LegBuilder::new(LegType::TrackToFix, from, to).build()
    }

    /// Altitude the vertical path should aim for: the at-or-below
    /// constraint wins over at-or-above.
    pub fn target_altitude(&self) -> Option<f64> {
        self.at_or_below_alt_msl.or(self.at_or_above_alt_msl)
    }
}

// ---------------------------------------------------------------------------
// Leg builder
// ---------------------------------------------------------------------------

pub struct LegBuilder {
    leg_type: LegType,
    phase: LegPhase,
    from: Waypoint,
    to: Waypoint,
    runway: Option<Runway>,
    at_or_above_alt_msl: Option<f64>,
    at_or_below_alt_msl: Option<f64>,
    speed_limit: Option<f64>,
}

impl LegBuilder {
    pub fn new(leg_type: LegType, from: Waypoint, to: Waypoint) -> Self {
        Self {
            leg_type,
            phase: LegPhase::Enroute,
            from,
            to,
            runway: None,
            at_or_above_alt_msl: None,
            at_or_below_alt_msl: None,
            speed_limit: None,
        }
    }

    pub fn phase(mut self, v: LegPhase) -> Self { self.phase = v; self }
    pub fn runway(mut self, v: Runway) -> Self { self.runway = Some(v); self }
    pub fn at_or_above(mut self, v: f64) -> Self { self.at_or_above_alt_msl = Some(v); self }
    pub fn at_or_below(mut self, v: f64) -> Self { self.at_or_below_alt_msl = Some(v); self }
    pub fn speed_limit(mut self, v: f64) -> Self { self.speed_limit = Some(v); self }

    pub fn build(self) -> FlightPlanLeg {
        FlightPlanLeg {
            leg_type: self.leg_type,
            phase: self.phase,
            from: self.from,
            to: self.to,
            runway: self.runway,
            at_or_above_alt_msl: self.at_or_above_alt_msl,
            at_or_below_alt_msl: self.at_or_below_alt_msl,
            speed_limit: self.speed_limit,
        }
    }
}
