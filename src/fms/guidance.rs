use crate::geodesy::{self, GeoPos};
use super::leg::{FlightPlanLeg, LegPhase, LegType, Waypoint};

// ---------------------------------------------------------------------------
// Guidance snapshot: per-tick projection of the active leg
// ---------------------------------------------------------------------------

/// Lateral path for the active leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LateralPath {
    pub leg_type: LegType,
    pub phase: LegPhase,
    pub from: Waypoint,
    pub to: Waypoint,
    /// Desired great-circle track, rad. None where the leg geometry is not
    /// modelled (arcs).
    pub desired_track: Option<f64>,
}

/// Vertical path for the active leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalPath {
    pub target_altitude: f64, // m MSL
    pub path_slope: Option<f64>, // rad, no descent profile is built yet
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuidanceSnapshot {
    pub lateral: Option<LateralPath>,
    pub vertical: Option<VerticalPath>,
    pub in_approach: bool,
    pub in_hold: bool,
}

impl GuidanceSnapshot {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Project the active leg into lateral/vertical guidance.
///
/// Only the leg's own data and the aircraft position are read; nothing is
/// mutated.
pub fn build_guidance_snapshot(leg: Option<&FlightPlanLeg>, aircraft: &GeoPos) -> GuidanceSnapshot {
    let Some(leg) = leg else {
        return GuidanceSnapshot::none();
    };

    let desired_track = match leg.leg_type {
        // CourseToFix, Hold and Vector have no geometry of their own yet and
        // borrow the from->to track
        LegType::TrackToFix | LegType::CourseToFix | LegType::Hold | LegType::Vector => {
            Some(geodesy::bearing(&leg.from.position, &leg.to.position))
        }
        // No fixed origin: always steer from present position
        LegType::DirectToFix => Some(geodesy::bearing(aircraft, &leg.to.position)),
        LegType::ArcToFix => None,
    };

    let lateral = LateralPath {
        leg_type: leg.leg_type,
        phase: leg.phase,
        from: leg.from.clone(),
        to: leg.to.clone(),
        desired_track,
    };

    let vertical = leg.target_altitude().map(|target_altitude| VerticalPath {
        target_altitude,
        path_slope: None,
    });

    GuidanceSnapshot {
        lateral: Some(lateral),
        vertical,
        in_approach: matches!(leg.phase, LegPhase::Approach | LegPhase::MissedApproach),
        in_hold: leg.leg_type == LegType::Hold || leg.phase == LegPhase::Hold,
    }
}
