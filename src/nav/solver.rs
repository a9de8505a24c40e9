use tracing::trace;

use crate::fms::guidance::{GuidanceSnapshot, LateralPath};
use crate::fms::leg::{LegPhase, LegType};
use crate::geodesy::{self, GeoPos};
use super::runway::Runway;

// ---------------------------------------------------------------------------
// Navigation solution
// ---------------------------------------------------------------------------

/// Where the current lateral guidance comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LateralSource {
    #[default]
    None,
    FlightPlan,
    Approach,
}

/// Lateral guidance toward the current target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LateralGuidance {
    pub target: GeoPos,
    pub bearing_to_target: f64,   // rad [0, 2pi)
    pub distance_to_target: f64,  // m
    pub desired_track: f64,       // rad
    pub cross_track_error_m: f64, // positive = right of course
    pub cross_track_angle: f64,   // rad, same sign
}

/// Per-tick navigation output. Rebuilt from scratch every update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavSolution {
    pub source: LateralSource,
    pub lateral: Option<LateralGuidance>,
    /// Vertical path error, rad, positive = above path
    pub vertical_path_error: Option<f64>,
}

impl NavSolution {
    pub fn no_guidance() -> Self {
        Self::default()
    }

    pub fn has_guidance(&self) -> bool {
        self.lateral.is_some()
    }

    pub fn bearing_to_target(&self) -> Option<f64> {
        self.lateral.map(|l| l.bearing_to_target)
    }

    pub fn distance_to_target(&self) -> Option<f64> {
        self.lateral.map(|l| l.distance_to_target)
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct NavigationSolver {
    solution: NavSolution,
}

impl NavigationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solution(&self) -> &NavSolution {
        &self.solution
    }

    /// Solve against the flight plan's guidance snapshot.
    pub fn update(&mut self, aircraft: &GeoPos, snapshot: &GuidanceSnapshot, radius: f64) -> &NavSolution {
        self.solution = match &snapshot.lateral {
            None => NavSolution::no_guidance(),
            Some(path) => match path.leg_type {
                LegType::TrackToFix => solve_track_to_fix(aircraft, path, radius),
                LegType::DirectToFix
                | LegType::CourseToFix
                | LegType::ArcToFix
                | LegType::Hold
                | LegType::Vector => {
                    trace!(leg_type = ?path.leg_type, "no lateral solver for leg type");
                    NavSolution::no_guidance()
                }
            },
        };
        &self.solution
    }

    /// Solve against a selected approach runway: lateral guidance to the
    /// threshold along the extended centerline, vertical error from the
    /// glide path.
    pub fn update_approach(&mut self, aircraft: &GeoPos, runway: &Runway, radius: f64) -> &NavSolution {
        self.solution = NavSolution {
            source: LateralSource::Approach,
            lateral: Some(LateralGuidance {
                target: runway.threshold(),
                bearing_to_target: runway.bearing_from(aircraft),
                distance_to_target: runway.distance_from(aircraft, radius),
                desired_track: runway.effective_heading(),
                cross_track_error_m: runway.lateral_deviation_m(aircraft, radius),
                cross_track_angle: runway.lateral_deviation(aircraft, radius),
            }),
            vertical_path_error: Some(runway.vertical_deviation(aircraft, radius)),
        };
        &self.solution
    }

    pub fn reset(&mut self) {
        self.solution = NavSolution::no_guidance();
    }
}

// ---------------------------------------------------------------------------
// Per leg type solvers
// ---------------------------------------------------------------------------

fn solve_track_to_fix(aircraft: &GeoPos, path: &LateralPath, radius: f64) -> NavSolution {
    let origin = path.from.position;
    let target = path.to.position;

    let desired_track = path
        .desired_track
        .unwrap_or_else(|| geodesy::bearing(&origin, &target));

    let d13 = geodesy::central_angle(&origin, aircraft);
    let theta13 = geodesy::bearing(&origin, aircraft);
    let xtk = geodesy::cross_track_angle(d13, theta13, desired_track);

    let source = match path.phase {
        LegPhase::Approach | LegPhase::MissedApproach => LateralSource::Approach,
        _ => LateralSource::FlightPlan,
    };

    NavSolution {
        source,
        lateral: Some(LateralGuidance {
            target,
            bearing_to_target: geodesy::bearing(aircraft, &target),
            distance_to_target: geodesy::distance(aircraft, &target, radius),
            desired_track,
            cross_track_error_m: xtk * radius,
            cross_track_angle: xtk,
        }),
        // Vertical path construction is not modelled
        vertical_path_error: None,
    }
}
