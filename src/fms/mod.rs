pub mod leg;
pub mod flight_plan;
pub mod guidance;

pub use leg::{FlightPlanLeg, LegBuilder, LegPhase, LegType, Waypoint};
pub use flight_plan::FlightPlan;
pub use guidance::{build_guidance_snapshot, GuidanceSnapshot, LateralPath, VerticalPath};
