use crate::aircraft::{AttitudeCommand, SensorState};
use crate::nav::NavSolution;

/// Trait for attitude-commanding flight controllers.
///
/// Implement this to plug a different control law between the navigation
/// solver and the autopilot.
pub trait Controller {
    /// Compute the commanded attitude for this tick. `dt` must be positive.
    fn control(&mut self, sensors: &SensorState, nav: &NavSolution, dt: f64) -> AttitudeCommand;

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
