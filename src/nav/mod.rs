pub mod airport;
pub mod runway;
pub mod solver;

pub use airport::{find_airport, nearest_airport, Airport};
pub use runway::{Runway, RunwayEnd};
pub use solver::{LateralGuidance, LateralSource, NavSolution, NavigationSolver};
