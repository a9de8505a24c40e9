pub mod state;
pub mod kinematic;

pub use state::{true_course, AttitudeCommand, SensorState, HEADING_FRAME_OFFSET};
pub use kinematic::SimAircraft;
