pub mod controller;
pub mod pid;
pub mod flight_director;
pub mod autopilot;

pub use controller::Controller;
pub use pid::Pid;
pub use flight_director::{FlightDirector, LateralMode, SetpointStep, VerticalMode, MAX_PITCH_RAD, VNAV_ERROR_SCALE};
pub use autopilot::{AttitudeActuator, AttitudeFrame, Autopilot, RecordingActuator};
