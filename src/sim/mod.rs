pub mod computer;
pub mod runner;
pub mod event;

pub use computer::{AvionicsComputer, TickOutput};
pub use runner::{simulate, SimConfig, TickRecord};
pub use event::{detect_events, standard_detectors, AltitudeDetector, EventDetector, EventKind, FlightEvent};
