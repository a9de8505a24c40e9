pub mod error;
pub mod config;
pub mod units;
pub mod geodesy;
pub mod nav;
pub mod fms;
pub mod aircraft;
mod gnc_mod;
pub mod sim;
pub mod io;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use config::AvionicsConfig;
pub use error::{AvionicsError, Result};
pub use sim::AvionicsComputer;
