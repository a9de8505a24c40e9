pub mod csv;
pub mod json;

pub use csv::{write_trace, write_trace_file};
pub use json::{load_airports, parse_airports, write_summary, write_summary_file, FlightSummary};
