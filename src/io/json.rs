use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::geodesy::{self, EARTH_RADIUS};
use crate::gnc::{LateralMode, VerticalMode};
use crate::nav::Airport;
use crate::sim::event::FlightEvent;
use crate::sim::runner::TickRecord;

// ---------------------------------------------------------------------------
// Airport database
// ---------------------------------------------------------------------------

/// Parse an airport database: a JSON array of airport records.
pub fn parse_airports(json: &str) -> Result<Vec<Airport>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_airports(path: impl AsRef<Path>) -> Result<Vec<Airport>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let airports = parse_airports(&text)?;
    let runways: usize = airports.iter().map(|a| a.runways.len()).sum();
    info!(path = %path.display(), airports = airports.len(), runways, "loaded airport database");
    Ok(airports)
}

// ---------------------------------------------------------------------------
// Flight summary
// ---------------------------------------------------------------------------

/// Summary statistics computed from a closed-loop run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightSummary {
    pub flight_time_s: f64,
    pub ground_distance_m: f64,
    pub start_alt_m: f64,
    pub final_alt_m: f64,
    pub max_alt_m: f64,
    pub min_alt_m: f64,
    pub max_pitch_cmd_deg: f64,
    pub final_active_leg: Option<usize>,
    pub final_lateral_mode: LateralMode,
    pub final_vertical_mode: VerticalMode,
    pub engaged_at_end: bool,
    pub events: Vec<FlightEvent>,
}

impl FlightSummary {
    /// Compute a summary from tick records. `None` for an empty run.
    pub fn from_records(records: &[TickRecord], events: Vec<FlightEvent>) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;

        let ground_distance_m = records
            .windows(2)
            .map(|w| geodesy::distance(&w[0].sensors.position, &w[1].sensors.position, EARTH_RADIUS))
            .sum();

        let alts = records.iter().map(|r| r.sensors.altitude());
        let max_alt_m = alts.clone().fold(f64::NEG_INFINITY, f64::max);
        let min_alt_m = alts.fold(f64::INFINITY, f64::min);

        let max_pitch_cmd = records
            .iter()
            .map(|r| r.output.command.pitch.abs())
            .fold(0.0_f64, f64::max);

        Some(FlightSummary {
            flight_time_s: last.time,
            ground_distance_m,
            start_alt_m: first.sensors.altitude(),
            final_alt_m: last.sensors.altitude(),
            max_alt_m,
            min_alt_m,
            max_pitch_cmd_deg: max_pitch_cmd.to_degrees(),
            final_active_leg: last.output.active_leg,
            final_lateral_mode: last.output.lateral_mode,
            final_vertical_mode: last.output.vertical_mode,
            engaged_at_end: last.output.engaged,
            events,
        })
    }
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, name: &str, summary: &FlightSummary) -> Result<()> {
    #[derive(Serialize)]
    struct Document<'a> {
        name: &'a str,
        summary: &'a FlightSummary,
    }
    serde_json::to_writer_pretty(&mut *writer, &Document { name, summary })?;
    writeln!(writer)?;
    Ok(())
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, name: &str, summary: &FlightSummary) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, name, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::{AttitudeCommand, SensorState};
    use crate::geodesy::GeoPos;
    use crate::nav::{find_airport, NavSolution};
    use crate::sim::computer::TickOutput;
    use crate::sim::event::EventKind;

    const DB: &str = r#"[
        {
            "Ident": "TEST",
            "Name": "Test Field",
            "Latitude_deg": 10.0,
            "longitude_deg": 20.0,
            "Runways": [
                {
                    "Length_m": 2000.0,
                    "Width_m": 45.0,
                    "Surface": "ASP",
                    "Le_Ident": "09",
                    "Le_Latitude_rad": 0.1745,
                    "Le_Longitude_rad": 0.3490,
                    "Le_Elevation_m": 100.0,
                    "Le_True_Heading_rad": 1.5708,
                    "He_Ident": "27",
                    "He_Latitude_rad": 0.1745,
                    "He_Longitude_rad": 0.3493,
                    "He_Elevation_m": 100.0,
                    "Use_LE": true,
                    "glideSlopeRad": 0.0524
                }
            ]
        },
        { "Ident": "NORW", "Name": "No Runways", "Latitude_deg": 0.0, "longitude_deg": 0.0, "Runways": [] }
    ]"#;

    fn record(time: f64, lon: f64, alt: f64, pitch: f64) -> TickRecord {
        TickRecord {
            time,
            sensors: SensorState { position: GeoPos::new(0.0, lon, alt), ..Default::default() },
            output: TickOutput {
                nav: NavSolution::no_guidance(),
                command: AttitudeCommand { roll: 0.0, pitch, heading: 0.0 },
                lateral_mode: LateralMode::Nav,
                vertical_mode: VerticalMode::AltitudeHold,
                engaged: true,
                active_leg: Some(0),
            },
        }
    }

    #[test]
    fn parses_airport_database() {
        let airports = parse_airports(DB).unwrap();
        assert_eq!(airports.len(), 2);
        let test = find_airport(&airports, "test").unwrap();
        assert_eq!(test.runways.len(), 1);
        assert_eq!(test.runways[0].ident(), "09");
    }

    #[test]
    fn rejects_malformed_database() {
        assert!(parse_airports("[{ \"Ident\": 3 }]").is_err());
    }

    #[test]
    fn summary_from_records() {
        let records = vec![
            record(0.0, 0.0, 1000.0, 0.1),
            record(10.0, 0.0001, 1200.0, -0.3),
            record(20.0, 0.0002, 1100.0, 0.0),
        ];
        let s = FlightSummary::from_records(&records, vec![]).unwrap();
        assert_eq!(s.flight_time_s, 20.0);
        assert_eq!(s.max_alt_m, 1200.0);
        assert_eq!(s.min_alt_m, 1000.0);
        assert!((s.ground_distance_m - 0.0002 * EARTH_RADIUS).abs() < 1e-3);
        assert!((s.max_pitch_cmd_deg - 0.3_f64.to_degrees()).abs() < 1e-9);
        assert!(FlightSummary::from_records(&[], vec![]).is_none());
    }

    #[test]
    fn json_output_is_valid() {
        let records = vec![record(0.0, 0.0, 500.0, 0.0), record(1.0, 0.0, 510.0, 0.0)];
        let events = vec![FlightEvent { time: 1.0, kind: EventKind::AutopilotEngaged, altitude: 510.0 }];
        let summary = FlightSummary::from_records(&records, events).unwrap();

        let mut buf = Vec::new();
        write_summary(&mut buf, "Test", &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["name"], "Test");
        assert_eq!(value["summary"]["final_alt_m"], 510.0);
        assert_eq!(value["summary"]["final_lateral_mode"], "Nav");
        assert_eq!(value["summary"]["events"][0]["kind"], "AutopilotEngaged");
    }
}
