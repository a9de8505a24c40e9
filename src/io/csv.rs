use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::sim::runner::TickRecord;

/// Write a closed-loop trace to CSV format.
///
/// Columns: time, lat_deg, lon_deg, alt_m, heading_deg, pitch_deg,
///          vs_mps, cmd_heading_deg, cmd_pitch_deg, xtk_m, dist_m,
///          vpath_err_deg, lateral_mode, vertical_mode, engaged, leg
///
/// Guidance columns are empty when no solution was available.
pub fn write_trace<W: Write>(writer: &mut W, records: &[TickRecord]) -> Result<()> {
    writeln!(
        writer,
        "time,lat_deg,lon_deg,alt_m,heading_deg,pitch_deg,vs_mps,\
         cmd_heading_deg,cmd_pitch_deg,xtk_m,dist_m,vpath_err_deg,\
         lateral_mode,vertical_mode,engaged,leg"
    )?;

    for r in records {
        let s = &r.sensors;
        let out = &r.output;
        let lateral = out.nav.lateral;
        writeln!(
            writer,
            "{:.2},{:.6},{:.6},{:.2},{:.2},{:.3},{:.3},\
             {:.2},{:.3},{},{},{},\
             {:?},{:?},{},{}",
            r.time,
            s.position.lat.to_degrees(),
            s.position.lon.to_degrees(),
            s.position.alt,
            s.heading.to_degrees(),
            s.pitch.to_degrees(),
            s.vertical_speed,
            out.command.heading.to_degrees(),
            out.command.pitch.to_degrees(),
            opt(lateral.map(|l| l.cross_track_error_m), 1),
            opt(lateral.map(|l| l.distance_to_target), 1),
            opt(out.nav.vertical_path_error.map(f64::to_degrees), 3),
            out.lateral_mode,
            out.vertical_mode,
            out.engaged as u8,
            out.active_leg.map(|i| i.to_string()).unwrap_or_default(),
        )?;
    }

    Ok(())
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map(|v| format!("{:.*}", precision, v)).unwrap_or_default()
}

/// Write a trace to a CSV file at the given path.
pub fn write_trace_file(path: impl AsRef<Path>, records: &[TickRecord]) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trace(&mut file, records)
}
