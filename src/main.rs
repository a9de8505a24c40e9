use std::process;

use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use avionics_gnc::aircraft::SimAircraft;
use avionics_gnc::config::AvionicsConfig;
use avionics_gnc::fms::{FlightPlan, FlightPlanLeg, LegBuilder, LegPhase, LegType, Waypoint};
use avionics_gnc::geodesy::GeoPos;
use avionics_gnc::gnc::{LateralMode, VerticalMode};
use avionics_gnc::io;
use avionics_gnc::nav::{self, Runway, RunwayEnd};
use avionics_gnc::sim::{self, AvionicsComputer, SimConfig};
use avionics_gnc::Result;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    airports: Option<String>,
    airport: Option<String>,
    runway: usize,
    csv: Option<String>,
    summary: Option<String>,
    max_time: Option<f64>,
}

fn parse_args() -> Args {
    let raw: Vec<String> = std::env::args().collect();
    let mut args = Args::default();

    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                args.config = Some(string_arg(&raw, i, "config"));
            }
            "--airports" => {
                i += 1;
                args.airports = Some(string_arg(&raw, i, "airports"));
            }
            "--airport" => {
                i += 1;
                args.airport = Some(string_arg(&raw, i, "airport"));
            }
            "--runway" => {
                i += 1;
                args.runway = parsed_arg(&raw, i, "runway");
            }
            "--csv" => {
                i += 1;
                args.csv = Some(string_arg(&raw, i, "csv"));
            }
            "--summary" => {
                i += 1;
                args.summary = Some(string_arg(&raw, i, "summary"));
            }
            "-t" | "--max-time" => {
                i += 1;
                args.max_time = Some(parsed_arg(&raw, i, "max-time"));
            }
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn string_arg(raw: &[String], i: usize, name: &str) -> String {
    raw.get(i).cloned().unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn parsed_arg<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    string_arg(raw, i, name).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: avionics-gnc [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 -c, --config <FILE>     Avionics config JSON\n\
         \x20 --airports <FILE>       Airport database JSON\n\
         \x20 --airport <IDENT>       Approach airport (default: nearest with runways)\n\
         \x20 --runway <N>            Runway index at that airport (default: 0)\n\
         \x20 --csv <FILE>            Write the tick trace as CSV\n\
         \x20 --summary <FILE>        Write the flight summary as JSON\n\
         \x20 -t, --max-time <S>      Simulated time (default: 1200)\n\
         \x20 -h, --help              Show this help"
    );
}

// ---------------------------------------------------------------------------
// Demo scenario
// ---------------------------------------------------------------------------

const TARGET_ALT_M: f64 = 1500.0;

/// Runway used when no airport database is given: 09/27, 2.2 km, at 47N 8E.
fn demo_runway() -> Runway {
    let le = GeoPos::from_degrees(47.0, 7.95, 400.0);
    let he = GeoPos::from_degrees(47.0, 7.979, 400.0);
    let mut rwy = Runway::new(
        RunwayEnd { ident: "09".into(), position: le, true_heading: 90_f64.to_radians() },
        RunwayEnd { ident: "27".into(), position: he, true_heading: 270_f64.to_radians() },
    );
    rwy.length_m = 2200.0;
    rwy.width_m = 45.0;
    rwy.surface = "ASP".into();
    rwy
}

/// Two enroute legs to a fix on the extended centerline, then the final
/// approach course to the threshold.
fn demo_plan(runway: &Runway) -> FlightPlan {
    let threshold = runway.threshold();
    let offset = |dlat_deg: f64, dlon_deg: f64| {
        GeoPos::new(
            threshold.lat + dlat_deg.to_radians(),
            threshold.lon + dlon_deg.to_radians(),
            1500.0,
        )
    };
    let wp1 = Waypoint::new("ALPHA", offset(0.0, -0.45));
    let wp2 = Waypoint::new("BRAVO", offset(0.10, -0.25));
    let wp3 = Waypoint::new("CHARL", offset(0.0, -0.15));

    FlightPlan::from_legs(vec![
        FlightPlanLeg::track_to_fix(wp1, wp2.clone()),
        LegBuilder::new(LegType::TrackToFix, wp2, wp3.clone())
            .phase(LegPhase::Arrival)
            .at_or_below(1500.0)
            .build(),
        LegBuilder::new(LegType::CourseToFix, wp3, Waypoint::new(runway.ident(), threshold))
            .phase(LegPhase::Approach)
            .runway(runway.clone())
            .build(),
    ])
}

fn select_runway(args: &Args) -> Result<Runway> {
    let Some(path) = &args.airports else {
        return Ok(demo_runway());
    };
    let airports = io::load_airports(path)?;
    let airport = match &args.airport {
        Some(ident) => nav::find_airport(&airports, ident),
        None => nav::nearest_airport(&demo_runway().threshold(), &airports),
    };
    let runway = airport.and_then(|a| a.runways.get(args.runway));
    match runway {
        Some(rwy) => Ok(rwy.clone()),
        None => {
            warn!(airport = ?args.airport, runway = args.runway, "runway not found, using demo runway");
            Ok(demo_runway())
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args();
    if let Err(e) = run(&args) {
        error!(error = %e, "run failed");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AvionicsConfig::load(path)?,
        None => AvionicsConfig::default(),
    };
    if config.sequence_radius_m.is_none() {
        config.sequence_radius_m = Some(1000.0);
    }

    let runway = select_runway(args)?;
    let plan = demo_plan(&runway);

    // -----------------------------------------------------------------------
    // Computer: NAV + ALT, autopilot engaged after a short hands-off period
    // -----------------------------------------------------------------------
    let units = config.units;
    let mut computer = AvionicsComputer::new(config).with_plan(plan);
    computer.set_approach(runway);
    computer.director.set_lateral_mode(LateralMode::Nav);
    computer.director.set_vertical_mode(VerticalMode::AltitudeHold);
    computer.director.set_target_altitude(TARGET_ALT_M);
    computer.director.set_target_vertical_speed(5.0);

    let start = computer
        .plan
        .active_leg()
        .map(|leg| leg.from.position)
        .unwrap_or_default()
        .with_alt(1200.0);
    let mut aircraft = SimAircraft::new(start, 0.0, 65.0);

    let sim_config = SimConfig {
        max_time: args.max_time.unwrap_or(1200.0),
        engage_at: Some(10.0),
        ..Default::default()
    };

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let records = sim::simulate(&mut computer, &mut aircraft, &sim_config)?;
    let mut detectors = sim::standard_detectors();
    detectors.push(Box::new(sim::AltitudeDetector::new(TARGET_ALT_M - 50.0, true)));
    let events = sim::detect_events(&records, &mut detectors);

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  FLIGHT GNC SIMULATION");
    println!("====================================================================");
    println!();
    println!("  Flight Plan");
    println!("  ──────────────────────────────────────────────────────────────────");
    for (i, leg) in computer.plan.legs().iter().enumerate() {
        println!(
            "  {:>2}  {:<12} {:<8} -> {:<8} {:?}",
            i,
            format!("{:?}", leg.leg_type),
            leg.from.name,
            leg.to.name,
            leg.phase
        );
    }
    if let Some(rwy) = computer.approach() {
        println!(
            "  Approach: RWY {}  hdg {:.0} deg  glide path {:.1} deg",
            rwy.ident(),
            rwy.effective_heading().to_degrees(),
            rwy.glide_path_rad.to_degrees()
        );
    }
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &events {
        println!(
            "  t={:>7.1}s   alt={:>7.0}m   {:?}",
            e.time, e.altitude, e.kind
        );
    }
    println!();

    // -----------------------------------------------------------------------
    // Trace table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trace ({:?})", units);
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>9}  {:>8}  {:>9}  {:>8}  {:>6}  {:>4}",
        "t", "alt", "vs", "dist", "xtk", "source", "leg"
    );
    println!("  {}", "─".repeat(64));

    let sample_interval = (records.len() / 30).max(1);
    for (i, r) in records.iter().enumerate() {
        if i % sample_interval != 0 && i != records.len() - 1 {
            continue;
        }
        let lateral = r.output.nav.lateral;
        println!(
            "  {:>7.1}  {:>9.0}  {:>8.1}  {:>9.2}  {:>8.0}  {:>6}  {:>4}",
            r.time,
            units.small_distance(r.sensors.altitude()),
            units.small_speed(r.sensors.vertical_speed),
            lateral.map_or(f64::NAN, |l| units.big_distance(l.distance_to_target)),
            lateral.map_or(f64::NAN, |l| units.small_distance(l.cross_track_error_m)),
            format!("{:?}", r.output.nav.source),
            r.output.active_leg.map_or("-".to_string(), |i| i.to_string()),
        );
    }
    println!();

    let summary = io::FlightSummary::from_records(&records, events);
    if let Some(s) = &summary {
        println!("  Summary");
        println!("  ──────────────────────────────────────────────────────────────────");
        println!("  Flight time:   {:>8.1} s", s.flight_time_s);
        println!("  Ground track:  {:>8.2}", units.big_distance(s.ground_distance_m));
        println!(
            "  Altitude:      {:>8.0} -> {:.0}",
            units.small_distance(s.start_alt_m),
            units.small_distance(s.final_alt_m)
        );
        println!("  Modes at end:  {:?} / {:?}", s.final_lateral_mode, s.final_vertical_mode);
        println!();
    }

    if let Some(path) = &args.csv {
        io::write_trace_file(path, &records)?;
        println!("  Trace written to {}", path);
    }
    if let (Some(path), Some(s)) = (&args.summary, &summary) {
        io::write_summary_file(path, "demo approach", s)?;
        println!("  Summary written to {}", path);
    }

    println!("  Simulation: {} ticks, dt={} s", records.len(), sim_config.dt);
    println!("====================================================================");
    println!();
    Ok(())
}
