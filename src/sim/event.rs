use serde::Serialize;

use crate::gnc::{LateralMode, VerticalMode};
use super::runner::TickRecord;

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    LegSequenced { from: Option<usize>, to: Option<usize> },
    LateralModeChanged { from: LateralMode, to: LateralMode },
    VerticalModeChanged { from: VerticalMode, to: VerticalMode },
    AutopilotEngaged,
    AutopilotDisengaged,
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightEvent {
    pub time: f64,
    pub kind: EventKind,
    pub altitude: f64,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive tick records and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind>;
}

/// Detects a change of active leg.
pub struct LegSequenceDetector;

impl EventDetector for LegSequenceDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        let (from, to) = (prev.output.active_leg, current.output.active_leg);
        (from != to).then_some(EventKind::LegSequenced { from, to })
    }
}

/// Detects lateral mode changes, including automatic reversions.
pub struct LateralModeDetector;

impl EventDetector for LateralModeDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        let (from, to) = (prev.output.lateral_mode, current.output.lateral_mode);
        (from != to).then_some(EventKind::LateralModeChanged { from, to })
    }
}

pub struct VerticalModeDetector;

impl EventDetector for VerticalModeDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        let (from, to) = (prev.output.vertical_mode, current.output.vertical_mode);
        (from != to).then_some(EventKind::VerticalModeChanged { from, to })
    }
}

/// Detects autopilot engage/disengage edges.
pub struct EngageDetector;

impl EventDetector for EngageDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        match (prev.output.engaged, current.output.engaged) {
            (false, true) => Some(EventKind::AutopilotEngaged),
            (true, false) => Some(EventKind::AutopilotDisengaged),
            _ => None,
        }
    }
}

/// Detects when altitude crosses a threshold (climbing or descending).
pub struct AltitudeDetector {
    pub altitude: f64,
    pub climbing: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, climbing: bool) -> Self {
        Self { altitude, climbing, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &TickRecord, current: &TickRecord) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let (a0, a1) = (prev.sensors.altitude(), current.sensors.altitude());
        let crossed = if self.climbing {
            a0 < self.altitude && a1 >= self.altitude
        } else {
            a0 > self.altitude && a1 <= self.altitude
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Custom(format!(
                "Altitude {:.0}m ({})",
                self.altitude,
                if self.climbing { "climbing" } else { "descending" }
            )))
        } else {
            None
        }
    }
}

/// Detectors for every built-in discrete event.
pub fn standard_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(LegSequenceDetector),
        Box::new(LateralModeDetector),
        Box::new(VerticalModeDetector),
        Box::new(EngageDetector),
    ]
}

/// Run `detectors` over consecutive record pairs.
pub fn detect_events(records: &[TickRecord], detectors: &mut [Box<dyn EventDetector>]) -> Vec<FlightEvent> {
    let mut events = Vec::new();
    for pair in records.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(prev, current) {
                events.push(FlightEvent {
                    time: current.time,
                    kind,
                    altitude: current.sensors.altitude(),
                });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::{AttitudeCommand, SensorState};
    use crate::geodesy::GeoPos;
    use crate::nav::NavSolution;
    use crate::sim::computer::TickOutput;

    fn record(time: f64, alt: f64, leg: Option<usize>, lateral: LateralMode, engaged: bool) -> TickRecord {
        TickRecord {
            time,
            sensors: SensorState {
                position: GeoPos::new(0.0, 0.0, alt),
                ..Default::default()
            },
            output: TickOutput {
                nav: NavSolution::no_guidance(),
                command: AttitudeCommand::neutral(),
                lateral_mode: lateral,
                vertical_mode: VerticalMode::AltitudeHold,
                engaged,
                active_leg: leg,
            },
        }
    }

    #[test]
    fn leg_change_detected() {
        let mut det = LegSequenceDetector;
        let prev = record(0.0, 100.0, Some(0), LateralMode::Nav, true);
        let curr = record(0.1, 100.0, Some(1), LateralMode::Nav, true);
        assert_eq!(
            det.check(&prev, &curr),
            Some(EventKind::LegSequenced { from: Some(0), to: Some(1) })
        );
        assert_eq!(det.check(&curr, &curr), None);
    }

    #[test]
    fn altitude_detector_climbing() {
        let mut det = AltitudeDetector::new(1000.0, true);
        let prev = record(0.0, 900.0, None, LateralMode::Off, false);
        let curr = record(0.1, 1050.0, None, LateralMode::Off, false);
        assert!(det.check(&prev, &curr).is_some());
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn detect_events_collects_in_order() {
        let records = vec![
            record(0.0, 100.0, Some(0), LateralMode::Nav, false),
            record(0.1, 100.0, Some(0), LateralMode::Nav, true),
            record(0.2, 100.0, None, LateralMode::HeadingHold, true),
        ];
        let mut detectors = standard_detectors();
        let events = detect_events(&records, &mut detectors);
        let kinds: Vec<_> = events.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::AutopilotEngaged,
                EventKind::LegSequenced { from: Some(0), to: None },
                EventKind::LateralModeChanged { from: LateralMode::Nav, to: LateralMode::HeadingHold },
            ]
        );
        assert_eq!(events[0].time, 0.1);
    }
}
