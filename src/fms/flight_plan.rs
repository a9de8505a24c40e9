use tracing::debug;

use crate::error::{AvionicsError, Result};
use crate::geodesy::{self, GeoPos};
use super::guidance::{build_guidance_snapshot, GuidanceSnapshot};
use super::leg::FlightPlanLeg;

// ---------------------------------------------------------------------------
// Flight plan: ordered legs plus an active-leg cursor
// ---------------------------------------------------------------------------

/// Ordered sequence of legs with an index-based active-leg cursor.
///
/// Completed legs are never removed; sequencing only moves the cursor. A
/// cursor at or past the end means "no active leg". Editing operations keep
/// the cursor on the same leg whenever that leg still exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightPlan {
    legs: Vec<FlightPlanLeg>,
    active_index: usize,
}

impl FlightPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_legs(legs: Vec<FlightPlanLeg>) -> Self {
        Self { legs, active_index: 0 }
    }

    pub fn legs(&self) -> &[FlightPlanLeg] {
        &self.legs
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Cursor position, or None once the plan is exhausted or empty.
    pub fn active_index(&self) -> Option<usize> {
        (self.active_index < self.legs.len()).then_some(self.active_index)
    }

    pub fn active_leg(&self) -> Option<&FlightPlanLeg> {
        self.legs.get(self.active_index)
    }

    /// Move the cursor to the next leg. Past the last leg there is no active
    /// leg; the plan does not loop.
    pub fn advance_leg(&mut self) {
        self.active_index = (self.active_index + 1).min(self.legs.len());
        debug!(active = ?self.active_index(), "flight plan advanced");
    }

    /// Make the leg at `index` the active one.
    pub fn activate_leg(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active_index = index;
        Ok(())
    }

    pub fn append_leg(&mut self, leg: FlightPlanLeg) {
        self.legs.push(leg);
    }

    /// Insert `leg` before `index` (`index == len` appends).
    pub fn insert_leg(&mut self, index: usize, leg: FlightPlanLeg) -> Result<()> {
        let len = self.legs.len();
        if index > len {
            return Err(AvionicsError::LegIndex { index, len });
        }
        let active_valid = self.active_index < len;
        if index < self.active_index || (index == self.active_index && active_valid) {
            self.active_index += 1;
        }
        self.legs.insert(index, leg);
        Ok(())
    }

    /// Remove and return the leg at `index`. Removing the active leg makes
    /// the following leg active.
    pub fn remove_leg(&mut self, index: usize) -> Result<FlightPlanLeg> {
        self.check_index(index)?;
        if index < self.active_index {
            self.active_index -= 1;
        }
        Ok(self.legs.remove(index))
    }

    /// Move the leg at `from` so that it ends up at position `to`.
    pub fn move_leg(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let active = self.active_index();
        let leg = self.legs.remove(from);
        self.legs.insert(to, leg);

        if let Some(a) = active {
            self.active_index = if a == from {
                to
            } else {
                let after_remove = if from < a { a - 1 } else { a };
                if to <= after_remove {
                    after_remove + 1
                } else {
                    after_remove
                }
            };
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.legs.clear();
        self.active_index = 0;
    }

    /// Guidance for the active leg as seen from `aircraft`.
    pub fn guidance_snapshot(&self, aircraft: &GeoPos) -> GuidanceSnapshot {
        build_guidance_snapshot(self.active_leg(), aircraft)
    }

    /// Along-route distance from the aircraft to the last fix: direct to the
    /// active leg's fix, then each remaining leg end to end.
    pub fn distance_remaining(&self, aircraft: &GeoPos, radius: f64) -> Option<f64> {
        let active = self.active_leg()?;
        let first = geodesy::distance(aircraft, &active.to.position, radius);
        let rest: f64 = self.legs[self.active_index + 1..]
            .iter()
            .map(|leg| geodesy::distance(&leg.from.position, &leg.to.position, radius))
            .sum();
        Some(first + rest)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.legs.len() {
            Ok(())
        } else {
            Err(AvionicsError::LegIndex { index, len: self.legs.len() })
        }
    }
}
