use tracing::info;

use crate::aircraft::{AttitudeCommand, SensorState};
use crate::config::AvionicsConfig;
use crate::fms::{FlightPlan, LegPhase};
use crate::gnc::{
    AttitudeActuator, Autopilot, Controller, FlightDirector, LateralMode, SetpointStep, VerticalMode,
};
use crate::nav::{LateralSource, NavSolution, NavigationSolver, Runway};

// ---------------------------------------------------------------------------
// Per-tick output
// ---------------------------------------------------------------------------

/// Everything the pipeline produced on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub nav: NavSolution,
    pub command: AttitudeCommand,
    pub lateral_mode: LateralMode,
    pub vertical_mode: VerticalMode,
    pub engaged: bool,
    /// Active leg after any sequencing done this tick
    pub active_leg: Option<usize>,
}

// ---------------------------------------------------------------------------
// Avionics computer: flight plan -> nav solver -> flight director -> autopilot
// ---------------------------------------------------------------------------

/// Owns the whole guidance chain and runs it once per tick.
#[derive(Debug, Clone)]
pub struct AvionicsComputer {
    pub config: AvionicsConfig,
    pub plan: FlightPlan,
    pub director: FlightDirector,
    pub autopilot: Autopilot,
    approach: Option<Runway>,
    solver: NavigationSolver,
}

impl AvionicsComputer {
    pub fn new(config: AvionicsConfig) -> Self {
        let director = FlightDirector::new(&config);
        Self {
            config,
            plan: FlightPlan::new(),
            director,
            autopilot: Autopilot::new(),
            approach: None,
            solver: NavigationSolver::new(),
        }
    }

    pub fn with_plan(mut self, plan: FlightPlan) -> Self {
        self.plan = plan;
        self
    }

    // -----------------------------------------------------------------------
    // Approach runway
    // -----------------------------------------------------------------------

    /// Select an approach runway. The computer keeps its own copy, with the
    /// configured glide path applied.
    pub fn set_approach(&mut self, mut runway: Runway) {
        runway.set_glide_path_deg(self.config.glide_path_deg);
        info!(runway = runway.ident(), glide_path_deg = self.config.glide_path_deg, "approach selected");
        self.approach = Some(runway);
    }

    pub fn clear_approach(&mut self) {
        self.approach = None;
    }

    pub fn approach(&self) -> Option<&Runway> {
        self.approach.as_ref()
    }

    pub fn swap_runway_end(&mut self) {
        if let Some(runway) = self.approach.as_mut() {
            runway.swap_end();
            info!(runway = runway.ident(), "approach end swapped");
        }
    }

    pub fn set_glide_path_deg(&mut self, deg: f64) {
        if let Some(runway) = self.approach.as_mut() {
            runway.set_glide_path_deg(deg);
        }
    }

    // -----------------------------------------------------------------------
    // Autopilot
    // -----------------------------------------------------------------------

    pub fn engage_autopilot(&mut self) {
        self.autopilot.engage(&mut self.director);
    }

    pub fn disengage_autopilot(&mut self, actuator: &mut dyn AttitudeActuator) {
        self.autopilot.disengage(actuator);
    }

    // -----------------------------------------------------------------------
    // Setpoint selectors, in the configured display units
    // -----------------------------------------------------------------------

    pub fn set_target_altitude_display(&mut self, value: f64) {
        self.director.set_target_altitude_display(value, self.config.units);
    }

    pub fn step_target_altitude(&mut self, step: SetpointStep, up: bool) {
        self.director.step_target_altitude(step, up, self.config.units);
    }

    pub fn set_target_vertical_speed_display(&mut self, value: f64) {
        self.director.set_target_vertical_speed_display(value, self.config.units);
    }

    pub fn step_target_vertical_speed(&mut self, up: bool) {
        self.director.step_target_vertical_speed(up, self.config.units);
    }

    pub fn nav_solution(&self) -> &NavSolution {
        self.solver.solution()
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    pub fn tick(
        &mut self,
        sensors: &SensorState,
        dt: f64,
        radius: f64,
        actuator: &mut dyn AttitudeActuator,
    ) -> TickOutput {
        let position = sensors.position;

        // 1. Navigation: flight plan first, approach runway as fallback
        let snapshot = self.plan.guidance_snapshot(&position);
        let from_plan = self.solver.update(&position, &snapshot, radius).has_guidance();
        if !from_plan && self.approach_may_replace_plan() {
            if let Some(runway) = &self.approach {
                self.solver.update_approach(&position, runway, radius);
            }
        }
        let nav = self.solver.solution().clone();

        // 2. Leg sequencing. Takes effect on the next tick's solution.
        if let (Some(capture), Some(dist)) = (self.config.sequence_radius_m, nav.distance_to_target()) {
            if from_plan && dist <= capture {
                let from = self.plan.active_index();
                self.plan.advance_leg();
                info!(?from, to = ?self.plan.active_index(), dist, "leg sequenced");
            }
        }

        // 3. Flight director
        let command = self.director.control(sensors, &nav, dt);

        // 4. Autopilot
        self.autopilot.update(command, actuator);

        TickOutput {
            nav,
            command,
            lateral_mode: self.director.lateral_mode(),
            vertical_mode: self.director.vertical_mode(),
            engaged: self.autopilot.is_engaged(),
            active_leg: self.plan.active_index(),
        }
    }

    /// The runway only stands in for the plan with no active leg or on an
    /// approach-phase leg. An unsolved enroute leg keeps "no guidance".
    fn approach_may_replace_plan(&self) -> bool {
        self.plan
            .active_leg()
            .map_or(true, |leg| matches!(leg.phase, LegPhase::Approach | LegPhase::MissedApproach))
    }

    /// Where lateral guidance came from on the last tick.
    pub fn lateral_source(&self) -> LateralSource {
        self.solver.solution().source
    }
}

impl Default for AvionicsComputer {
    fn default() -> Self {
        Self::new(AvionicsConfig::default())
    }
}
