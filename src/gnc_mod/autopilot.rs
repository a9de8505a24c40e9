use tracing::info;

use crate::aircraft::AttitudeCommand;
use super::controller::Controller;

// ---------------------------------------------------------------------------
// Actuator interface
// ---------------------------------------------------------------------------

/// Reference frame of an attitude command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttitudeFrame {
    /// Body attitude relative to local east-north-up
    #[default]
    EnuBody,
}

/// Host-side attitude controller that accepts custom attitude targets.
pub trait AttitudeActuator {
    fn command_attitude(&mut self, command: AttitudeCommand, frame: AttitudeFrame);
}

/// Actuator that only records what it was told. Useful for tests and
/// offline runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingActuator {
    pub commands: Vec<AttitudeCommand>,
}

impl AttitudeActuator for RecordingActuator {
    fn command_attitude(&mut self, command: AttitudeCommand, _frame: AttitudeFrame) {
        self.commands.push(command);
    }
}

// ---------------------------------------------------------------------------
// Autopilot engage latch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    engaged: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Engage and reset the controller's loops. Engaging while already
    /// engaged does nothing.
    pub fn engage(&mut self, controller: &mut dyn Controller) {
        if self.engaged {
            return;
        }
        controller.reset();
        self.engaged = true;
        info!(controller = controller.name(), "autopilot engaged");
    }

    /// Disengage and release the actuator with a single neutral command.
    /// Controller state is kept.
    pub fn disengage(&mut self, actuator: &mut dyn AttitudeActuator) {
        if !self.engaged {
            return;
        }
        self.engaged = false;
        actuator.command_attitude(AttitudeCommand::neutral(), AttitudeFrame::EnuBody);
        info!("autopilot disengaged");
    }

    /// Forward this tick's command while engaged.
    pub fn update(&self, command: AttitudeCommand, actuator: &mut dyn AttitudeActuator) {
        if self.engaged {
            actuator.command_attitude(command, AttitudeFrame::EnuBody);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::SensorState;
    use crate::nav::NavSolution;

    #[derive(Default)]
    struct CountingController {
        resets: usize,
    }

    impl Controller for CountingController {
        fn control(&mut self, _sensors: &SensorState, _nav: &NavSolution, _dt: f64) -> AttitudeCommand {
            AttitudeCommand { roll: 0.1, pitch: 0.2, heading: 0.3 }
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn engage_resets_once() {
        let mut ap = Autopilot::new();
        let mut ctl = CountingController::default();
        ap.engage(&mut ctl);
        ap.engage(&mut ctl);
        assert!(ap.is_engaged());
        assert_eq!(ctl.resets, 1);
    }

    #[test]
    fn forwards_only_while_engaged() {
        let mut ap = Autopilot::new();
        let mut act = RecordingActuator::default();
        let cmd = AttitudeCommand { roll: 0.0, pitch: 0.1, heading: 1.0 };
        ap.update(cmd, &mut act);
        assert!(act.commands.is_empty());

        let mut ctl = CountingController::default();
        ap.engage(&mut ctl);
        ap.update(cmd, &mut act);
        ap.update(cmd, &mut act);
        assert_eq!(act.commands, vec![cmd, cmd]);
    }

    #[test]
    fn disengage_sends_neutral_once() {
        let mut ap = Autopilot::new();
        let mut act = RecordingActuator::default();
        let mut ctl = CountingController::default();

        // Not engaged: nothing to release
        ap.disengage(&mut act);
        assert!(act.commands.is_empty());

        ap.engage(&mut ctl);
        ap.disengage(&mut act);
        ap.disengage(&mut act);
        ap.update(AttitudeCommand { roll: 0.0, pitch: 0.3, heading: 0.0 }, &mut act);
        assert_eq!(act.commands, vec![AttitudeCommand::neutral()]);
        assert!(!ap.is_engaged());
        assert_eq!(ctl.resets, 1, "disengage keeps controller state");
    }
}
