//! # Simulation Stepper
//!
//! Advances the physics world by one fixed increment on demand.
//!
//! The world is switched to [`SteppingMode::Manual`] for the duration of the
//! advance and handed back in [`SteppingMode::Automatic`]. Advancing while
//! the host still drives the clock would double-step or get rejected.

use crate::error::EditPhysicsError;
use crate::host::{PhysicsWorld, SteppingMode};

/// Steps a [`PhysicsWorld`] and keeps simple counters.
#[derive(Debug, Default, Clone)]
pub struct SimulationStepper {
    steps_taken: u64,
    simulated_seconds: f64,
}

impl SimulationStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance `world` by exactly `fixed_delta` seconds.
    ///
    /// A non-positive or non-finite delta leaves the world untouched. If the
    /// world refuses the advance, it is still handed back in
    /// [`SteppingMode::Automatic`] and the step is not counted.
    pub fn step<W: PhysicsWorld + ?Sized>(&mut self, world: &mut W, fixed_delta: f32) -> Result<(), EditPhysicsError> {
        if !fixed_delta.is_finite() || fixed_delta <= 0.0 {
            return Err(EditPhysicsError::InvalidStepDelta(fixed_delta));
        }

        world.set_stepping_mode(SteppingMode::Manual);
        let advanced = world.advance(fixed_delta);
        world.set_stepping_mode(SteppingMode::Automatic);
        advanced?;

        self.steps_taken += 1;
        self.simulated_seconds += f64::from(fixed_delta);
        Ok(())
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Total simulated time across all successful steps.
    pub fn simulated_seconds(&self) -> f64 {
        self.simulated_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPhysics;

    #[test]
    fn step_brackets_advance_with_manual_mode() {
        let mut world = MockPhysics::new(0.02);
        let mut stepper = SimulationStepper::new();

        stepper.step(&mut world, 0.02).unwrap();

        assert_eq!(world.mode_changes, vec![SteppingMode::Manual, SteppingMode::Automatic]);
        assert_eq!(world.advances, vec![0.02]);
        assert_eq!(world.rejected_advances, 0);
        assert_eq!(world.stepping_mode(), SteppingMode::Automatic);
    }

    #[test]
    fn step_ends_automatic_even_if_left_manual() {
        let mut world = MockPhysics::new(0.02);
        world.mode = SteppingMode::Manual;
        let mut stepper = SimulationStepper::new();

        stepper.step(&mut world, 0.5).unwrap();

        assert_eq!(world.stepping_mode(), SteppingMode::Automatic);
        assert!((world.elapsed - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn step_advances_by_exact_delta() {
        let mut world = MockPhysics::new(0.02);
        let mut stepper = SimulationStepper::new();

        for _ in 0..3 {
            stepper.step(&mut world, 0.25).unwrap();
        }

        assert_eq!(world.advances, vec![0.25, 0.25, 0.25]);
        assert_eq!(stepper.steps_taken(), 3);
        assert!((stepper.simulated_seconds() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn invalid_delta_is_rejected_without_touching_world() {
        let mut world = MockPhysics::new(0.02);
        let mut stepper = SimulationStepper::new();

        for delta in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let err = stepper.step(&mut world, delta).unwrap_err();
            assert!(matches!(err, EditPhysicsError::InvalidStepDelta(_)));
        }

        assert!(world.mode_changes.is_empty());
        assert!(world.advances.is_empty());
        assert_eq!(stepper.steps_taken(), 0);
    }

    #[test]
    fn failed_advance_is_not_counted() {
        let mut world = MockPhysics::new(0.02);
        world.unavailable = true;
        let mut stepper = SimulationStepper::new();

        let err = stepper.step(&mut world, 0.02).unwrap_err();

        assert!(matches!(err, EditPhysicsError::PhysicsUnavailable(_)));
        assert_eq!(world.mode_changes, vec![SteppingMode::Manual, SteppingMode::Automatic]);
        assert_eq!(world.stepping_mode(), SteppingMode::Automatic);
        assert_eq!(stepper.steps_taken(), 0);
        assert_eq!(stepper.simulated_seconds(), 0.0);
    }
}
