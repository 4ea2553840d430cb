//! # Avian Integration
//!
//! Adapters that let the simulator drive a Bevy `World` running Avian.
//!
//! ## Mapping
//!
//! - Body = entity with `RigidBody`; inactive if it carries `RigidBodyDisabled`
//!   or Bevy's `Disabled`
//! - Axis locks = `LockedAxes` (absent reads as unlocked)
//! - Selection = marker component `M` (default [`Selected`])
//! - `Automatic` stepping = the host owns `Time<Physics>` (paused while
//!   editing, running in play mode)
//! - `Manual` stepping = the clock is paused and one `PhysicsSchedule` run is
//!   driven per advance; the physics delta is cleared afterwards so the
//!   fixed-update runner does not replay it. Switching back restores the
//!   host's pause state

use std::marker::PhantomData;
use std::time::Duration;

use avian3d::prelude::{
    LockedAxes, Physics, PhysicsSchedule, PhysicsTime, RigidBody, RigidBodyDisabled, SubstepCount, Substeps,
};
use bevy::ecs::entity_disabling::Disabled;
use bevy::prelude::*;

use crate::error::EditPhysicsError;
use crate::host::{BodyStore, PhysicsWorld, SteppingMode};
use crate::locks::AxisLocks;

/// Bevy's default fixed timestep (64 Hz)
const DEFAULT_FIXED_TIMESTEP: f32 = 1.0 / 64.0;

// ============================================================================
// Components & Resources
// ============================================================================

/// Marks entities that are selected in the editor.
///
/// The host's selection sync inserts and removes it. Plugins can be
/// configured with a different marker instead.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Selected;

/// Stepping mode of the Avian clock as seen by the simulator
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ManualStepState {
    pub mode: SteppingMode,
    /// Pause state of `Time<Physics>` before the simulator took over
    pub host_paused: bool,
}

// ============================================================================
// Scene Adapter
// ============================================================================

/// [`BodyStore`] over a Bevy `World`.
pub struct WorldScene<'w, M: Component = Selected> {
    world: &'w mut World,
    _selection: PhantomData<M>,
}

impl<'w, M: Component> WorldScene<'w, M> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world, _selection: PhantomData }
    }
}

impl<M: Component> BodyStore for WorldScene<'_, M> {
    type Body = Entity;

    fn active_bodies(&mut self) -> Vec<Entity> {
        let mut query = self
            .world
            .query_filtered::<Entity, (With<RigidBody>, Without<RigidBodyDisabled>)>();
        query.iter(self.world).collect()
    }

    fn selected_bodies(&mut self) -> Vec<Entity> {
        let mut query = self.world.query_filtered::<Entity, (With<M>, With<RigidBody>)>();
        query.iter(self.world).collect()
    }

    fn is_active(&self, body: Entity) -> bool {
        self.world.get_entity(body).is_ok_and(|entity| {
            entity.contains::<RigidBody>()
                && !entity.contains::<RigidBodyDisabled>()
                && !entity.contains::<Disabled>()
        })
    }

    fn axis_locks(&self, body: Entity) -> Option<AxisLocks> {
        let entity = self.world.get_entity(body).ok()?;
        if !entity.contains::<RigidBody>() {
            return None;
        }
        Some(
            entity
                .get::<LockedAxes>()
                .map(|axes| AxisLocks::from(*axes))
                .unwrap_or_default(),
        )
    }

    fn set_axis_locks(&mut self, body: Entity, locks: AxisLocks) -> Result<(), EditPhysicsError> {
        let mut entity = self
            .world
            .get_entity_mut(body)
            .map_err(|_| EditPhysicsError::StaleBody(format!("{body:?}")))?;
        if !entity.contains::<RigidBody>() {
            return Err(EditPhysicsError::StaleBody(format!("{body:?}")));
        }
        entity.insert(LockedAxes::from(locks));
        Ok(())
    }
}

// ============================================================================
// Physics Adapter
// ============================================================================

/// [`PhysicsWorld`] over Avian's physics clock and schedule.
pub struct AvianPhysics<'w> {
    world: &'w mut World,
}

impl<'w> AvianPhysics<'w> {
    pub fn new(world: &'w mut World) -> Self {
        world.init_resource::<ManualStepState>();
        Self { world }
    }

    fn state(&self) -> ManualStepState {
        self.world
            .get_resource::<ManualStepState>()
            .copied()
            .unwrap_or_default()
    }
}

impl PhysicsWorld for AvianPhysics<'_> {
    fn stepping_mode(&self) -> SteppingMode {
        self.state().mode
    }

    fn set_stepping_mode(&mut self, mode: SteppingMode) {
        let state = self.state();
        if state.mode == mode {
            return;
        }
        // Without a physics clock `advance` reports the failure
        let Some(mut physics_time) = self.world.get_resource_mut::<Time<Physics>>() else {
            return;
        };

        let host_paused = match mode {
            SteppingMode::Manual => {
                let host_paused = physics_time.is_paused();
                physics_time.pause();
                host_paused
            }
            SteppingMode::Automatic => {
                if !state.host_paused {
                    physics_time.unpause();
                }
                state.host_paused
            }
        };

        self.world.insert_resource(ManualStepState { mode, host_paused });
    }

    fn advance(&mut self, delta_seconds: f32) -> Result<(), EditPhysicsError> {
        if !self.world.contains_resource::<Time<Physics>>() || !self.world.contains_resource::<Time>() {
            return Err(EditPhysicsError::PhysicsUnavailable(
                "Time<Physics> missing, is PhysicsPlugins added?".to_string(),
            ));
        }
        if self.stepping_mode() != SteppingMode::Manual {
            return Err(EditPhysicsError::AdvanceRejected);
        }
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return Err(EditPhysicsError::InvalidStepDelta(delta_seconds));
        }

        let delta = Duration::from_secs_f32(delta_seconds);
        self.world.resource_mut::<Time<Physics>>().advance_by(delta);

        // Systems ahead of the substep loop read the substep clock.
        let substeps = self
            .world
            .get_resource::<SubstepCount>()
            .map_or(1, |count| count.0.max(1));
        if let Some(mut substep_time) = self.world.get_resource_mut::<Time<Substeps>>() {
            substep_time.advance_by(delta.div_f64(f64::from(substeps)));
        }

        // Physics systems read the generic clock; point it at physics time for this run.
        let previous = self.world.resource::<Time>().as_generic();
        let physics_clock = self.world.resource::<Time<Physics>>().as_generic();
        *self.world.resource_mut::<Time>() = physics_clock;

        let ran = self.world.try_run_schedule(PhysicsSchedule);

        *self.world.resource_mut::<Time>() = previous;
        // Avian's own runner replays any non-zero delta, even on a paused clock.
        self.world.resource_mut::<Time<Physics>>().advance_by(Duration::ZERO);

        ran.map_err(|e| EditPhysicsError::PhysicsUnavailable(e.to_string()))
    }

    fn fixed_timestep(&self) -> f32 {
        self.world
            .get_resource::<Time<Fixed>>()
            .map(|time| time.timestep().as_secs_f32())
            .unwrap_or(DEFAULT_FIXED_TIMESTEP)
    }
}
