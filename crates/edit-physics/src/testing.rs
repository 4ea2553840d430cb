//! In-memory scene and physics world used by the unit tests.

use std::collections::HashMap;

use crate::error::EditPhysicsError;
use crate::host::{BodyStore, PhysicsWorld, SteppingMode};
use crate::locks::AxisLocks;

// ---------------------------------------------------------------------------
// MockScene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct MockBody {
    locks: AxisLocks,
    active: bool,
}

/// Scene of numbered bodies plus a selection list.
///
/// Selected ids that have no body stand in for selected objects without a
/// rigid body and are dropped by `selected_bodies`.
#[derive(Debug, Default)]
pub struct MockScene {
    bodies: HashMap<u32, MockBody>,
    selection: Vec<u32>,
}

impl MockScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, id: u32, locks: AxisLocks) -> Self {
        self.bodies.insert(id, MockBody { locks, active: true });
        self
    }

    pub fn with_disabled_body(mut self, id: u32, locks: AxisLocks) -> Self {
        self.bodies.insert(id, MockBody { locks, active: false });
        self
    }

    pub fn select(&mut self, ids: &[u32]) {
        self.selection = ids.to_vec();
    }

    pub fn despawn(&mut self, id: u32) {
        self.bodies.remove(&id);
    }

    pub fn locks(&self, id: u32) -> AxisLocks {
        self.bodies[&id].locks
    }
}

impl BodyStore for MockScene {
    type Body = u32;

    fn active_bodies(&mut self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .bodies
            .iter()
            .filter(|(_, body)| body.active)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn selected_bodies(&mut self) -> Vec<u32> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.bodies.contains_key(id))
            .collect()
    }

    fn is_active(&self, body: u32) -> bool {
        self.bodies.get(&body).is_some_and(|b| b.active)
    }

    fn axis_locks(&self, body: u32) -> Option<AxisLocks> {
        self.bodies.get(&body).map(|b| b.locks)
    }

    fn set_axis_locks(&mut self, body: u32, locks: AxisLocks) -> Result<(), EditPhysicsError> {
        let entry = self
            .bodies
            .get_mut(&body)
            .ok_or_else(|| EditPhysicsError::StaleBody(format!("{body}")))?;
        entry.locks = locks;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockPhysics
// ---------------------------------------------------------------------------

/// Physics world that records mode switches and advances.
#[derive(Debug)]
pub struct MockPhysics {
    pub mode: SteppingMode,
    pub elapsed: f32,
    pub fixed: f32,
    pub mode_changes: Vec<SteppingMode>,
    pub advances: Vec<f32>,
    pub rejected_advances: usize,
    /// Every advance fails as if the host had no physics
    pub unavailable: bool,
}

impl MockPhysics {
    pub fn new(fixed: f32) -> Self {
        Self {
            mode: SteppingMode::Automatic,
            elapsed: 0.0,
            fixed,
            mode_changes: Vec::new(),
            advances: Vec::new(),
            rejected_advances: 0,
            unavailable: false,
        }
    }
}

impl PhysicsWorld for MockPhysics {
    fn stepping_mode(&self) -> SteppingMode {
        self.mode
    }

    fn set_stepping_mode(&mut self, mode: SteppingMode) {
        self.mode = mode;
        self.mode_changes.push(mode);
    }

    fn advance(&mut self, delta_seconds: f32) -> Result<(), EditPhysicsError> {
        if self.unavailable {
            return Err(EditPhysicsError::PhysicsUnavailable("no physics world".into()));
        }
        if self.mode != SteppingMode::Manual {
            self.rejected_advances += 1;
            return Err(EditPhysicsError::AdvanceRejected);
        }
        self.elapsed += delta_seconds;
        self.advances.push(delta_seconds);
        Ok(())
    }

    fn fixed_timestep(&self) -> f32 {
        self.fixed
    }
}
