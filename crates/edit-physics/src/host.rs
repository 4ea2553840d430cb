//! # Host Interfaces
//!
//! Everything the simulator needs from the editor it runs in.
//!
//! ## Traits
//! - `BodyStore`: scene query, selection and per-body axis locks
//! - `PhysicsWorld`: stepping mode switch and manual advance
//! - `StatusSink`: three-level notification channel
//!
//! Body handles are re-resolved on every call. A handle whose body was
//! deleted by the user resolves to `None` / `Err` and is skipped by the
//! caller; it never panics.

use std::fmt;
use std::hash::Hash;

use crate::error::EditPhysicsError;
use crate::locks::AxisLocks;

// ============================================================================
// Scene
// ============================================================================

/// Scene-side view of simulated bodies.
pub trait BodyStore {
    /// Handle identifying a body inside the host scene
    type Body: Copy + Eq + Hash + fmt::Debug;

    /// All simulated bodies currently active in the scene.
    fn active_bodies(&mut self) -> Vec<Self::Body>;

    /// Currently selected objects that carry a simulated body.
    ///
    /// Selected objects without a body are dropped here. Disabled bodies may
    /// still be returned; callers check [`BodyStore::is_active`].
    fn selected_bodies(&mut self) -> Vec<Self::Body>;

    /// Whether the handle still resolves to a body that takes part in simulation.
    fn is_active(&self, body: Self::Body) -> bool;

    /// Current axis locks, or `None` if the body no longer exists.
    fn axis_locks(&self, body: Self::Body) -> Option<AxisLocks>;

    /// Overwrite the axis locks of a body.
    fn set_axis_locks(&mut self, body: Self::Body, locks: AxisLocks) -> Result<(), EditPhysicsError>;
}

// ============================================================================
// Physics World
// ============================================================================

/// Who drives the physics clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SteppingMode {
    /// The host advances physics on its own schedule
    #[default]
    Automatic,
    /// Physics only advances through explicit [`PhysicsWorld::advance`] calls
    Manual,
}

/// Host physics world as seen by the stepper.
pub trait PhysicsWorld {
    fn stepping_mode(&self) -> SteppingMode;

    fn set_stepping_mode(&mut self, mode: SteppingMode);

    /// Advance the simulation by `delta_seconds`.
    ///
    /// Fails with [`EditPhysicsError::AdvanceRejected`] outside
    /// [`SteppingMode::Manual`] and with
    /// [`EditPhysicsError::PhysicsUnavailable`] if the host has no physics to step.
    fn advance(&mut self, delta_seconds: f32) -> Result<(), EditPhysicsError>;

    /// Fixed timestep the host uses for its own physics updates, in seconds.
    fn fixed_timestep(&self) -> f32;
}

// ============================================================================
// Status Notifications
// ============================================================================

/// Severity of a status notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// A single user-facing status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub level: StatusLevel,
    pub message: String,
}

impl StatusNotice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, message: message.into() }
    }
}

/// Receiver for status notices.
pub trait StatusSink {
    fn notify(&mut self, notice: StatusNotice);
}

/// Collects notices so they can be forwarded after the scene borrow ends.
impl StatusSink for Vec<StatusNotice> {
    fn notify(&mut self, notice: StatusNotice) {
        self.push(notice);
    }
}

/// Writes notices straight to `tracing` with a fixed prefix.
#[derive(Debug, Clone)]
pub struct TracingSink {
    prefix: String,
}

impl TracingSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl StatusSink for TracingSink {
    fn notify(&mut self, notice: StatusNotice) {
        match notice.level {
            StatusLevel::Info => tracing::info!("{} {}", self.prefix, notice.message),
            StatusLevel::Warning => tracing::warn!("{} {}", self.prefix, notice.message),
            StatusLevel::Error => tracing::error!("{} {}", self.prefix, notice.message),
        }
    }
}
