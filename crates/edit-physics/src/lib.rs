//! # Eustress Edit Physics
//!
//! Physics simulation outside play mode for Eustress Studio.
//! Lets a level designer step physics while editing and freeze every body
//! except the current selection, then put everything back.
//!
//! ## Modules
//!
//! - [`locks`]: Axis lock bitset (maps to Avian `LockedAxes`)
//! - [`host`]: Traits the editor implements (scene, physics world, status sink)
//! - [`registry`]: Freeze registry - saves and restores per-body locks
//! - [`stepper`]: One fixed physics step per call
//! - [`controller`]: Running flag, panel commands and lifecycle safety net
//! - [`settings`]: TOML settings
//! - [`avian`]: Bevy `World` + Avian adapters
//! - [`plugin`]: Bevy plugin wiring
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Edit Physics                                │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  SimulatorController                                            │
//! │  ├── SimCommand: Enable / Disable / LockExceptSelection / Unlock│
//! │  ├── SimLifecycle: ToolEnabled / ToolDisabled / PlayModeChanged │
//! │  └── tick(): step while Running, warn while locked              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  FreezeRegistry                  SimulationStepper              │
//! │  ├── body -> saved AxisLocks     ├── Manual mode                │
//! │  └── restore_all on teardown     ├── advance(fixed delta)       │
//! │                                  └── Automatic mode             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Host (BodyStore / PhysicsWorld / StatusSink)                   │
//! │  └── Avian: RigidBody, LockedAxes, Time<Physics>, PhysicsSchedule│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precautions
//!
//! - Physics runs on the edited scene itself. Nothing is saved automatically;
//!   reload the scene to discard a bad simulation.
//! - Locks overwrite `LockedAxes` of every active body. Unlock before saving.
//! - Deleting or editing bodies while they are locked is tolerated (restore
//!   skips missing bodies) but edits to `LockedAxes` made meanwhile are lost.

pub mod controller;
pub mod error;
pub mod host;
pub mod locks;
pub mod registry;
pub mod settings;
pub mod stepper;

#[cfg(feature = "physics")]
pub mod avian;

#[cfg(feature = "physics")]
pub mod plugin;

#[cfg(test)]
mod testing;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient re-exports for common edit physics types.
pub mod prelude {
    pub use super::controller::{PanelState, SimCommand, SimLifecycle, SimState, SimulatorController};
    pub use super::error::{EditPhysicsError, SettingsError};
    pub use super::host::{BodyStore, PhysicsWorld, StatusLevel, StatusNotice, StatusSink, SteppingMode, TracingSink};
    pub use super::locks::AxisLocks;
    pub use super::registry::{FreezeRegistry, FreezeSummary, LockEntry, RestoreSummary};
    pub use super::settings::SimulatorSettings;
    pub use super::stepper::SimulationStepper;

    #[cfg(feature = "physics")]
    pub use super::avian::{AvianPhysics, ManualStepState, Selected, WorldScene};

    #[cfg(feature = "physics")]
    pub use super::plugin::{EditPhysicsPlugin, EditPhysicsSet, EditPhysicsState, PlayStateWatchPlugin, SimStatus};
}
