//! # Simulator Controller
//!
//! The tool surface: a two-state simulation switch, the lock commands and
//! the safety net that restores every lock on teardown or play-mode change.
//!
//! ## State Machine
//!
//! ```text
//!   Idle ──enable──▶ Running
//!   Running ──disable / ToolDisabled / PlayModeChanged──▶ Idle
//! ```
//!
//! While `Running`, [`SimulatorController::tick`] advances physics once per
//! host update. No wall-clock pacing is attempted.

use std::fmt;
use std::hash::Hash;

use bevy::prelude::Message;

use crate::host::{BodyStore, PhysicsWorld, StatusNotice, StatusSink};
use crate::registry::{FreezeRegistry, FreezeSummary, RestoreSummary};
use crate::settings::SimulatorSettings;
use crate::stepper::SimulationStepper;

// ============================================================================
// State & Requests
// ============================================================================

/// Whether edit-mode simulation is advancing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimState {
    #[default]
    Idle,
    Running,
}

/// User actions exposed by the tool panel
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimCommand {
    /// Start stepping physics every update
    EnablePhysics,
    /// Stop stepping physics
    DisablePhysics,
    /// Freeze every active body that is not selected
    LockExceptSelection,
    /// Release all locks
    UnlockAll,
}

/// Host lifecycle notifications
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimLifecycle {
    /// Tool panel opened
    ToolEnabled,
    /// Tool panel closed or editor shutting down
    ToolDisabled,
    /// Host entered or left play mode
    PlayModeChanged,
}

/// What a front end needs to draw the tool panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    pub can_enable: bool,
    pub can_disable: bool,
    pub locked: usize,
    pub unlock_label: String,
}

// ============================================================================
// Controller
// ============================================================================

/// Owns the freeze registry, the stepper and the running flag.
#[derive(Debug)]
pub struct SimulatorController<B> {
    settings: SimulatorSettings,
    state: SimState,
    registry: FreezeRegistry<B>,
    stepper: SimulationStepper,
    ticks_since_warning: u32,
}

impl<B> SimulatorController<B>
where
    B: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new(settings: SimulatorSettings) -> Self {
        Self {
            settings,
            state: SimState::Idle,
            registry: FreezeRegistry::new(),
            stepper: SimulationStepper::new(),
            ticks_since_warning: 0,
        }
    }

    pub fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    pub fn registry(&self) -> &FreezeRegistry<B> {
        &self.registry
    }

    pub fn stepper(&self) -> &SimulationStepper {
        &self.stepper
    }

    pub fn lock_count(&self) -> usize {
        self.registry.lock_count()
    }

    /// Start simulating. Returns `false` if already running.
    pub fn enable(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state = SimState::Running;
        tracing::info!("Edit-mode physics enabled");
        true
    }

    /// Stop simulating. Returns `false` if already idle.
    pub fn disable(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = SimState::Idle;
        tracing::info!(
            "Edit-mode physics disabled after {} steps ({:.2}s simulated)",
            self.stepper.steps_taken(),
            self.stepper.simulated_seconds()
        );
        true
    }

    /// Freeze every active body except the selected ones.
    pub fn lock_except_selection<S, N>(&mut self, store: &mut S, sink: &mut N) -> FreezeSummary
    where
        S: BodyStore<Body = B>,
        N: StatusSink + ?Sized,
    {
        let all_bodies = store.active_bodies();
        let selected = store.selected_bodies();
        let summary = self.registry.freeze_unselected(store, &all_bodies, &selected);

        report_restore(&summary.previous, sink);
        if summary.frozen > 0 {
            sink.notify(StatusNotice::info(format!("{} bodies locked", summary.frozen)));
        }
        if summary.skipped_stale > 0 {
            tracing::debug!("{} bodies vanished before they could be locked", summary.skipped_stale);
        }
        self.ticks_since_warning = 0;
        summary
    }

    /// Release every lock held by the registry.
    pub fn unlock_all<S, N>(&mut self, store: &mut S, sink: &mut N) -> RestoreSummary
    where
        S: BodyStore<Body = B>,
        N: StatusSink + ?Sized,
    {
        let summary = self.registry.restore_all(store);
        report_restore(&summary, sink);
        self.ticks_since_warning = 0;
        summary
    }

    /// Run one panel action.
    pub fn execute<S, N>(&mut self, command: SimCommand, store: &mut S, sink: &mut N)
    where
        S: BodyStore<Body = B>,
        N: StatusSink + ?Sized,
    {
        match command {
            SimCommand::EnablePhysics => {
                self.enable();
            }
            SimCommand::DisablePhysics => {
                self.disable();
            }
            SimCommand::LockExceptSelection => {
                self.lock_except_selection(store, sink);
            }
            SimCommand::UnlockAll => {
                self.unlock_all(store, sink);
            }
        }
    }

    /// React to the host opening/closing the tool or switching play mode.
    pub fn on_lifecycle<S, N>(&mut self, event: SimLifecycle, store: &mut S, sink: &mut N)
    where
        S: BodyStore<Body = B>,
        N: StatusSink + ?Sized,
    {
        match event {
            SimLifecycle::ToolEnabled => {}
            SimLifecycle::ToolDisabled | SimLifecycle::PlayModeChanged => {
                self.disable();
            }
        }
        self.unlock_all(store, sink);
    }

    /// Per-update work: one physics step while running, then the lock warning.
    pub fn tick<W, N>(&mut self, physics: &mut W, sink: &mut N)
    where
        W: PhysicsWorld + ?Sized,
        N: StatusSink + ?Sized,
    {
        if self.is_running() {
            let delta = self.step_delta(physics);
            if let Err(e) = self.stepper.step(physics, delta) {
                sink.notify(StatusNotice::error(e.to_string()));
            }
        }

        if self.registry.is_empty() || !self.settings.lock_warnings {
            self.ticks_since_warning = 0;
            return;
        }
        self.ticks_since_warning += 1;
        if self.ticks_since_warning >= self.settings.lock_warning_interval {
            self.ticks_since_warning = 0;
            sink.notify(StatusNotice::warning(format!(
                "{} bodies are locked!",
                self.registry.lock_count()
            )));
        }
    }

    /// Seconds advanced per tick: the configured override, else the host timestep.
    pub fn step_delta<W: PhysicsWorld + ?Sized>(&self, physics: &W) -> f32 {
        self.settings.step_delta.unwrap_or_else(|| physics.fixed_timestep())
    }

    pub fn panel(&self) -> PanelState {
        let locked = self.registry.lock_count();
        let unlock_label = if locked > 0 {
            format!("Unlock All ({locked} locked!)")
        } else {
            "Unlock All".to_string()
        };
        PanelState {
            can_enable: !self.is_running(),
            can_disable: self.is_running(),
            locked,
            unlock_label,
        }
    }
}

fn report_restore<N: StatusSink + ?Sized>(summary: &RestoreSummary, sink: &mut N) {
    if summary.total() == 0 {
        return;
    }
    let message = if summary.stale > 0 {
        format!(
            "{} bodies were unlocked ({} no longer in the scene)",
            summary.restored, summary.stale
        )
    } else {
        format!("{} bodies were unlocked", summary.restored)
    };
    sink.notify(StatusNotice::info(message));
}
