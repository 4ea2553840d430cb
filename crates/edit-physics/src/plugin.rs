//! # Edit Physics Plugin
//!
//! Runs the simulator inside a Bevy app.
//!
//! ## Messages
//! - `SimCommand` (in): panel actions
//! - `SimLifecycle` (in): tool open/close and play-mode changes
//! - `SimStatus` (out): status notices, also written to the log
//!
//! ## Frame Order
//! `Input` → `Process` → `Tick` → `Report`, all in `Update`.
//! `AppExit` is handled in `Last` so exits requested anywhere in the frame
//! still restore every lock before the runner stops.
//!
//! `SimCommand` and `SimLifecycle` are drained by the plugin; other readers
//! should watch `SimStatus` or read [`EditPhysicsState`] instead.

use std::marker::PhantomData;
use std::path::Path;

use bevy::ecs::message::MessageCursor;
use bevy::prelude::*;
use bevy::state::state::StateTransitionEvent;

use crate::avian::{AvianPhysics, ManualStepState, Selected, WorldScene};
use crate::controller::{PanelState, SimCommand, SimLifecycle, SimulatorController};
use crate::host::{StatusLevel, StatusNotice};
use crate::settings::SimulatorSettings;

// ============================================================================
// Resources & Messages
// ============================================================================

/// The simulator owned by the app
#[derive(Resource, Debug)]
pub struct EditPhysicsState {
    pub controller: SimulatorController<Entity>,
}

impl EditPhysicsState {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self { controller: SimulatorController::new(settings) }
    }

    /// View model for the tool panel
    pub fn panel(&self) -> PanelState {
        self.controller.panel()
    }
}

/// Status notice emitted by the simulator
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SimStatus(pub StatusNotice);

/// Ordering of the plugin's systems within `Update`
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditPhysicsSet {
    /// Translate host play-mode changes into `SimLifecycle`
    Input,
    /// Apply lifecycle events and commands
    Process,
    /// Step physics and emit lock warnings
    Tick,
    /// Log status notices
    Report,
}

// ============================================================================
// Plugins
// ============================================================================

/// Edit-mode physics tool.
///
/// `M` is the component marking selected entities.
///
/// # Example
/// ```rust,ignore
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PhysicsPlugins::default())
///     .add_plugins(EditPhysicsPlugin::default())
///     .add_plugins(PlayStateWatchPlugin::<PlayModeState>::default())
///     .run();
/// ```
pub struct EditPhysicsPlugin<M: Component = Selected> {
    pub settings: SimulatorSettings,
    _selection: PhantomData<fn() -> M>,
}

impl Default for EditPhysicsPlugin<Selected> {
    fn default() -> Self {
        Self::new(SimulatorSettings::default())
    }
}

impl<M: Component> EditPhysicsPlugin<M> {
    pub fn new(settings: SimulatorSettings) -> Self {
        Self { settings, _selection: PhantomData }
    }

    /// Settings from a TOML file, defaults if it is missing or invalid.
    pub fn from_settings_file(path: &Path) -> Self {
        Self::new(SimulatorSettings::load_or_default(path))
    }
}

impl<M: Component> Plugin for EditPhysicsPlugin<M> {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(EditPhysicsState::new(self.settings.clone()))
            .init_resource::<ManualStepState>()
            .add_message::<SimCommand>()
            .add_message::<SimLifecycle>()
            .add_message::<SimStatus>()
            .configure_sets(Update, (
                EditPhysicsSet::Input,
                EditPhysicsSet::Process,
                EditPhysicsSet::Tick,
                EditPhysicsSet::Report,
            ).chain())
            .add_systems(Startup, announce_tool_enabled)
            .add_systems(Update, (
                process_sim_requests::<M>.in_set(EditPhysicsSet::Process),
                tick_edit_physics.in_set(EditPhysicsSet::Tick),
                log_sim_status.in_set(EditPhysicsSet::Report),
            ))
            .add_systems(Last, restore_on_app_exit::<M>);

        info!("EditPhysicsPlugin initialized");
    }
}

/// Forwards every change of the host's play-mode state `S` as
/// [`SimLifecycle::PlayModeChanged`].
pub struct PlayStateWatchPlugin<S: States> {
    _state: PhantomData<fn() -> S>,
}

impl<S: States> Default for PlayStateWatchPlugin<S> {
    fn default() -> Self {
        Self { _state: PhantomData }
    }
}

impl<S: States> Plugin for PlayStateWatchPlugin<S> {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, forward_play_state_changes::<S>.in_set(EditPhysicsSet::Input));
    }
}

// ============================================================================
// Systems
// ============================================================================

fn announce_tool_enabled(mut lifecycle: MessageWriter<SimLifecycle>) {
    lifecycle.write(SimLifecycle::ToolEnabled);
}

/// Editor shutdown counts as closing the tool.
///
/// Notices are logged here directly since `Report` will not run again.
fn restore_on_app_exit<M: Component>(world: &mut World, mut exits: Local<MessageCursor<AppExit>>) {
    let exiting = world
        .get_resource::<Messages<AppExit>>()
        .is_some_and(|messages| exits.read(messages).count() > 0);
    if !exiting {
        return;
    }

    let notices = apply_requests::<M>(world, vec![SimLifecycle::ToolDisabled], Vec::new());
    let prefix = world.resource::<EditPhysicsState>().controller.settings().log_prefix.clone();
    for notice in &notices {
        log_notice(&prefix, notice);
    }
    write_notices(world, notices);
}

fn forward_play_state_changes<S: States>(
    mut transitions: MessageReader<StateTransitionEvent<S>>,
    mut lifecycle: MessageWriter<SimLifecycle>,
) {
    for transition in transitions.read() {
        // Initial state insertion has no `exited` and is not a play-mode switch
        if let (Some(exited), Some(entered)) = (&transition.exited, &transition.entered) {
            if exited != entered {
                lifecycle.write(SimLifecycle::PlayModeChanged);
            }
        }
    }
}

/// Lifecycle events are applied before commands.
fn process_sim_requests<M: Component>(world: &mut World) {
    let lifecycle: Vec<SimLifecycle> = world.resource_mut::<Messages<SimLifecycle>>().drain().collect();
    let commands: Vec<SimCommand> = world.resource_mut::<Messages<SimCommand>>().drain().collect();
    if lifecycle.is_empty() && commands.is_empty() {
        return;
    }
    let notices = apply_requests::<M>(world, lifecycle, commands);
    write_notices(world, notices);
}

fn apply_requests<M: Component>(
    world: &mut World,
    lifecycle: Vec<SimLifecycle>,
    commands: Vec<SimCommand>,
) -> Vec<StatusNotice> {
    let mut notices: Vec<StatusNotice> = Vec::new();
    world.resource_scope(|world, mut state: Mut<EditPhysicsState>| {
        let mut scene = WorldScene::<M>::new(world);
        for event in lifecycle {
            debug!("Edit physics lifecycle: {:?}", event);
            state.controller.on_lifecycle(event, &mut scene, &mut notices);
        }
        for command in commands {
            debug!("Edit physics command: {:?}", command);
            state.controller.execute(command, &mut scene, &mut notices);
        }
    });
    notices
}

fn tick_edit_physics(world: &mut World) {
    let mut notices: Vec<StatusNotice> = Vec::new();
    world.resource_scope(|world, mut state: Mut<EditPhysicsState>| {
        let mut physics = AvianPhysics::new(world);
        state.controller.tick(&mut physics, &mut notices);
    });
    write_notices(world, notices);
}

fn write_notices(world: &mut World, notices: Vec<StatusNotice>) {
    for notice in notices {
        world.write_message(SimStatus(notice));
    }
}

fn log_sim_status(mut statuses: MessageReader<SimStatus>, state: Res<EditPhysicsState>) {
    let prefix = &state.controller.settings().log_prefix;
    for SimStatus(notice) in statuses.read() {
        log_notice(prefix, notice);
    }
}

fn log_notice(prefix: &str, notice: &StatusNotice) {
    match notice.level {
        StatusLevel::Info => info!("{} {}", prefix, notice.message),
        StatusLevel::Warning => warn!("{} {}", prefix, notice.message),
        StatusLevel::Error => error!("{} {}", prefix, notice.message),
    }
}
