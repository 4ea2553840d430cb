//! Error types for edit-mode physics.

use std::path::PathBuf;

/// Errors produced by the simulator core.
///
/// None of these are fatal: the controller reports them as status notices
/// and carries on with the next tick.
#[derive(Debug, thiserror::Error)]
pub enum EditPhysicsError {
    #[error("step delta must be a positive number of seconds, got {0}")]
    InvalidStepDelta(f32),

    #[error("body {0} no longer exists in the scene")]
    StaleBody(String),

    #[error("physics is unavailable: {0}")]
    PhysicsUnavailable(String),

    #[error("manual advance rejected, the host still drives the physics clock")]
    AdvanceRejected,
}

/// Errors while loading, saving or validating [`SimulatorSettings`](crate::settings::SimulatorSettings).
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
