//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum RoundsError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The environment was reset before the end of an episode.
    #[error(
        "Tried to reset an environment before done. \
         Build the monitor with `allow_early_resets(true)` to allow early resets"
    )]
    EarlyReset,

    /// The environment was stepped after the end of an episode without a reset.
    #[error("Tried to step an environment that needs reset")]
    StepAfterDone,

    /// Batch was requested from an empty replay buffer.
    #[error("Cannot sample a batch from an empty replay buffer")]
    EmptyReplayBuffer,

    /// The requested environment is not available.
    #[error("Unknown environment id: {0}")]
    UnknownEnv(String),

    /// The action is out of the action space.
    #[error("Invalid action {action}: must be less than {n_actions}")]
    InvalidAction {
        /// The given action.
        action: i32,
        /// The number of available actions.
        n_actions: usize,
    },
}
