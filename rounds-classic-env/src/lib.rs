#![warn(missing_docs)]
//! Classic-control environments implemented in Rust.
//!
//! [`ClassicEnv`] implements [`Env`](rounds_core::Env) for the environments
//! listed in [`EnvId`]. The dynamics, reward, termination conditions and time
//! limits follow those of the gym classic-control suite.
//!
//! ## Observation
//!
//! Observations are created as [`ndarray::ArrayD`] with shape `[1, obs_dim]`
//! and converted to the type parameter `O` of [`ClassicEnv`], which must
//! implement [`From<ArrayD<f32>>`](ndarray::ArrayD).
//!
//! ## Action
//!
//! Actions are discrete. The type parameter `A` of [`ClassicEnv`] is converted
//! to [`Vec<i32>`], whose first element is the index of the action.
mod acrobot;
mod base;
mod cartpole;
mod config;
mod env_id;
mod mountain_car;
pub use base::{ClassicEnv, ClassicInfo};
pub use config::ClassicEnvConfig;
pub use env_id::EnvId;

/// Dynamics of a classic-control system.
pub(crate) trait Dynamics {
    /// Draws an initial state and returns the observation.
    fn reset(&mut self, rng: &mut rand::rngs::StdRng) -> Vec<f32>;

    /// Applies an action and returns the observation, the reward and whether
    /// a terminal state was reached.
    fn step(&mut self, action: usize) -> (Vec<f32>, f32, bool);
}
