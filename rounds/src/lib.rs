//! Repeated DQN training rounds.
//!
//! Each round trains a fresh agent on a fresh, monitored environment until a
//! target number of episodes is reached or the step budget is used up, then
//! saves the agent to `<logdir>/<round:03>.model`.
mod agent;
mod config;
mod round;
mod types;
pub use agent::create_agent_config;
pub use config::{ensure_log_dir, Args, RunConfig};
pub use round::{log_prefix, model_path, run, run_round, TOTAL_TIMESTEPS};
pub use types::{Act, ActBatch, Env, Obs, ObsBatch, ReplayBuffer, RoundAgent, StepProc};
