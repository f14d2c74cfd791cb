use rounds_candle_agent::{
    dqn::{DqnConfig, DqnModelConfig, EpsilonGreedy},
    mlp::MlpConfig,
    opt::OptimizerConfig,
    util::CriticLoss,
    Device,
};

const LR_CRITIC: f64 = 5e-4;
const DISCOUNT_FACTOR: f64 = 0.99;
const BATCH_SIZE: usize = 32;
const TARGET_UPDATE_INTERVAL: usize = 500;
const TAU: f64 = 1.0;
const UNITS: [i64; 2] = [64, 64];
const EPS_FINAL: f64 = 0.02;
// 10% of the training budget
const EXPLORATION_STEPS: usize = 10_000;
const CRITIC_LOSS: CriticLoss = CriticLoss::SmoothL1;

/// Configuration of the DQN agent of a round.
///
/// The agent starts in training mode and is seeded with `seed`.
pub fn create_agent_config(in_dim: i64, out_dim: i64, seed: u64) -> DqnConfig<MlpConfig> {
    let opt_config = OptimizerConfig::default().learning_rate(LR_CRITIC);
    let mlp_config = MlpConfig::new(in_dim, UNITS.to_vec(), out_dim, false).dueling(true);
    let model_config = DqnModelConfig::default()
        .q_config(mlp_config)
        .out_dim(out_dim)
        .opt_config(opt_config);
    DqnConfig::default()
        .batch_size(BATCH_SIZE)
        .discount_factor(DISCOUNT_FACTOR)
        .target_update_interval(TARGET_UPDATE_INTERVAL)
        .tau(TAU)
        .double_dqn(true)
        .explorer(EpsilonGreedy::with_final_step(EXPLORATION_STEPS).eps_final(EPS_FINAL))
        .model_config(model_config)
        .critic_loss(CRITIC_LOSS)
        .seed(seed)
        .train(true)
        .device(Device::Cpu)
}
