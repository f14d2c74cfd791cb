use anyhow::Result;
use ndarray::{Array1, ArrayD, Axis};
use rounds_candle_agent::{
    dqn::{Dqn, DqnConfig, DqnModelConfig, EpsilonGreedy},
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
    ArrayBatch, Device,
};
use rounds_classic_env::{ClassicEnv, ClassicEnvConfig};
use rounds_core::{
    generic_replay_buffer::{
        SimpleReplayBuffer, SimpleReplayBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    },
    record::NullRecorder,
    Act, Agent, Configurable, Env as _, Obs, Policy, ReplayBufferBase, StepProcessor, Trainer,
    TrainerConfig,
};
use tempdir::TempDir;

#[derive(Clone, Debug)]
struct TestObs(ArrayD<f32>);

impl Obs for TestObs {
    fn dummy(_n: usize) -> Self {
        Self(ArrayD::zeros(vec![1, 4]))
    }

    fn len(&self) -> usize {
        self.0.shape()[0]
    }
}

impl From<ArrayD<f32>> for TestObs {
    fn from(obs: ArrayD<f32>) -> Self {
        Self(obs)
    }
}

impl From<TestObs> for ArrayD<f32> {
    fn from(obs: TestObs) -> Self {
        obs.0
    }
}

impl From<TestObs> for ArrayBatch<f32> {
    fn from(obs: TestObs) -> Self {
        ArrayBatch::from_array(obs.0)
    }
}

#[derive(Clone, Debug)]
struct TestAct(Vec<i32>);

impl Act for TestAct {}

impl From<Vec<i32>> for TestAct {
    fn from(act: Vec<i32>) -> Self {
        Self(act)
    }
}

impl From<TestAct> for Vec<i32> {
    fn from(act: TestAct) -> Self {
        act.0
    }
}

impl From<TestAct> for ArrayBatch<i64> {
    fn from(act: TestAct) -> Self {
        let a = Array1::from(act.0.iter().map(|v| *v as i64).collect::<Vec<_>>());
        ArrayBatch::from_array(a.insert_axis(Axis(1)).into_dyn())
    }
}

type Env = ClassicEnv<TestObs, TestAct>;
type Buffer = SimpleReplayBuffer<ArrayBatch<f32>, ArrayBatch<i64>>;
type StepProc = SimpleStepProcessor<Env, ArrayBatch<f32>, ArrayBatch<i64>>;
type TestDqn = Dqn<Env, Mlp, Buffer>;

fn agent_config(seed: u64) -> DqnConfig<MlpConfig> {
    let model_config = DqnModelConfig::default()
        .q_config(MlpConfig::new(4, vec![16, 16], 2, false).dueling(true))
        .opt_config(OptimizerConfig::Adam { lr: 1e-3 });
    DqnConfig::default()
        .model_config(model_config)
        .batch_size(8)
        .target_update_interval(10)
        .explorer(EpsilonGreedy::with_final_step(100))
        .seed(seed)
        .device(Device::Cpu)
}

#[test]
fn test_train_save_load() -> Result<()> {
    let env = Env::build(&ClassicEnvConfig::default(), 0)?;
    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default().capacity(1000));
    let mut agent = TestDqn::build(agent_config(0))?;
    let mut trainer = Trainer::build(
        TrainerConfig::default()
            .total_timesteps(200)
            .warmup_period(50)
            .opt_interval(1),
    );
    let mut hook = |_: &rounds_core::StepContext| true;

    let report = trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut NullRecorder::default(),
        &mut hook,
    )?;
    assert_eq!(report.env_steps, 200);
    assert_eq!(report.opt_steps, 150);
    assert_eq!(agent.n_opts(), 150);
    assert!(agent.is_train());

    let dir = TempDir::new("dqn")?;
    let path = dir.path().join("000.model");
    agent.save_params(&path)?;
    assert!(path.exists());

    let mut agent2 = TestDqn::build(agent_config(1))?;
    agent2.load_params(&path)?;

    let obs = TestObs(ArrayD::from_shape_vec(vec![1, 4], vec![0.01, -0.02, 0.03, 0.0])?);
    let q1 = agent.q_values(&obs)?.flatten_all()?.to_vec1::<f32>()?;
    let q2 = agent2.q_values(&obs)?.flatten_all()?.to_vec1::<f32>()?;
    assert_eq!(q1, q2);

    agent.eval();
    agent2.eval();
    assert_eq!(agent.sample(&obs)?.0, agent2.sample(&obs)?.0);
    Ok(())
}

#[test]
fn test_opt_on_empty_buffer_fails() -> Result<()> {
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default());
    let mut agent = TestDqn::build(agent_config(0))?;
    assert!(agent.opt_with_record(&mut buffer).is_err());
    Ok(())
}

#[test]
fn test_opt_records_loss() -> Result<()> {
    let mut env = Env::build(&ClassicEnvConfig::default(), 3)?;
    let mut step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default());
    let mut agent = TestDqn::build(agent_config(3).train(true))?;

    let obs = env.reset(None)?;
    step_proc.reset(obs.clone());
    let mut obs = obs;
    for _ in 0..20 {
        let act = agent.sample(&obs)?;
        let (step, _) = env.step_with_reset(&act)?;
        obs = match step.is_done() {
            true => step.init_obs.clone().unwrap(),
            false => step.obs.clone(),
        };
        rounds_core::ExperienceBufferBase::push(&mut buffer, step_proc.process(step))?;
    }

    let record = agent.opt_with_record(&mut buffer)?;
    assert!(record.get_scalar("loss_critic")?.is_finite());
    // 20 actions taken on the schedule of 100 steps
    assert!((record.get_scalar("eps")? - 0.804).abs() < 1e-5);
    Ok(())
}
