use anyhow::Result;
use ndarray::ArrayD;
use rounds_classic_env::{ClassicEnv, ClassicEnvConfig, EnvId};
use rounds_core::{error::RoundsError, Act, Env, Obs};

#[derive(Clone, Debug)]
struct TestObs(ArrayD<f32>);

impl Obs for TestObs {
    fn dummy(_n: usize) -> Self {
        Self(ArrayD::zeros(vec![1, 1]))
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

#[derive(Clone, Debug)]
struct TestAct(i32);

impl Act for TestAct {}

impl From<TestAct> for Vec<i32> {
    fn from(act: TestAct) -> Self {
        vec![act.0]
    }
}

type TestEnv = ClassicEnv<TestObs, TestAct>;

fn config(name: &str) -> ClassicEnvConfig {
    ClassicEnvConfig::default().name(name)
}

#[test]
fn test_observation_shape() -> Result<()> {
    for id in EnvId::ALL {
        let mut env = TestEnv::build(&config(id.as_str()), 0)?;
        let obs = env.reset(None)?;
        assert_eq!(obs.0.shape(), &[1, id.obs_dim()]);
        assert_eq!(obs.len(), 1);

        let (step, _) = env.step(&TestAct(0))?;
        assert_eq!(step.obs.0.shape(), &[1, id.obs_dim()]);
        assert_eq!(step.reward.len(), 1);
    }
    Ok(())
}

#[test]
fn test_time_limit_truncates() -> Result<()> {
    let mut env = TestEnv::build(&config("MountainCar-v0"), 0)?;
    assert_eq!(env.max_steps(), 200);
    env.reset(None)?;
    for t in 1..=200 {
        let (step, _) = env.step(&TestAct(1))?;
        assert_eq!(step.is_terminated[0], 0);
        assert_eq!(step.is_truncated[0], (t == 200) as i8);
    }
    Ok(())
}

#[test]
fn test_max_steps_override() -> Result<()> {
    let mut env = TestEnv::build(&config("Acrobot-v1").max_steps(Some(3)), 0)?;
    env.reset(None)?;
    env.step(&TestAct(1))?;
    env.step(&TestAct(1))?;
    let (step, _) = env.step_with_reset(&TestAct(1))?;
    assert!(step.is_done());
    assert!(step.init_obs.is_some());
    Ok(())
}

#[test]
fn test_seeding() -> Result<()> {
    let mut env1 = TestEnv::build(&config("CartPole-v1"), 7)?;
    let mut env2 = TestEnv::build(&config("CartPole-v1"), 7)?;
    assert_eq!(env1.reset(None)?.0, env2.reset(None)?.0);

    let obs1 = env1.reset_with_index(3)?;
    let obs2 = env2.reset_with_index(3)?;
    assert_eq!(obs1.0, obs2.0);
    let obs3 = env2.reset_with_index(4)?;
    assert_ne!(obs1.0, obs3.0);
    Ok(())
}

#[test]
fn test_cartpole_episode_ends() -> Result<()> {
    let mut env = TestEnv::build(&config("CartPole-v1"), 0)?;
    env.reset(None)?;
    let mut total = 0.0;
    for _ in 0..500 {
        let (step, _) = env.step(&TestAct(0))?;
        total += step.reward[0];
        if step.is_done() {
            assert_eq!(step.is_terminated[0], 1);
            assert!(total > 1.0);
            return Ok(());
        }
    }
    panic!("pushing left must end the episode");
}

#[test]
fn test_errors() -> Result<()> {
    let err = TestEnv::build(&config("CartPole-v9"), 0).err().expect("unknown env");
    assert!(matches!(
        err.downcast_ref::<RoundsError>(),
        Some(RoundsError::UnknownEnv(_))
    ));

    let mut env = TestEnv::build(&config("CartPole-v0"), 0)?;
    env.reset(None)?;
    let err = env.step(&TestAct(2)).err().expect("invalid action");
    assert!(matches!(
        err.downcast_ref::<RoundsError>(),
        Some(RoundsError::InvalidAction {
            action: 2,
            n_actions: 2
        })
    ));
    Ok(())
}
