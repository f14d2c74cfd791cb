//! Observation and action types of the environments and their batches.
use ndarray::{Array1, ArrayD, Axis, IxDyn};
use rounds_candle_agent::{dqn::Dqn, mlp::Mlp, ArrayBatch};
use rounds_classic_env::ClassicEnv;
use rounds_core::{
    generic_replay_buffer::{BatchBase, SimpleReplayBuffer, SimpleStepProcessor},
    Monitor,
};

#[derive(Clone, Debug)]
pub struct Obs(ArrayD<f32>);

impl rounds_core::Obs for Obs {
    fn dummy(_n: usize) -> Self {
        Self(ArrayD::zeros(IxDyn(&[0])))
    }

    fn len(&self) -> usize {
        self.0.shape()[0]
    }
}

impl From<ArrayD<f32>> for Obs {
    fn from(obs: ArrayD<f32>) -> Self {
        Obs(obs)
    }
}

impl From<Obs> for ArrayD<f32> {
    fn from(obs: Obs) -> Self {
        obs.0
    }
}

pub struct ObsBatch(ArrayBatch<f32>);

impl BatchBase for ObsBatch {
    fn new(capacity: usize) -> Self {
        Self(ArrayBatch::new(capacity))
    }

    fn push(&mut self, i: usize, data: Self) {
        self.0.push(i, data.0)
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self(self.0.sample(ixs))
    }
}

impl From<Obs> for ObsBatch {
    fn from(obs: Obs) -> Self {
        Self(ArrayBatch::from_array(obs.0))
    }
}

impl From<ObsBatch> for ArrayD<f32> {
    fn from(b: ObsBatch) -> Self {
        b.0.into()
    }
}

#[derive(Clone, Debug)]
pub struct Act(Vec<i32>);

impl rounds_core::Act for Act {}

impl From<Act> for Vec<i32> {
    fn from(value: Act) -> Self {
        value.0
    }
}

impl From<Vec<i32>> for Act {
    fn from(value: Vec<i32>) -> Self {
        Self(value)
    }
}

pub struct ActBatch(ArrayBatch<i64>);

impl BatchBase for ActBatch {
    fn new(capacity: usize) -> Self {
        Self(ArrayBatch::new(capacity))
    }

    fn push(&mut self, i: usize, data: Self) {
        self.0.push(i, data.0)
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        Self(self.0.sample(ixs))
    }
}

impl From<Act> for ActBatch {
    // One row per action
    fn from(act: Act) -> Self {
        let a = Array1::from_iter(act.0.into_iter().map(|v| v as i64));
        Self(ArrayBatch::from_array(a.insert_axis(Axis(1)).into_dyn()))
    }
}

impl From<ActBatch> for ArrayD<i64> {
    fn from(act: ActBatch) -> Self {
        act.0.into()
    }
}

pub type Env = Monitor<ClassicEnv<Obs, Act>>;
pub type StepProc = SimpleStepProcessor<Env, ObsBatch, ActBatch>;
pub type ReplayBuffer = SimpleReplayBuffer<ObsBatch, ActBatch>;
pub type RoundAgent = Dqn<Env, Mlp, ReplayBuffer>;
