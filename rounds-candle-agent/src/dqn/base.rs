//! DQN agent implemented with candle.
use super::{
    config::DqnConfig,
    explorer::{greedy, EpsilonGreedy},
    model::DqnModel,
};
use crate::{
    model::SubModel1,
    util::{arrayd_to_tensor, not_terminated, smooth_l1_loss, track, CriticLoss, OutDim},
    Device as RoundsDevice,
};
use anyhow::Result;
use candle_core::{shape::D, Device, Tensor};
use candle_nn::loss::mse;
use log::debug;
use ndarray::ArrayD;
use rand::{rngs::StdRng, SeedableRng};
use rounds_core::{
    record::{Record, RecordValue},
    Agent, Configurable, Env, Policy, ReplayBufferBase, TransitionBatch,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashMap, marker::PhantomData, path::Path};

#[allow(clippy::upper_case_acronyms)]
/// DQN agent implemented with candle.
///
/// The online network `qnet` is trained on transitions sampled from the
/// replay buffer; the target network `qnet_tgt` follows it every
/// `target_update_interval` optimization steps.
pub struct Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<ArrayD<f32>>,
    E::Act: From<Vec<i32>>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<ArrayD<f32>>,
    <R::Batch as TransitionBatch>::ActBatch: Into<ArrayD<i64>>,
{
    batch_size: usize,
    discount_factor: f64,
    target_update_interval: usize,
    tau: f64,
    train: bool,
    explorer: EpsilonGreedy,
    double_dqn: bool,
    critic_loss: CriticLoss,
    qnet: DqnModel<Q>,
    qnet_tgt: DqnModel<Q>,
    device: Device,
    n_opts: usize,
    rng: StdRng,
    phantom: PhantomData<(E, R)>,
}

impl<E, Q, R> Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<ArrayD<f32>>,
    E::Act: From<Vec<i32>>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<ArrayD<f32>>,
    <R::Batch as TransitionBatch>::ActBatch: Into<ArrayD<i64>>,
{
    fn update_critic(&mut self, buffer: &mut R) -> Result<f32> {
        let batch = buffer.batch(self.batch_size)?;
        let (obs, act, next_obs, reward, is_terminated, _) = batch.unpack();
        let n = reward.len();
        let obs = arrayd_to_tensor::<f32, f32>(obs.into(), &self.device)?;
        let act = arrayd_to_tensor::<i64, i64>(act.into(), &self.device)?.reshape((n, 1))?;
        let next_obs = arrayd_to_tensor::<f32, f32>(next_obs.into(), &self.device)?;
        let reward = Tensor::from_slice(&reward[..], (n,), &self.device)?;
        let is_not_terminated = not_terminated(&is_terminated, &self.device)?;

        let pred = self
            .qnet
            .forward(&obs)?
            .gather(&act, D::Minus1)?
            .squeeze(D::Minus1)?;

        let tgt = {
            let q = if self.double_dqn {
                let y = self.qnet.forward(&next_obs)?.argmax_keepdim(D::Minus1)?;
                self.qnet_tgt.forward(&next_obs)?.gather(&y, D::Minus1)?
            } else {
                self.qnet_tgt.forward(&next_obs)?.max_keepdim(D::Minus1)?
            };
            let q = q.squeeze(D::Minus1)?;
            (reward + ((is_not_terminated * q)? * self.discount_factor)?)?.detach()
        };

        let loss = match self.critic_loss {
            CriticLoss::Mse => mse(&pred, &tgt)?,
            CriticLoss::SmoothL1 => smooth_l1_loss(&pred, &tgt)?,
        };

        self.qnet.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    fn opt_(&mut self, buffer: &mut R) -> Result<Record> {
        let loss_critic = self.update_critic(buffer)?;

        self.n_opts += 1;
        if self.n_opts % self.target_update_interval == 0 {
            track(self.qnet_tgt.get_varmap(), self.qnet.get_varmap(), self.tau)?;
        }

        Ok(Record::from_slice(&[
            ("loss_critic", RecordValue::Scalar(loss_critic)),
            ("eps", RecordValue::Scalar(self.explorer.eps() as f32)),
        ]))
    }

    /// The number of optimization steps done so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Returns action values for the given observation.
    pub fn q_values(&self, obs: &E::Obs) -> Result<Tensor> {
        let obs = arrayd_to_tensor::<f32, f32>(obs.clone().into(), &self.device)?;
        self.qnet.forward(&obs)
    }
}

impl<E, Q, R> Policy<E> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<ArrayD<f32>>,
    E::Act: From<Vec<i32>>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<ArrayD<f32>>,
    <R::Batch as TransitionBatch>::ActBatch: Into<ArrayD<i64>>,
{
    /// In training mode, actions are taken with the epsilon-greedy explorer.
    /// In evaluation mode, the greedy action is taken.
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let q = self.q_values(obs)?;
        let act = match self.train {
            true => self.explorer.action(&q, &mut self.rng)?,
            false => greedy(&q)?,
        };
        Ok(act.into())
    }
}

impl<E, Q, R> Configurable for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<ArrayD<f32>>,
    E::Act: From<Vec<i32>>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<ArrayD<f32>>,
    <R::Batch as TransitionBatch>::ActBatch: Into<ArrayD<i64>>,
{
    type Config = DqnConfig<Q::Config>;

    /// Constructs DQN agent.
    ///
    /// The target network starts as a copy of the online network.
    /// The CPU is used if no device is given.
    fn build(config: Self::Config) -> Result<Self> {
        let device: Device = config.device.unwrap_or(RoundsDevice::Cpu).try_into()?;
        let qnet = DqnModel::build(config.model_config.clone(), device.clone())?;
        let qnet_tgt = DqnModel::build(config.model_config, device.clone())?;
        track(qnet_tgt.get_varmap(), qnet.get_varmap(), 1.0)?;

        Ok(Dqn {
            batch_size: config.batch_size,
            discount_factor: config.discount_factor,
            target_update_interval: config.target_update_interval.max(1),
            tau: config.tau,
            train: config.train,
            explorer: config.explorer,
            double_dqn: config.double_dqn,
            critic_loss: config.critic_loss,
            qnet,
            qnet_tgt,
            device,
            n_opts: 0,
            rng: StdRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        })
    }
}

impl<E, Q, R> Agent<E, R> for Dqn<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase,
    E::Obs: Into<ArrayD<f32>>,
    E::Act: From<Vec<i32>>,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
    R::Batch: TransitionBatch,
    <R::Batch as TransitionBatch>::ObsBatch: Into<ArrayD<f32>>,
    <R::Batch as TransitionBatch>::ActBatch: Into<ArrayD<i64>>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record> {
        self.opt_(buffer)
    }

    /// Saves the online and the target networks into a single safetensors file.
    fn save_params(&self, path: &Path) -> Result<()> {
        let tensors: HashMap<String, Tensor> = self
            .qnet
            .named_tensors("qnet")?
            .into_iter()
            .chain(self.qnet_tgt.named_tensors("qnet_tgt")?)
            .collect();
        candle_core::safetensors::save(&tensors, path)?;
        debug!("Save DQN agent to {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let tensors = candle_core::safetensors::load(path, &self.device)?;
        self.qnet.set_tensors("qnet", &tensors)?;
        self.qnet_tgt.set_tensors("qnet_tgt", &tensors)?;
        debug!("Load DQN agent from {:?}", path);
        Ok(())
    }
}
