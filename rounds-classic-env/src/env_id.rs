use crate::{acrobot::Acrobot, cartpole::CartPole, mountain_car::MountainCar, Dynamics};
use rounds_core::error::RoundsError;
use std::{fmt, str::FromStr};

/// Identifier of an available environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvId {
    /// `CartPole-v0`, 200 steps per episode.
    CartPoleV0,

    /// `CartPole-v1`, 500 steps per episode.
    CartPoleV1,

    /// `MountainCar-v0`, 200 steps per episode.
    MountainCarV0,

    /// `Acrobot-v1`, 500 steps per episode.
    AcrobotV1,
}

impl EnvId {
    /// All available environments.
    pub const ALL: [EnvId; 4] = [
        EnvId::CartPoleV0,
        EnvId::CartPoleV1,
        EnvId::MountainCarV0,
        EnvId::AcrobotV1,
    ];

    /// Name of the environment, e.g. `CartPole-v1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CartPoleV0 => "CartPole-v0",
            Self::CartPoleV1 => "CartPole-v1",
            Self::MountainCarV0 => "MountainCar-v0",
            Self::AcrobotV1 => "Acrobot-v1",
        }
    }

    /// Dimension of observations.
    pub fn obs_dim(&self) -> usize {
        match self {
            Self::CartPoleV0 | Self::CartPoleV1 => 4,
            Self::MountainCarV0 => 2,
            Self::AcrobotV1 => 6,
        }
    }

    /// The number of discrete actions.
    pub fn n_actions(&self) -> usize {
        match self {
            Self::CartPoleV0 | Self::CartPoleV1 => 2,
            Self::MountainCarV0 | Self::AcrobotV1 => 3,
        }
    }

    /// Time limit of an episode.
    pub fn max_episode_steps(&self) -> usize {
        match self {
            Self::CartPoleV0 | Self::MountainCarV0 => 200,
            Self::CartPoleV1 | Self::AcrobotV1 => 500,
        }
    }

    pub(crate) fn dynamics(&self) -> Box<dyn Dynamics> {
        match self {
            Self::CartPoleV0 | Self::CartPoleV1 => Box::new(CartPole::default()),
            Self::MountainCarV0 => Box::new(MountainCar::default()),
            Self::AcrobotV1 => Box::new(Acrobot::default()),
        }
    }
}

impl FromStr for EnvId {
    type Err = RoundsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|id| id.as_str() == s)
            .copied()
            .ok_or_else(|| RoundsError::UnknownEnv(s.to_string()))
    }
}

impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        for id in EnvId::ALL {
            assert_eq!(id.as_str().parse::<EnvId>().unwrap(), id);
        }
        assert_eq!(EnvId::CartPoleV1.to_string(), "CartPole-v1");
        assert_eq!(EnvId::CartPoleV1.max_episode_steps(), 500);
        assert!(matches!(
            "Pong-v4".parse::<EnvId>(),
            Err(RoundsError::UnknownEnv(name)) if name == "Pong-v4"
        ));
    }
}
