//! Action selection.
use super::Env;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Chooses actions on an environment `E`.
pub trait Policy<E: Env> {
    /// Returns the action for `obs`. Fails if the model cannot be evaluated.
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act>;
}

/// Objects built from a serde configuration.
pub trait Configurable {
    /// Configuration type.
    type Config: Clone + DeserializeOwned;

    /// Builds the object from `config`.
    fn build(config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Reads the configuration from a YAML file and builds the object.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let rdr = std::io::BufReader::new(std::fs::File::open(path)?);
        Self::build(serde_yaml::from_reader(rdr)?)
    }
}
