//! Configuration of [`ClassicEnv`](crate::ClassicEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ClassicEnv`](crate::ClassicEnv).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClassicEnvConfig {
    /// Name of the environment, e.g. `CartPole-v1`.
    pub name: String,

    /// Overrides the time limit of the environment.
    pub max_steps: Option<usize>,
}

impl Default for ClassicEnvConfig {
    fn default() -> Self {
        Self {
            name: "CartPole-v1".to_string(),
            max_steps: None,
        }
    }
}

impl ClassicEnvConfig {
    /// Sets the name of the environment.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Loads [`ClassicEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ClassicEnvConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
