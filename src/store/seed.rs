//! Initial data of the stores.

use serde::Deserialize;
use std::{collections::HashSet, fs, path::Path};

use crate::prelude::*;
use super::{Todo, User};


/// The data compiled into the binary, used when no seed file is configured.
const BUILTIN: &str = include_str!("seed.yaml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Seed {
    pub(crate) users: Vec<User>,

    #[serde(default)]
    pub(crate) todos: Vec<Todo>,
}

impl Seed {
    pub(crate) fn builtin() -> Result<Self> {
        Self::parse(BUILTIN).context("built-in seed data is invalid")
    }

    /// Loads the seed from the configured file, or the built-in one if none
    /// is configured.
    pub(crate) fn load(config: &super::StoreConfig) -> Result<Self> {
        match &config.seed_file {
            Some(path) => Self::load_from(path),
            None => Self::builtin(),
        }
    }

    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
        let seed = Self::parse(&src)
            .with_context(|| format!("invalid seed file '{}'", path.display()))?;
        info!("Loaded seed data from '{}'", path.display());
        Ok(seed)
    }

    fn parse(src: &str) -> Result<Self> {
        let seed: Self = serde_yaml::from_str(src)?;
        seed.validate()?;
        Ok(seed)
    }

    fn validate(&self) -> Result<()> {
        let mut user_ids = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id) {
                bail!("duplicate user ID {}", user.id);
            }
        }

        let mut todo_ids = HashSet::new();
        for todo in &self.todos {
            if !todo_ids.insert(todo.id) {
                bail!("duplicate todo ID {}", todo.id);
            }
            if !user_ids.contains(&todo.user_id) {
                warn!("Todo {} belongs to unknown user {}", todo.id, todo.user_id);
            }
        }

        Ok(())
    }
}
