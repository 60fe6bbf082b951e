//! In-memory storage of todos and users.
//!
//! Both collections live for the whole process and are initialized from
//! [`Seed`] data at startup. Each collection is guarded by its own lock:
//! resolvers never hold both at the same time.

use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::prelude::*;

mod seed;
mod todo;
mod user;

pub(crate) use self::{
    seed::Seed,
    todo::{Todo, TodoStore},
    user::{User, UserStore},
};


#[derive(Debug, confique::Config)]
pub(crate) struct StoreConfig {
    /// YAML file with the initial users and todos. If not set, a small
    /// built-in data set is used. The file has two top level keys, `users`
    /// and `todos`, each being a list. Example:
    ///
    ///    users:
    ///      - { id: 1, name: Leanne Graham, username: Bret, email: Sincere@april.biz,
    ///          phone: 1-770-736-8031, website: hildegard.org }
    ///    todos:
    ///      - { id: 1, userId: 1, title: "delectus aut autem", completed: false }
    pub(crate) seed_file: Option<PathBuf>,
}

pub(crate) struct Store {
    pub(crate) todos: RwLock<TodoStore>,
    pub(crate) users: RwLock<UserStore>,
}

impl Store {
    pub(crate) fn new(seed: Seed) -> Self {
        debug!("Initializing store with {} users and {} todos", seed.users.len(), seed.todos.len());
        Self {
            todos: RwLock::new(TodoStore::new(seed.todos)),
            users: RwLock::new(UserStore::new(seed.users)),
        }
    }
}
