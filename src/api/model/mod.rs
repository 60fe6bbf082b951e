//! GraphQL object types and the store access behind them.

pub(crate) mod todo;
pub(crate) mod user;
