use juniper::graphql_object;

use crate::store::{Todo, User};
use super::Context;


/// The root query object.
pub(crate) struct Query;

#[graphql_object(Context = Context)]
impl Query {
    /// Returns all todos in the order they were added.
    async fn todos(context: &Context) -> Option<Vec<Todo>> {
        Some(Todo::load_all(context).await)
    }

    /// Returns all users.
    async fn users(context: &Context) -> Option<Vec<User>> {
        Some(User::load_all(context).await)
    }
}
