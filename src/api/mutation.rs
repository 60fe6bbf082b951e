use juniper::graphql_object;

use crate::store::{Todo, User};
use super::{Context, err::ApiResult};


/// The root mutation object.
pub(crate) struct Mutation;

#[graphql_object(Context = Context)]
impl Mutation {
    /// Adds a new, not yet completed todo and returns it. `title` must not be
    /// empty. `userId` is not checked: todos of unknown users simply have no
    /// `user`.
    ///
    /// The result is nullable so that a failed `addTodo` does not discard the
    /// results of other mutations in the same operation.
    async fn add_todo(title: String, user_id: i32, context: &Context) -> ApiResult<Option<Todo>> {
        Todo::add(title, user_id, context).await.map(Some)
    }

    /// Changes the name of a user. Returns the updated user or `null` if
    /// there is no user with the given ID.
    async fn update_user(id: i32, name: String, context: &Context) -> Option<User> {
        User::update_name(id, name, context).await
    }

    /// Removes a todo. Returns `false` if there was no todo with the given
    /// ID.
    async fn delete_todo(id: i32, context: &Context) -> Option<bool> {
        Some(Todo::delete(id, context).await)
    }
}
