use juniper::graphql_object;

use crate::{
    api::{Context, err::{ApiResult, invalid_input}},
    prelude::*,
    store::{Todo, User},
};


#[graphql_object(Context = Context)]
impl Todo {
    fn id(&self) -> i32 {
        self.id
    }

    fn user_id(&self) -> i32 {
        self.user_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn completed(&self) -> bool {
        self.completed
    }

    /// The user this todo belongs to, or `null` if `userId` does not refer to
    /// an existing user.
    async fn user(&self, context: &Context) -> Option<User> {
        context.store.users.read().await.find_by_id(self.user_id).cloned()
    }
}

impl Todo {
    pub(crate) async fn load_all(context: &Context) -> Vec<Self> {
        context.store.todos.read().await.all().to_vec()
    }

    pub(crate) async fn load_for_user(user_id: i32, context: &Context) -> Vec<Self> {
        context.store.todos.read().await.for_user(user_id).cloned().collect()
    }

    pub(crate) async fn add(title: String, user_id: i32, context: &Context) -> ApiResult<Self> {
        if title.is_empty() {
            return Err(invalid_input!(key = "todo.empty-title", "title of a todo must not be empty"));
        }

        // ID assignment and insertion happen under the same write lock.
        let todo = context.store.todos.write().await.add(title, user_id)?;
        debug!(id = todo.id, user = user_id, "Added todo");
        Ok(todo)
    }

    pub(crate) async fn delete(id: i32, context: &Context) -> bool {
        let removed = context.store.todos.write().await.remove_by_id(id);
        if removed {
            debug!(id, "Removed todo");
        } else {
            debug!(id, "Todo to delete does not exist");
        }
        removed
    }
}
