use juniper::graphql_object;

use crate::{
    api::Context,
    prelude::*,
    store::{Todo, User},
};


#[graphql_object(Context = Context)]
impl User {
    fn id(&self) -> i32 {
        self.id
    }

    /// The name of the user intended to be read by humans.
    fn name(&self) -> &str {
        &self.name
    }

    /// A unique, short handle of the user.
    fn username(&self) -> &str {
        &self.username
    }

    fn email(&self) -> &str {
        &self.email
    }

    fn phone(&self) -> &str {
        &self.phone
    }

    fn website(&self) -> &str {
        &self.website
    }

    /// All todos of this user, in the order they were added.
    async fn todos(&self, context: &Context) -> Vec<Todo> {
        Todo::load_for_user(self.id, context).await
    }
}

impl User {
    pub(crate) async fn load_all(context: &Context) -> Vec<Self> {
        context.store.users.read().await.all().to_vec()
    }

    pub(crate) async fn update_name(id: i32, name: String, context: &Context) -> Option<Self> {
        let mut users = context.store.users.write().await;
        let user = users.update_name(id, name).cloned();
        match &user {
            Some(user) => debug!(id, name = %user.name, "Renamed user"),
            None => debug!(id, "User to rename does not exist"),
        }
        user
    }
}
