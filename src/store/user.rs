use serde::Deserialize;


#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct User {
    pub(crate) id: i32,
    pub(crate) name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) website: String,
}

/// All users. The set of users is fixed at startup; only names can change.
#[derive(Debug, Default)]
pub(crate) struct UserStore {
    users: Vec<User>,
}

impl UserStore {
    pub(crate) fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    pub(crate) fn all(&self) -> &[User] {
        &self.users
    }

    pub(crate) fn find_by_id(&self, id: i32) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Sets the name of the user with the given ID and returns the updated
    /// user, or `None` if no such user exists.
    pub(crate) fn update_name(&mut self, id: i32, name: String) -> Option<&User> {
        let user = self.users.iter_mut().find(|u| u.id == id)?;
        user.name = name;
        Some(user)
    }
}


#[cfg(test)]
mod tests {
    use super::{User, UserStore};

    fn users() -> Vec<User> {
        ["alice", "bob"].iter().zip(1..).map(|(&username, id)| User {
            id,
            name: format!("{username} name"),
            username: username.into(),
            email: format!("{username}@example.com"),
            phone: "555-1234".into(),
            website: format!("{username}.example.com"),
        }).collect()
    }

    #[test]
    fn find() {
        let store = UserStore::new(users());
        assert_eq!(store.find_by_id(2).map(|u| u.username.as_str()), Some("bob"));
        assert_eq!(store.find_by_id(3), None);
    }

    #[test]
    fn update_name() {
        let mut store = UserStore::new(users());
        let updated = store.update_name(1, "Alice B".into()).cloned();

        let mut expected = users()[0].clone();
        expected.name = "Alice B".into();
        assert_eq!(updated, Some(expected.clone()));
        assert_eq!(store.all(), &[expected, users()[1].clone()]);
    }

    #[test]
    fn update_unknown_name() {
        let mut store = UserStore::new(users());
        assert_eq!(store.update_name(99999, "X".into()), None);
        assert_eq!(store.all(), users().as_slice());
    }
}
