use serde::Deserialize;

use crate::prelude::*;


/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Todo {
    pub(crate) id: i32,
    pub(crate) user_id: i32,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) completed: bool,
}

/// Ordered list of all todos.
///
/// Besides the todos themselves, this remembers the highest ID ever handed
/// out. New IDs are always derived from that, so deleting the todo with the
/// highest ID does not lead to that ID being reused.
#[derive(Debug, Default)]
pub(crate) struct TodoStore {
    todos: Vec<Todo>,
    max_id: i32,
}

impl TodoStore {
    pub(crate) fn new(todos: Vec<Todo>) -> Self {
        let max_id = todos.iter().map(|t| t.id).max().unwrap_or(0);
        Self { todos, max_id }
    }

    pub(crate) fn all(&self) -> &[Todo] {
        &self.todos
    }

    /// Returns all todos belonging to the given user, in store order.
    pub(crate) fn for_user(&self, user_id: i32) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(move |t| t.user_id == user_id)
    }

    /// The ID the next created todo will get. `1` for a store that never
    /// contained any todos.
    pub(crate) fn next_id(&self) -> Result<i32> {
        self.max_id.checked_add(1).ok_or_else(|| anyhow!("todo ID space exhausted"))
    }

    /// Appends the given todo, keeping the order of all existing ones.
    pub(crate) fn append(&mut self, todo: Todo) {
        self.max_id = self.max_id.max(todo.id);
        self.todos.push(todo);
    }

    /// Creates a new, not yet completed todo with a fresh ID and appends it.
    pub(crate) fn add(&mut self, title: String, user_id: i32) -> Result<Todo> {
        let todo = Todo {
            id: self.next_id()?,
            user_id,
            title,
            completed: false,
        };
        self.append(todo.clone());
        Ok(todo)
    }

    /// Removes the first todo with the given ID. Returns `false` if there is
    /// no such todo, in which case nothing is changed.
    pub(crate) fn remove_by_id(&mut self, id: i32) -> bool {
        match self.todos.iter().position(|t| t.id == id) {
            Some(idx) => {
                self.todos.remove(idx);
                true
            }
            None => false,
        }
    }
}
