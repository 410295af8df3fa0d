//! Domain types held in a client's session.
//!
//! # Design
//! Lists and todos are addressed by numeric ids rather than by their position
//! in the owning `Vec`. A list id is allocated from a per-session counter and
//! never reused, so deleting one list leaves every other list's URL valid.
//! Todo ids are unique within their list only.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a list within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub u64);

/// Identifier of a todo within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ListId)
    }
}

impl FromStr for TodoId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(TodoId)
    }
}

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub completed: bool,
}

/// A named, ordered collection of todos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct List {
    pub id: ListId,
    pub name: String,
    pub todos: Vec<Todo>,
}

impl List {
    pub fn new(id: ListId, name: String) -> Self {
        Self {
            id,
            name,
            todos: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Number of todos not yet completed.
    pub fn remaining(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    /// A list is complete once it has at least one todo and none remaining.
    /// Empty lists count as incomplete.
    pub fn is_complete(&self) -> bool {
        !self.todos.is_empty() && self.remaining() == 0
    }

    pub fn todo(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn todo_mut(&mut self, id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == id)
    }

    /// Todos with incomplete ones first; order within each group is kept.
    pub fn todos_sorted(&self) -> Vec<&Todo> {
        stable_partition(&self.todos, |todo| !todo.completed)
    }

    /// One past the highest todo id in this list, or 1 when it is empty.
    pub(crate) fn next_todo_id(&self) -> TodoId {
        let max = self.todos.iter().map(|todo| todo.id.0).max().unwrap_or(0);
        TodoId(max + 1)
    }
}

/// Items matching `first` in their original order, followed by the rest.
pub(crate) fn stable_partition<T>(items: &[T], first: impl Fn(&T) -> bool) -> Vec<&T> {
    let (mut head, tail): (Vec<&T>, Vec<&T>) = items.iter().partition(|item| first(item));
    head.extend(tail);
    head
}
