//! Per-client session state and the operations that mutate it.
//!
//! # Design
//! `Session` is a plain value. The HTTP layer calls exactly one operation on
//! it per request, then renders or redirects. Nothing here touches I/O or global state, so each operation is fully
//! determined by the session it is given and its arguments.
//!
//! Every operation trims its name input with `trim_name` before validating.
//! Validation failures are written to the error slot before being returned;
//! lookup failures are only returned, since the caller answers them with a
//! 404 rather than a page that could display the message.

use crate::error::{Missing, TodoError};
use crate::feedback::{self, Feedback, Flash};
use crate::types::{stable_partition, List, ListId, Todo, TodoId};
use crate::validate::{trim_name, validate_list_name, validate_todo_name};

/// How `Session::list_all` orders lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Creation order.
    Stored,
    /// Incomplete and empty lists first, fully completed lists last. Order
    /// within each group is preserved.
    #[default]
    CompletedLast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    lists: Vec<List>,
    next_list_id: u64,
    feedback: Feedback,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            lists: Vec::new(),
            next_list_id: 1,
            feedback: Feedback::default(),
        }
    }

    /// Lists in creation order.
    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn list_all(&self, order: ListOrder) -> Vec<&List> {
        match order {
            ListOrder::Stored => self.lists.iter().collect(),
            ListOrder::CompletedLast => stable_partition(&self.lists, |list| !list.is_complete()),
        }
    }

    pub fn find_list(&self, id: ListId) -> Result<&List, TodoError> {
        self.lists
            .iter()
            .find(|list| list.id == id)
            .ok_or(TodoError::NotFound(Missing::List(id)))
    }

    #[cfg(test)]
    pub(crate) fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Consume the pending error and success messages for a render.
    pub fn take_feedback(&mut self) -> Flash {
        self.feedback.take()
    }

    pub fn create_list(&mut self, name: &str) -> Result<ListId, TodoError> {
        let name = trim_name(name);
        if let Err(error) = validate_list_name(name, &self.lists) {
            return self.reject(error);
        }

        let id = ListId(self.next_list_id);
        self.next_list_id += 1;
        self.lists.push(List::new(id, name.to_string()));
        self.feedback.set_success(feedback::LIST_CREATED);
        Ok(id)
    }

    /// Rename a list. The new name must not match any list's current name,
    /// including the list being renamed.
    pub fn rename_list(&mut self, id: ListId, name: &str) -> Result<(), TodoError> {
        let index = self.list_index(id)?;
        let name = trim_name(name);
        if let Err(error) = validate_list_name(name, &self.lists) {
            return self.reject(error);
        }

        self.lists[index].name = name.to_string();
        self.feedback.set_success(feedback::LIST_UPDATED);
        Ok(())
    }

    pub fn delete_list(&mut self, id: ListId) -> Result<List, TodoError> {
        let index = self.list_index(id)?;
        let removed = self.lists.remove(index);
        self.feedback.set_success(feedback::LIST_DELETED);
        Ok(removed)
    }

    pub fn add_todo(&mut self, list_id: ListId, text: &str) -> Result<TodoId, TodoError> {
        let index = self.list_index(list_id)?;
        let text = trim_name(text);
        if let Err(error) = validate_todo_name(text) {
            return self.reject(error);
        }

        let list = &mut self.lists[index];
        let id = list.next_todo_id();
        list.todos.push(Todo {
            id,
            name: text.to_string(),
            completed: false,
        });
        self.feedback.set_success(feedback::TODO_ADDED);
        Ok(id)
    }

    pub fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> Result<Todo, TodoError> {
        let list = self.list_mut(list_id)?;
        let position = list
            .todos
            .iter()
            .position(|todo| todo.id == todo_id)
            .ok_or(TodoError::NotFound(Missing::Todo {
                list: list_id,
                todo: todo_id,
            }))?;
        let removed = list.todos.remove(position);
        self.feedback.set_success(feedback::TODO_DELETED);
        Ok(removed)
    }

    /// Flip a todo's completion flag and return the new value.
    pub fn toggle_todo(&mut self, list_id: ListId, todo_id: TodoId) -> Result<bool, TodoError> {
        let todo = self
            .list_mut(list_id)?
            .todo_mut(todo_id)
            .ok_or(TodoError::NotFound(Missing::Todo {
                list: list_id,
                todo: todo_id,
            }))?;
        todo.completed = !todo.completed;
        let completed = todo.completed;
        self.feedback.set_success(feedback::TODO_UPDATED);
        Ok(completed)
    }

    pub fn complete_all(&mut self, list_id: ListId) -> Result<(), TodoError> {
        let list = self.list_mut(list_id)?;
        for todo in &mut list.todos {
            todo.completed = true;
        }
        self.feedback.set_success(feedback::TODOS_COMPLETED);
        Ok(())
    }

    fn list_index(&self, id: ListId) -> Result<usize, TodoError> {
        self.lists
            .iter()
            .position(|list| list.id == id)
            .ok_or(TodoError::NotFound(Missing::List(id)))
    }

    fn list_mut(&mut self, id: ListId) -> Result<&mut List, TodoError> {
        self.lists
            .iter_mut()
            .find(|list| list.id == id)
            .ok_or(TodoError::NotFound(Missing::List(id)))
    }

    fn reject<T>(&mut self, error: TodoError) -> Result<T, TodoError> {
        if !error.is_not_found() {
            self.feedback.set_error(error.to_string());
        }
        Err(error)
    }
}
