//! Single-use feedback messages surfaced on the next rendered page.

pub const LIST_CREATED: &str = "The list has been created";
pub const LIST_UPDATED: &str = "The list has been updated.";
pub const LIST_DELETED: &str = "The list has been deleted.";
pub const TODO_ADDED: &str = "The todo was added.";
pub const TODO_DELETED: &str = "The todo has been deleted.";
pub const TODO_UPDATED: &str = "Todo Updated.";
pub const TODOS_COMPLETED: &str = "Todos Complete!";

/// The error and success slots of a session.
///
/// Writing a slot replaces any unread message. `take` empties both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    error: Option<String>,
    success: Option<String>,
}

/// Messages consumed by one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Feedback {
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.success = Some(message.into());
    }

    #[cfg(test)]
    pub(crate) fn peek_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn peek_success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Read both slots and clear them.
    pub fn take(&mut self) -> Flash {
        Flash {
            error: self.error.take(),
            success: self.success.take(),
        }
    }
}
