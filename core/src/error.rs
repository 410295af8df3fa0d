//! Error types for list and todo operations.
//!
//! # Design
//! Validation failures (`InvalidLength`, `DuplicateName`) are recoverable and
//! end up in the session's error slot. `NotFound` means an id in the request
//! no longer resolves, typically a stale page or a hand-edited URL; the HTTP
//! layer turns it into a 404.

use std::fmt;

use thiserror::Error;

use crate::types::{ListId, TodoId};

/// Errors returned by `Session` operations. The `Display` text is the
/// user-facing message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// The trimmed name is empty or longer than the allowed maximum.
    #[error("{0} must be between 1 and 100 characters")]
    InvalidLength(NameKind),

    /// Another list in the session already has this exact name.
    #[error("List name must be unique")]
    DuplicateName,

    /// A list or todo id did not resolve.
    #[error("The specified {0} was not found.")]
    NotFound(Missing),
}

impl TodoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }
}

/// Which kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    List,
    Todo,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::List => write!(f, "List name"),
            NameKind::Todo => write!(f, "Todo"),
        }
    }
}

/// What a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    List(ListId),
    Todo { list: ListId, todo: TodoId },
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::List(_) => write!(f, "list"),
            Missing::Todo { .. } => write!(f, "todo"),
        }
    }
}
