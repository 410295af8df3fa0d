//! Session-scoped todo lists.
//!
//! # Overview
//! The domain half of the todo application: lists of todos held in a
//! per-client `Session`, the validation rules for their names, and the
//! single-use feedback messages shown after each change. The crate performs
//! no I/O; the server crate owns cookies, storage and HTML.
//!
//! # Design
//! - `Session` is an explicit value handed to each operation. There is no
//!   process-wide state.
//! - Lists and todos are looked up by id. List ids come from a per-session
//!   counter so they stay valid when other lists are deleted.
//! - Operations return `Result<_, TodoError>` and also record validation
//!   failures in the session's error slot for the next render.

pub mod error;
pub mod feedback;
pub mod session;
pub mod types;
pub mod validate;

pub use error::{Missing, NameKind, TodoError};
pub use feedback::{Feedback, Flash};
pub use session::{ListOrder, Session};
pub use types::{List, ListId, Todo, TodoId};
pub use validate::{
    trim_name, validate_list_name, validate_todo_name, NAME_MAX_CHARS, NAME_MIN_CHARS,
};
