//! Name validation for lists and todos.
//!
//! Lengths are counted in characters, not bytes, so a 100-character name in
//! a non-ASCII script is still accepted. Callers trim with `trim_name`
//! before validating.

use crate::error::{NameKind, TodoError};
use crate::types::List;

pub const NAME_MIN_CHARS: usize = 1;
pub const NAME_MAX_CHARS: usize = 100;

/// Strip leading and trailing ASCII whitespace and NUL. Other Unicode
/// spaces, such as U+00A0, are kept and count towards the length.
pub fn trim_name(name: &str) -> &str {
    name.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0')
}

fn check_length(name: &str, kind: NameKind) -> Result<(), TodoError> {
    let chars = name.chars().count();
    if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars) {
        Ok(())
    } else {
        Err(TodoError::InvalidLength(kind))
    }
}

/// Check a list name against the length bounds and the names already in use.
///
/// Length is checked first, so an empty name reports `InvalidLength` even if
/// some list somehow carries an empty name.
pub fn validate_list_name(name: &str, existing: &[List]) -> Result<(), TodoError> {
    check_length(name, NameKind::List)?;
    if existing.iter().any(|list| list.name == name) {
        return Err(TodoError::DuplicateName);
    }
    Ok(())
}

pub fn validate_todo_name(name: &str) -> Result<(), TodoError> {
    check_length(name, NameKind::Todo)
}
