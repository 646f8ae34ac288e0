//! Shared pieces of the partial-update merge.
//!
//! A partial update only tracks whether a field was sent. Each sent field is
//! judged on its own; an out-of-bounds value is skipped rather than
//! rejected, but an update that changes nothing at all is an error.

use std::ops::RangeInclusive;

use crate::error::AppError;
use crate::validation::char_len_within;

/// Outcome of merging a partial update into an existing record.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub value: T,
    pub changed: bool,
}

impl<T> Merged<T> {
    pub fn unchanged(value: T) -> Self {
        Self { value, changed: false }
    }

    /// Hands back the record to persist, or `NoEffectiveChange`.
    pub fn into_changed(self) -> Result<T, AppError> {
        if self.changed {
            Ok(self.value)
        } else {
            Err(AppError::NoEffectiveChange)
        }
    }
}

/// Applies a sent string field: trimmed, within `bounds` characters and
/// different from `current`. Returns whether it was applied.
pub fn apply_text(current: &mut String, incoming: Option<&str>, bounds: RangeInclusive<usize>) -> bool {
    let Some(incoming) = incoming else {
        return false;
    };
    let incoming = incoming.trim();
    if !char_len_within(incoming, &bounds) || incoming == current.as_str() {
        return false;
    }
    *current = incoming.to_string();
    true
}
