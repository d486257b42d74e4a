//! Incremental text entry for marker names.
//!
//! Names are typed one character at a time. All committed names are kept in a
//! single comma-joined buffer (the way the panel shows them); the name being
//! typed is a separate string so backspace can never reach into a committed one.

use crate::constants::NAME_DELIMITER;
use crate::model::is_name_char;
use crate::state::error::ValidationError;

/// Append-only ledger of marker names plus the currently open name.
#[derive(Debug, Clone, Default)]
pub struct NameLedger {
    /// Committed names, each followed by the delimiter
    committed: String,
    /// Number of committed names
    committed_count: usize,
    /// Name being typed; never contains the delimiter
    open: String,
}

impl NameLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a character to the open name.
    ///
    /// Only ASCII letters, digits, space, `_` and `-` are accepted.
    pub fn append_char(&mut self, c: char) -> Result<(), ValidationError> {
        if !is_name_char(c) {
            return Err(ValidationError::InvalidCharacter(c));
        }
        self.open.push(c);
        Ok(())
    }

    /// Remove the last character of the open name.
    ///
    /// Returns false (and does nothing) when the open name is already empty.
    pub fn backspace(&mut self) -> bool {
        self.open.pop().is_some()
    }

    /// Freeze the open name and start a new empty one.
    pub fn commit_open_name(&mut self) -> Result<String, ValidationError> {
        if self.open.is_empty() {
            return Err(ValidationError::NameEmpty);
        }

        let name = std::mem::take(&mut self.open);
        self.committed.push_str(&name);
        self.committed.push(NAME_DELIMITER);
        self.committed_count += 1;
        Ok(name)
    }

    /// The name currently being typed.
    pub fn open_name(&self) -> &str {
        &self.open
    }

    /// Number of committed names.
    pub fn committed_count(&self) -> usize {
        self.committed_count
    }

    /// Committed names in commit order.
    pub fn committed_names(&self) -> impl Iterator<Item = &str> {
        self.committed
            .split(NAME_DELIMITER)
            .take(self.committed_count)
    }

    /// The full buffer: committed names joined by the delimiter, then the open name.
    pub fn display_buffer(&self) -> String {
        format!("{}{}", self.committed, self.open)
    }
}
