//! Error types for session operations.

use thiserror::Error;

use crate::format::FormatError;

/// The operator's input is incomplete or malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The open name has no characters to commit
    #[error("name empty")]
    NameEmpty,

    /// A marker was committed without a name
    #[error("name not set")]
    NameNotSet,

    /// A marker was committed before a color was sampled
    #[error("color not set")]
    ColorNotSet,

    /// The background step was confirmed before a color was sampled
    #[error("background color not set")]
    BackgroundNotSet,

    /// The name is the reserved background label
    #[error("name {0:?} is reserved")]
    ReservedName(String),

    /// The character is not allowed in marker names
    #[error("invalid character {0:?} in marker name")]
    InvalidCharacter(char),
}

/// Errors that can occur during a session step.
///
/// These never escape the session: they end up in the status line.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Input validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Writing the configuration failed
    #[error("Save failed: {0}")]
    Save(#[from] FormatError),
}
