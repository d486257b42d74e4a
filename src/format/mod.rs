//! Marker configuration file support.
//!
//! The configuration written at the end of a session is a small `;`-delimited
//! text file that the tracker reads back. This module provides the writer used
//! by the session and a reader for consumers and tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use roundpen_config::format::{ConfigWriter, MarkerFile};
//!
//! ConfigWriter.write(path, background.as_ref(), &markers)?;
//! let file = MarkerFile::read(path)?;
//! ```

mod error;
mod markers_csv;

pub use error::FormatError;
pub use markers_csv::{ConfigWriter, MarkerFile, MarkerRecord};

#[cfg(test)]
mod tests;
