//! Session state management modules.

mod error;
mod name_ledger;
mod sampler;
mod session;

pub use error::{SessionError, ValidationError};
pub use name_ledger::NameLedger;
pub use sampler::ColorSampler;
pub use session::{MarkerSession, SaveOutcome, SessionMode, SessionOptions, Status};

#[cfg(test)]
mod tests;
