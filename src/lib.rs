//! RoundPen Configurator
//!
//! Interactive setup of the background and marker colors for the RoundPen
//! tracker. An operator optionally crops a still frame to a region of
//! interest, clicks the background color, then clicks and names each marker
//! color. The result is a small `;`-delimited file the tracker reads.
//!
//! The session itself never reads input or draws; frames, events and
//! presentation come in through the `FrameSource`, `InputSource` and
//! `RenderSink` traits.

pub mod color_utils;
pub mod config;
pub mod constants;
pub mod coordinate_mapper;
pub mod data;
pub mod format;
pub mod handlers;
pub mod input;
pub mod keybindings;
pub mod message;
pub mod model;
pub mod state;
pub mod view;

pub use config::AppConfig;
pub use keybindings::KeyBindings;
pub use state::{MarkerSession, SaveOutcome, SessionMode, SessionOptions};
