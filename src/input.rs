//! Input event sources.
//!
//! The session consumes a stream of `InputEvent`s. `ScriptedInput` reads them
//! from a small line-based script so sessions can be driven headless:
//!
//! ```text
//! # drag a region, then confirm
//! press 10 10
//! drag 200 120
//! release 200 120
//! key enter
//! click 40 40
//! type Left_Ear
//! key enter
//! key ctrl+s
//! code 27
//! ```

use std::collections::VecDeque;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::message::{InputEvent, Key, KeyPress, PointerState};
use crate::model::Point;

/// Errors that can occur while reading an input script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// A line could not be parsed
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The script could not be read
    #[error("failed to read input script: {0}")]
    Io(#[from] std::io::Error),
}

impl ScriptError {
    fn parse(line: usize, message: impl Into<String>) -> Self {
        ScriptError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// A source of input events.
pub trait InputSource {
    /// Next event, or None when the input is exhausted.
    fn next_event(&mut self) -> Option<InputEvent>;
}

/// Events read from a script, replayed in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    /// Replay a fixed list of events.
    pub fn from_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Parse a script.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut events = VecDeque::new();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            match verb.to_ascii_lowercase().as_str() {
                "press" => events.push_back(pointer(PointerState::Pressed, parse_point(line_no, rest)?)),
                "drag" => events.push_back(pointer(PointerState::Held, parse_point(line_no, rest)?)),
                "release" => {
                    events.push_back(pointer(PointerState::Released, parse_point(line_no, rest)?))
                }
                "click" => {
                    let point = parse_point(line_no, rest)?;
                    events.push_back(pointer(PointerState::Pressed, point));
                    events.push_back(pointer(PointerState::Released, point));
                }
                "key" => {
                    let key: KeyPress = rest
                        .parse()
                        .map_err(|e| ScriptError::parse(line_no, format!("{e}")))?;
                    events.push_back(InputEvent::Key(key));
                }
                "type" => {
                    // Inner spaces are typed too
                    if rest.is_empty() {
                        return Err(ScriptError::parse(line_no, "type needs some text"));
                    }
                    for c in rest.chars() {
                        events.push_back(InputEvent::Key(KeyPress::plain(Key::Char(c))));
                    }
                }
                "code" => {
                    let code: u8 = rest.trim().parse().map_err(|_| {
                        ScriptError::parse(line_no, format!("{:?} is not a key code", rest.trim()))
                    })?;
                    let key = KeyPress::from_ascii(code).ok_or_else(|| {
                        ScriptError::parse(line_no, format!("key code {code} has no key"))
                    })?;
                    events.push_back(InputEvent::Key(key));
                }
                other => {
                    return Err(ScriptError::parse(line_no, format!("unknown command {other:?}")));
                }
            }
        }

        log::debug!("Parsed input script with {} events", events.len());
        Ok(Self { events })
    }

    /// Read and parse a script from a reader (e.g. stdin).
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ScriptError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Read and parse a script file.
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

fn pointer(state: PointerState, position: Point) -> InputEvent {
    InputEvent::Pointer { state, position }
}

fn parse_point(line: usize, args: &str) -> Result<Point, ScriptError> {
    let mut parts = args.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ScriptError::parse(line, "expected two coordinates"));
    };
    let coordinate = |s: &str| {
        s.parse::<i32>()
            .map_err(|_| ScriptError::parse(line, format!("{s:?} is not a coordinate")))
    };
    Ok(Point::new(coordinate(x)?, coordinate(y)?))
}
