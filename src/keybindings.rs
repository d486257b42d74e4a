//! Customizable keybindings for the configurator.
//!
//! Bindings map key presses to session commands depending on the current mode.
//! Printable keys without a binding are typed into the marker name.

use crate::message::{Command, Key, KeyPress};
use crate::state::SessionMode;

/// Keybinding configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Keys that confirm the region or background step
    pub confirm: Vec<KeyPress>,
    /// Key that commits the open marker
    pub commit: KeyPress,
    /// Key that ends the session
    pub cancel: KeyPress,
    /// Key that deletes the last typed character
    pub backspace: KeyPress,
    /// Key that writes the configuration
    pub save: KeyPress,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            confirm: vec![KeyPress::plain(Key::Enter), KeyPress::plain(Key::Char(' '))],
            commit: KeyPress::plain(Key::Enter),
            cancel: KeyPress::plain(Key::Escape),
            backspace: KeyPress::plain(Key::Backspace),
            save: KeyPress::ctrl('s'),
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the command a key press triggers in `mode`, if any.
    pub fn command_for(&self, mode: SessionMode, key: KeyPress) -> Option<Command> {
        if mode == SessionMode::Terminated {
            return None;
        }
        if key == self.cancel {
            return Some(Command::Cancel);
        }

        match mode {
            SessionMode::SelectingRegion | SessionMode::SelectingBackground => {
                self.confirm.contains(&key).then_some(Command::Confirm)
            }
            SessionMode::DefiningMarkers => {
                if key == self.save {
                    Some(Command::Save)
                } else if key == self.commit {
                    Some(Command::CommitMarker)
                } else if key == self.backspace {
                    Some(Command::Backspace)
                } else {
                    key.text().map(Command::TypeChar)
                }
            }
            SessionMode::Terminated => None,
        }
    }

    /// Check the bindings for keys that would shadow each other while defining markers.
    ///
    /// Returns a description of every conflict found.
    pub fn conflicts(&self) -> Vec<String> {
        let named = [
            ("commit", self.commit),
            ("cancel", self.cancel),
            ("backspace", self.backspace),
            ("save", self.save),
        ];

        let mut conflicts = Vec::new();
        for (i, (name, key)) in named.iter().enumerate() {
            for (other_name, other_key) in named.iter().skip(i + 1) {
                if key == other_key {
                    conflicts.push(format!("{name} and {other_name} are both bound to {key}"));
                }
            }
            if key.text().is_some() {
                conflicts.push(format!(
                    "{name} is bound to {key}, which is needed for typing names"
                ));
            }
        }
        if self.confirm.contains(&self.cancel) {
            conflicts.push(format!("confirm and cancel are both bound to {}", self.cancel));
        }
        conflicts
    }

    /// The controls line shown in the panel for `mode`.
    pub fn controls_line(&self, mode: SessionMode) -> String {
        let confirm = join_keys(&self.confirm);
        match mode {
            SessionMode::SelectingRegion => format!(
                "Controls: Drag = Select Region, {} = Next, {} = Exit.",
                confirm, self.cancel
            ),
            SessionMode::SelectingBackground => format!(
                "Controls: Left-Click = Select Color, {} = Next, {} = Exit.",
                confirm, self.cancel
            ),
            SessionMode::DefiningMarkers => format!(
                "Controls: Left-Click = Select Color, Typing = Set Name, {} = Next, {} = Save, {} = Exit.",
                self.commit, self.save, self.cancel
            ),
            SessionMode::Terminated => String::new(),
        }
    }
}

fn join_keys(keys: &[KeyPress]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_have_no_conflicts() {
        assert!(KeyBindings::default().conflicts().is_empty());
    }

    #[test]
    fn test_space_confirms_but_types_in_marker_mode() {
        let bindings = KeyBindings::new();
        let space = KeyPress::plain(Key::Char(' '));
        assert_eq!(
            bindings.command_for(SessionMode::SelectingBackground, space),
            Some(Command::Confirm)
        );
        assert_eq!(
            bindings.command_for(SessionMode::DefiningMarkers, space),
            Some(Command::TypeChar(' '))
        );
    }

    #[test]
    fn test_marker_mode_commands() {
        let bindings = KeyBindings::new();
        let mode = SessionMode::DefiningMarkers;
        assert_eq!(
            bindings.command_for(mode, KeyPress::plain(Key::Enter)),
            Some(Command::CommitMarker)
        );
        assert_eq!(
            bindings.command_for(mode, KeyPress::ctrl('s')),
            Some(Command::Save)
        );
        assert_eq!(
            bindings.command_for(mode, KeyPress::plain(Key::Backspace)),
            Some(Command::Backspace)
        );
        assert_eq!(
            bindings.command_for(mode, KeyPress::plain(Key::Char('s'))),
            Some(Command::TypeChar('s'))
        );
        assert_eq!(bindings.command_for(mode, KeyPress::ctrl('t')), None);
        assert_eq!(bindings.command_for(mode, KeyPress::plain(Key::Tab)), None);
    }

    #[test]
    fn test_cancel_in_every_live_mode() {
        let bindings = KeyBindings::new();
        let esc = KeyPress::plain(Key::Escape);
        for mode in [
            SessionMode::SelectingRegion,
            SessionMode::SelectingBackground,
            SessionMode::DefiningMarkers,
        ] {
            assert_eq!(bindings.command_for(mode, esc), Some(Command::Cancel));
        }
        assert_eq!(bindings.command_for(SessionMode::Terminated, esc), None);
    }

    #[test]
    fn test_region_mode_ignores_typing() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.command_for(
                SessionMode::SelectingRegion,
                KeyPress::plain(Key::Char('a'))
            ),
            None
        );
    }

    #[test]
    fn test_conflict_detection() {
        let bindings = KeyBindings {
            save: KeyPress::plain(Key::Enter),
            ..KeyBindings::default()
        };
        let conflicts = bindings.conflicts();
        assert_eq!(conflicts.len(), 1, "{conflicts:?}");
        assert!(conflicts[0].contains("commit and save"));

        let printable_save = KeyBindings {
            save: KeyPress::plain(Key::Char('s')),
            ..KeyBindings::default()
        };
        assert_eq!(printable_save.conflicts().len(), 1);
    }

    #[test]
    fn test_controls_line_names_save_binding() {
        let line = KeyBindings::new().controls_line(SessionMode::DefiningMarkers);
        assert!(line.contains("Ctrl+S = Save"), "{line}");
        let line = KeyBindings::new().controls_line(SessionMode::SelectingBackground);
        assert!(line.contains("Enter or Space = Next"), "{line}");
    }
}
