//! Event handlers for the configurator.
//!
//! Raw input events are routed to the session here, keeping the main loop a
//! plain read-dispatch-present cycle.

use crate::keybindings::KeyBindings;
use crate::message::{Command, InputEvent};
use crate::state::{MarkerSession, SaveOutcome};

/// Handle one raw input event.
///
/// Returns true if the event changed the session.
pub fn handle_event(session: &mut MarkerSession, bindings: &KeyBindings, event: InputEvent) -> bool {
    if session.is_terminated() {
        log::trace!("Session over, dropping {:?}", event);
        return false;
    }

    match event {
        InputEvent::Pointer { state, position } => session.on_pointer(state, position),
        InputEvent::Key(key) => match bindings.command_for(session.mode(), key) {
            Some(command) => handle_command(session, command),
            None => {
                log::trace!("No binding for {} in {}", key, session.mode().name());
                false
            }
        },
    }
}

/// Handle a session command.
///
/// Returns true if the command changed the session.
pub fn handle_command(session: &mut MarkerSession, command: Command) -> bool {
    match command {
        Command::Confirm => session.on_confirm(),
        Command::CommitMarker => session.on_commit_marker(),
        Command::Backspace => session.on_backspace(),
        Command::TypeChar(c) => session.on_type_char(c),
        Command::Save => match session.on_save_request() {
            SaveOutcome::Saved { markers } => {
                log::info!("💾 Saved {} markers", markers);
                true
            }
            SaveOutcome::Failed => true,
            SaveOutcome::NothingToSave | SaveOutcome::NotAvailable => false,
        },
        Command::Cancel => {
            log::debug!("🛑 Cancel requested");
            session.cancel();
            true
        }
    }
}
