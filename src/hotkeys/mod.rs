//! Hotkey system
//!
//! Centralized hotkey management for the editor.
//!
//! # Architecture
//!
//! - **HotkeyAction**: Enum of all possible actions that can be triggered by hotkeys
//! - **HotkeyContext**: Determines which hotkeys are active based on app state
//! - **handle_hotkey()**: Main dispatch function that maps key events to actions
//!
//! # Adding New Hotkeys
//!
//! 1. Add a variant to `HotkeyAction`
//! 2. Add the key binding in `handle_hotkey()`
//! 3. Handle the action in the App component's hotkey handler

use dioxus::prelude::Key;

/// All possible actions that can be triggered by hotkeys.
///
/// Each variant represents a semantic action, not a key binding.
/// This decouples "what key was pressed" from "what should happen".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    /// Save the current project.
    SaveProject,
    /// Toggle playback (enters the countdown from idle).
    PlayPause,
    /// Cancel a running countdown / close the player.
    Escape,
    /// Delete the selected segments.
    DeleteSelection,
    /// Duplicate the primary selected segment.
    DuplicateSegment,
    /// Copy the selected segments to the clipboard.
    Copy,
    /// Paste clipboard segments onto the current page.
    Paste,
    /// Undo the last mutation.
    Undo,
    /// Redo the last undone mutation.
    Redo,
    /// Toggle the draw tool.
    ToggleDrawTool,
    /// Skip to the previous segment while playing.
    PrevSegment,
    /// Skip to the next segment while playing.
    NextSegment,
}

/// Context information that affects which hotkeys are active.
#[derive(Debug, Clone, Default)]
pub struct HotkeyContext {
    /// Whether any segments are selected
    pub has_selection: bool,
    /// Whether an input field has focus (should suppress most hotkeys)
    pub input_focused: bool,
    /// Whether the fullscreen player is open
    pub player_open: bool,
}

/// Result of processing a key event.
#[derive(Debug, Clone)]
pub enum HotkeyResult {
    /// A hotkey action was matched and should be executed
    Action(HotkeyAction),
    /// No matching hotkey for this key/context combination
    NoMatch,
    /// Hotkey would match but is suppressed (e.g., input field focused)
    Suppressed,
}

/// Maps a key event to an action, considering the current context.
pub fn handle_hotkey(
    key: &Key,
    shift: bool,
    ctrl: bool,
    _alt: bool,
    meta: bool,
    context: &HotkeyContext,
) -> HotkeyResult {
    // Suppress hotkeys when typing in an input field
    if context.input_focused {
        return HotkeyResult::Suppressed;
    }
    let command = ctrl || meta;

    match key {
        Key::Character(c) if command && (c == "s" || c == "S") => {
            return HotkeyResult::Action(HotkeyAction::SaveProject);
        }
        Key::Character(c) if command && shift && (c == "z" || c == "Z") => {
            return HotkeyResult::Action(HotkeyAction::Redo);
        }
        Key::Character(c) if command && (c == "z" || c == "Z") => {
            return HotkeyResult::Action(HotkeyAction::Undo);
        }
        Key::Character(c) if command && (c == "y" || c == "Y") => {
            return HotkeyResult::Action(HotkeyAction::Redo);
        }
        Key::Character(c) if command && (c == "c" || c == "C") => {
            return HotkeyResult::Action(HotkeyAction::Copy);
        }
        Key::Character(c) if command && (c == "v" || c == "V") => {
            return HotkeyResult::Action(HotkeyAction::Paste);
        }
        Key::Character(c) if command && (c == "d" || c == "D") => {
            if context.has_selection {
                return HotkeyResult::Action(HotkeyAction::DuplicateSegment);
            }
            return HotkeyResult::NoMatch;
        }
        Key::Character(c) if c == " " => return HotkeyResult::Action(HotkeyAction::PlayPause),
        Key::Character(c) if !command && (c == "d" || c == "D") => {
            return HotkeyResult::Action(HotkeyAction::ToggleDrawTool);
        }
        Key::Escape => return HotkeyResult::Action(HotkeyAction::Escape),
        Key::Delete | Key::Backspace => {
            if context.has_selection {
                return HotkeyResult::Action(HotkeyAction::DeleteSelection);
            }
            return HotkeyResult::NoMatch;
        }
        Key::ArrowLeft if context.player_open => {
            return HotkeyResult::Action(HotkeyAction::PrevSegment);
        }
        Key::ArrowRight if context.player_open => {
            return HotkeyResult::Action(HotkeyAction::NextSegment);
        }
        _ => {}
    }

    HotkeyResult::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_toggles_playback() {
        let ctx = HotkeyContext::default();
        let result = handle_hotkey(&Key::Character(" ".to_string()), false, false, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::PlayPause)));
    }

    #[test]
    fn test_ctrl_s_saves_project() {
        let ctx = HotkeyContext::default();
        let result = handle_hotkey(&Key::Character("s".to_string()), false, true, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::SaveProject)));
    }

    #[test]
    fn test_ctrl_shift_z_redoes() {
        let ctx = HotkeyContext::default();
        let result = handle_hotkey(&Key::Character("Z".to_string()), true, true, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::Redo)));
    }

    #[test]
    fn test_delete_requires_selection() {
        let ctx = HotkeyContext::default();
        let result = handle_hotkey(&Key::Delete, false, false, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::NoMatch));

        let ctx = HotkeyContext {
            has_selection: true,
            ..Default::default()
        };
        let result = handle_hotkey(&Key::Delete, false, false, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::DeleteSelection)));
    }

    #[test]
    fn test_suppressed_when_input_focused() {
        let ctx = HotkeyContext {
            input_focused: true,
            ..Default::default()
        };
        let result = handle_hotkey(&Key::Character(" ".to_string()), false, false, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::Suppressed));
    }

    #[test]
    fn test_arrow_skip_only_in_player() {
        let ctx = HotkeyContext::default();
        let result = handle_hotkey(&Key::ArrowRight, false, false, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::NoMatch));

        let ctx = HotkeyContext {
            player_open: true,
            ..Default::default()
        };
        let result = handle_hotkey(&Key::ArrowRight, false, false, false, false, &ctx);
        assert!(matches!(result, HotkeyResult::Action(HotkeyAction::NextSegment)));
    }
}
