//! Keyboard bindings.

use serde::{Deserialize, Serialize};

/// Discrete user intents understood by the session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Input {
    Next,
    Prev,
    /// Play or stop.
    Play,
    /// Toggle a timed recording.
    Record,
    /// Toggle an untimed live recording.
    Live,
}

impl Input {
    pub const ALL: [Input; 5] = [
        Input::Next,
        Input::Prev,
        Input::Play,
        Input::Record,
        Input::Live,
    ];
}

/// What a key press asks for.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyAction {
    Input(Input),
    /// Show or hide the sketch overlay.
    ToggleSketch,
}

/// Whatever currently holds keyboard focus.
pub trait InputTarget {
    /// Whether typing goes to this target, in which case navigation keys
    /// must not be intercepted.
    fn accepts_text(&self) -> bool;
}

/// Focus of a player with a single search box.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Focus {
    #[default]
    Document,
    SearchInput,
}

impl InputTarget for Focus {
    fn accepts_text(&self) -> bool {
        matches!(self, Focus::SearchInput)
    }
}

/// Map a key name (as reported by the input layer) to an action.
///
/// # Example
///
/// ```rust
/// use slidecast::dispatch::{map_key, Focus, Input, KeyAction};
///
/// assert_eq!(map_key("ArrowRight", &Focus::Document), Some(KeyAction::Input(Input::Next)));
/// assert_eq!(map_key("ArrowRight", &Focus::SearchInput), None);
/// ```
pub fn map_key(key: &str, target: &impl InputTarget) -> Option<KeyAction> {
    if target.accepts_text() {
        return None;
    }
    let action = match key {
        "ArrowRight" | "ArrowDown" => KeyAction::Input(Input::Next),
        "ArrowLeft" | "ArrowUp" => KeyAction::Input(Input::Prev),
        " " => KeyAction::Input(Input::Play),
        "r" => KeyAction::Input(Input::Record),
        "l" => KeyAction::Input(Input::Live),
        "d" => KeyAction::ToggleSketch,
        _ => return None,
    };
    Some(action)
}
