use std::collections::HashMap;

/// Keys the presentation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Digit1,
    Digit2,
    Space,
}

/// Action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Prev,
    Next,
    ZoomIn,
    ZoomOut,
}

/// Key to action table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: HashMap<Key, KeyAction>,
}

impl KeyBindings {
    /// Empty table
    pub fn none() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a key, replacing any previous action
    pub fn bind(mut self, key: Key, action: KeyAction) -> Self {
        self.bindings.insert(key, action);
        self
    }

    pub fn action(&self, key: Key) -> Option<KeyAction> {
        self.bindings.get(&key).copied()
    }
}

impl Default for KeyBindings {
    /// Arrows navigate, 1 and 2 zoom
    fn default() -> Self {
        Self::none()
            .bind(Key::ArrowLeft, KeyAction::Prev)
            .bind(Key::ArrowRight, KeyAction::Next)
            .bind(Key::Digit1, KeyAction::ZoomIn)
            .bind(Key::Digit2, KeyAction::ZoomOut)
    }
}
