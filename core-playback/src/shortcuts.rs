//! # Keyboard Shortcuts
//!
//! A small registry mapping keys to player actions. The registry is owned by
//! the view that mounts it: bindings are added on mount and cleared on
//! unmount, so two mounted players never share bindings.
//!
//! ```
//! use core_playback::shortcuts::{Key, KeyPress, ShortcutAction, ShortcutRegistry};
//!
//! let mut registry = ShortcutRegistry::new();
//! registry.register(Key::Space, ShortcutAction::TogglePlayPause);
//!
//! assert_eq!(
//!     registry.dispatch(&KeyPress::new(Key::from_dom_key(" "))),
//!     Some(ShortcutAction::TogglePlayPause)
//! );
//! ```

use std::collections::HashMap;
use tracing::trace;

/// Keys the player understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    /// Any other key, by its DOM `KeyboardEvent.key` value.
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            " " | "Spacebar" => Key::Space,
            other => Key::Other(other.to_string()),
        }
    }
}

/// A single key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Auto-repeat event from a held key.
    pub repeat: bool,
    /// Ctrl, Alt or Meta was held.
    pub modified: bool,
    /// Focus was in a text input, textarea or content-editable element.
    pub editable_target: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            repeat: false,
            modified: false,
            editable_target: false,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn with_modifier(mut self) -> Self {
        self.modified = true;
        self
    }

    pub fn in_editable(mut self) -> Self {
        self.editable_target = true;
        self
    }

    fn is_dispatchable(&self) -> bool {
        !self.repeat && !self.modified && !self.editable_target
    }
}

/// Actions a shortcut can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    TogglePlayPause,
}

/// View-scoped key binding table.
#[derive(Debug, Default)]
pub struct ShortcutRegistry {
    bindings: HashMap<Key, ShortcutAction>,
}

impl ShortcutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `action`, returning the previous binding.
    pub fn register(&mut self, key: Key, action: ShortcutAction) -> Option<ShortcutAction> {
        trace!(?key, ?action, "Registering shortcut");
        self.bindings.insert(key, action)
    }

    pub fn unregister(&mut self, key: &Key) -> Option<ShortcutAction> {
        self.bindings.remove(key)
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Look up the action for a key press.
    ///
    /// Auto-repeat events, modified keys and presses inside editable elements
    /// never dispatch.
    pub fn dispatch(&self, press: &KeyPress) -> Option<ShortcutAction> {
        if !press.is_dispatchable() {
            return None;
        }
        self.bindings.get(&press.key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space_registry() -> ShortcutRegistry {
        let mut registry = ShortcutRegistry::new();
        registry.register(Key::Space, ShortcutAction::TogglePlayPause);
        registry
    }

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom_key(" "), Key::Space);
        assert_eq!(Key::from_dom_key("Spacebar"), Key::Space);
        assert_eq!(Key::from_dom_key("k"), Key::Other("k".to_string()));
    }

    #[test]
    fn test_space_dispatches_toggle() {
        let registry = space_registry();
        assert_eq!(
            registry.dispatch(&KeyPress::new(Key::Space)),
            Some(ShortcutAction::TogglePlayPause)
        );
    }

    #[test]
    fn test_unbound_key_ignored() {
        let registry = space_registry();
        assert_eq!(registry.dispatch(&KeyPress::new(Key::from_dom_key("j"))), None);
    }

    #[test]
    fn test_filtered_presses() {
        let registry = space_registry();
        assert_eq!(registry.dispatch(&KeyPress::new(Key::Space).repeated()), None);
        assert_eq!(registry.dispatch(&KeyPress::new(Key::Space).with_modifier()), None);
        assert_eq!(registry.dispatch(&KeyPress::new(Key::Space).in_editable()), None);
    }

    #[test]
    fn test_clear_removes_bindings() {
        let mut registry = space_registry();
        assert_eq!(registry.len(), 1);

        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.dispatch(&KeyPress::new(Key::Space)), None);
    }

    #[test]
    fn test_register_replaces_binding() {
        let mut registry = space_registry();
        let previous = registry.register(Key::Space, ShortcutAction::TogglePlayPause);
        assert_eq!(previous, Some(ShortcutAction::TogglePlayPause));
        assert_eq!(registry.unregister(&Key::Space), Some(ShortcutAction::TogglePlayPause));
        assert!(registry.is_empty());
    }
}
