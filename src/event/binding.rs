//! Key binding registry for slider navigation.
//!
//! [`NavigationBindings`] maps key+modifier combinations to [`NavigationAction`]s.
//! The `with_defaults()` constructor installs arrow, Home/End and vi-style keys.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};
use crate::geometry::Axis;
use crate::slider::navigation::NavigationAction;

// ---------------------------------------------------------------------------
// NavigationBindings
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> NavigationAction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationBindings {
    bindings: HashMap<(Key, Modifiers), NavigationAction>,
}

impl NavigationBindings {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a registry with the default horizontal bindings.
    ///
    /// Defaults:
    /// - `Left` / `h` -> Previous
    /// - `Right` / `l` -> Next
    /// - `Home` -> First
    /// - `End` -> Last
    pub fn with_defaults() -> Self {
        Self::for_axis(Axis::Horizontal)
    }

    /// Default bindings for slides laid out along `axis`.
    ///
    /// Vertical sliders use `Up`/`k` and `Down`/`j` instead of the
    /// horizontal keys.
    pub fn for_axis(axis: Axis) -> Self {
        let (back, forward, back_char, forward_char) = match axis {
            Axis::Horizontal => (Key::Left, Key::Right, 'h', 'l'),
            Axis::Vertical => (Key::Up, Key::Down, 'k', 'j'),
        };
        let mut registry = Self::new();
        registry.bind(back, Modifiers::NONE, NavigationAction::Previous);
        registry.bind(forward, Modifiers::NONE, NavigationAction::Next);
        registry.bind(Key::Char(back_char), Modifiers::NONE, NavigationAction::Previous);
        registry.bind(Key::Char(forward_char), Modifiers::NONE, NavigationAction::Next);
        registry.bind(Key::Home, Modifiers::NONE, NavigationAction::First);
        registry.bind(Key::End, Modifiers::NONE, NavigationAction::Last);
        registry
    }

    /// Register a key binding.
    ///
    /// If a binding already exists for this key+modifier combination, it is replaced.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: NavigationAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a key binding.
    ///
    /// Returns the removed action, if any.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<NavigationAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Look up the action for a given key event (exact key + modifiers match).
    pub fn resolve(&self, event: &KeyEvent) -> Option<NavigationAction> {
        self.bindings.get(&(event.code, event.modifiers)).copied()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the registry has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for NavigationBindings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let reg = NavigationBindings::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn defaults_cover_arrows_and_ends() {
        let reg = NavigationBindings::with_defaults();
        assert_eq!(reg.len(), 6);
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Left)), Some(NavigationAction::Previous));
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Right)), Some(NavigationAction::Next));
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Home)), Some(NavigationAction::First));
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::End)), Some(NavigationAction::Last));
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Char('l'))), Some(NavigationAction::Next));
    }

    #[test]
    fn vertical_defaults_use_up_down() {
        let reg = NavigationBindings::for_axis(Axis::Vertical);
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Down)), Some(NavigationAction::Next));
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Char('k'))), Some(NavigationAction::Previous));
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Left)), None);
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let reg = NavigationBindings::with_defaults();
        let ev = KeyEvent::new(Key::Right, Modifiers::SHIFT);
        assert_eq!(reg.resolve(&ev), None);
    }

    #[test]
    fn bind_replaces_existing() {
        let mut reg = NavigationBindings::with_defaults();
        reg.bind(Key::Right, Modifiers::NONE, NavigationAction::Last);
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Right)), Some(NavigationAction::Last));
        assert_eq!(reg.len(), 6);
    }

    #[test]
    fn unbind_returns_removed_action() {
        let mut reg = NavigationBindings::with_defaults();
        assert_eq!(reg.unbind(Key::Home, Modifiers::NONE), Some(NavigationAction::First));
        assert_eq!(reg.unbind(Key::Home, Modifiers::NONE), None);
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Home)), None);
    }

    #[test]
    fn ctrl_binding_is_distinct() {
        let mut reg = NavigationBindings::new();
        reg.bind(Key::Char('n'), Modifiers::CTRL, NavigationAction::Next);
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Char('n'))), None);
        assert_eq!(
            reg.resolve(&KeyEvent::new(Key::Char('n'), Modifiers::CTRL)),
            Some(NavigationAction::Next)
        );
    }
}
