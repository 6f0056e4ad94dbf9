//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Crossterm events are converted with [`from_crossterm`] so the slider never
//! depends on crossterm directly. Events the slider has no use for (paste,
//! key releases, unmapped keys) convert to `None` instead of a stand-in key.

use std::ops::{BitAnd, BitOr};

use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Drag(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

impl MouseAction {
    /// Whether this is a wheel action on either axis.
    pub fn is_wheel(self) -> bool {
        matches!(
            self,
            MouseAction::ScrollUp
                | MouseAction::ScrollDown
                | MouseAction::ScrollLeft
                | MouseAction::ScrollRight
        )
    }
}

/// A mouse event with action, position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A mouse event without modifiers.
    pub fn new(kind: MouseAction, x: u16, y: u16) -> Self {
        Self { kind, x, y, modifiers: Modifiers::NONE }
    }

    /// The pointer position as an [`Offset`].
    pub fn position(&self) -> Offset {
        Offset::new(i32::from(self.x), i32::from(self.y))
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal (the slider's "window") changed size.
    Resize { width: u16, height: u16 },
    FocusGained,
    FocusLost,
}

// ---------------------------------------------------------------------------
// crossterm conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode;
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(key)
}

fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseBtn {
    match b {
        crossterm::event::MouseButton::Left => MouseBtn::Left,
        crossterm::event::MouseButton::Right => MouseBtn::Right,
        crossterm::event::MouseButton::Middle => MouseBtn::Middle,
    }
}

/// Convert a crossterm key event. Releases and unmapped keys yield `None`.
pub fn key_from_crossterm(ct: crossterm::event::KeyEvent) -> Option<KeyEvent> {
    if ct.kind == crossterm::event::KeyEventKind::Release {
        return None;
    }
    let code = convert_key(ct.code)?;
    Some(KeyEvent::new(code, convert_modifiers(ct.modifiers)))
}

/// Convert a crossterm `Event` into our `InputEvent`.
///
/// Returns `None` for events the slider does not react to.
pub fn from_crossterm(event: crossterm::event::Event) -> Option<InputEvent> {
    use crossterm::event::{Event, MouseEventKind};
    match event {
        Event::Key(ke) => key_from_crossterm(ke).map(InputEvent::Key),
        Event::Mouse(me) => {
            let kind = match me.kind {
                MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
                MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
                MouseEventKind::Drag(b) => MouseAction::Drag(convert_mouse_button(b)),
                MouseEventKind::Moved => MouseAction::Moved,
                MouseEventKind::ScrollUp => MouseAction::ScrollUp,
                MouseEventKind::ScrollDown => MouseAction::ScrollDown,
                MouseEventKind::ScrollLeft => MouseAction::ScrollLeft,
                MouseEventKind::ScrollRight => MouseAction::ScrollRight,
            };
            Some(InputEvent::Mouse(MouseEvent {
                kind,
                x: me.column,
                y: me.row,
                modifiers: convert_modifiers(me.modifiers),
            }))
        }
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::FocusGained => Some(InputEvent::FocusGained),
        Event::FocusLost => Some(InputEvent::FocusLost),
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
