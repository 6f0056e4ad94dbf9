//! Event system: input conversion and navigation key bindings.

pub mod binding;
pub mod input;

pub use binding::NavigationBindings;
pub use input::{
    from_crossterm, key_from_crossterm, InputEvent, Key, KeyEvent, Modifiers, MouseAction,
    MouseBtn, MouseEvent,
};
