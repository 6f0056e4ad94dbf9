//! Ownership scopes for reactive state.
//!
//! A [`Scope`] records every signal, memo and effect created while
//! [`Scope::run`] is on the stack. Dropping the scope disposes them, effects
//! first so nothing re-runs against a half-torn-down graph.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::signal::{dispose_effect, dispose_signal, swap_owner, Owned};

/// Owns a group of reactive slots for the lifetime of a component.
pub struct Scope {
    owned: Rc<RefCell<Owned>>,
}

/// Restores the previous owner when `Scope::run` unwinds.
struct OwnerGuard(Option<Rc<RefCell<Owned>>>);

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        swap_owner(self.0.take());
    }
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self {
            owned: Rc::new(RefCell::new(Owned::default())),
        }
    }

    /// Run `f` with this scope installed as the owner of new slots.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = OwnerGuard(swap_owner(Some(self.owned.clone())));
        f()
    }

    /// Signals (memo outputs included) owned by this scope.
    pub fn signal_count(&self) -> usize {
        self.owned.borrow().signals.len()
    }

    /// Effects (memo effects included) owned by this scope.
    pub fn effect_count(&self) -> usize {
        self.owned.borrow().effects.len()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("signals", &self.signal_count())
            .field("effects", &self.effect_count())
            .finish()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let owned = std::mem::take(&mut *self.owned.borrow_mut());
        for eid in owned.effects {
            dispose_effect(eid);
        }
        for sid in owned.signals {
            dispose_signal(sid);
        }
    }
}
