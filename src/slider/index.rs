//! Active-index ownership.
//!
//! An [`IndexController`] holds one optional active index. Who owns it is
//! resolved on every [`sync`](IndexController::sync) into an explicit
//! [`OwnershipMode`]:
//!
//! - `External`: the caller supplied both an index and a change callback. The
//!   rendered index is always the supplied value, bounded to the item count;
//!   the setter only forwards the normalized request to the callback.
//! - `Internal`: the controller owns the value. The setter applies the
//!   normalized request, then notifies the callback if there is one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::reactive::{create_memo, create_signal, batch, ReadSignal, Scope, WriteSignal};

use super::config::IndexCallback;
use super::navigation::{IndexChange, NavigationTrigger};

/// Who owns the active index, resolved once per update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipMode {
    /// The caller owns the value; `value` is what it last supplied.
    External { value: Option<usize> },
    Internal,
}

impl OwnershipMode {
    /// `External` only when a value and a callback are both present.
    pub fn resolve(supplied: Option<usize>, has_callback: bool) -> Self {
        match supplied {
            Some(value) if has_callback => OwnershipMode::External { value: Some(value) },
            _ => OwnershipMode::Internal,
        }
    }
}

/// Normalize a requested index against `count`.
///
/// `None` (clear) is always accepted. Integers are clamped into
/// `0..=count-1`; with no items they are rejected, which is the outer `None`.
pub fn normalize(requested: Option<isize>, count: usize) -> Option<Option<usize>> {
    match requested {
        None => Some(None),
        Some(_) if count == 0 => None,
        Some(v) => Some(Some(v.clamp(0, count as isize - 1) as usize)),
    }
}

/// A position as a signed request, saturating at `isize::MAX`.
pub fn request(position: usize) -> isize {
    isize::try_from(position).unwrap_or(isize::MAX)
}

struct Inner {
    label: &'static str,
    state: (ReadSignal<Option<usize>>, WriteSignal<Option<usize>>),
    count: (ReadSignal<usize>, WriteSignal<usize>),
    mode: (ReadSignal<OwnershipMode>, WriteSignal<OwnershipMode>),
    trigger: (ReadSignal<Option<NavigationTrigger>>, WriteSignal<Option<NavigationTrigger>>),
    rendered: ReadSignal<Option<usize>>,
    last_supplied: Cell<Option<usize>>,
    on_change: RefCell<Option<IndexCallback>>,
    // Last field: disposes the signals above after everything else drops.
    _scope: Scope,
}

/// Mediates one active index. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct IndexController {
    inner: Rc<Inner>,
}

impl IndexController {
    /// Create a controller for `count` items.
    ///
    /// `initial` seeds internal state when nothing is supplied.
    pub fn new(
        label: &'static str,
        count: usize,
        initial: Option<usize>,
        supplied: Option<usize>,
        on_change: Option<IndexCallback>,
    ) -> Self {
        let scope = Scope::new();
        let seed = supplied
            .or(initial)
            .and_then(|v| normalize(Some(request(v)), count).flatten());
        let mode = OwnershipMode::resolve(supplied, on_change.is_some());

        let (state, count_signal, mode_signal, trigger, rendered) = scope.run(|| {
            let state = create_signal(seed);
            let count_signal = create_signal(count);
            let mode_signal = create_signal(mode);
            let trigger = create_signal(None);
            let (state_r, count_r, mode_r) = (state.0, count_signal.0, mode_signal.0);
            let rendered = create_memo(move || {
                let value = match mode_r.get() {
                    OwnershipMode::External { value } => value,
                    OwnershipMode::Internal => state_r.get(),
                };
                let count = count_r.get();
                value.filter(|_| count > 0).map(|v| v.min(count - 1))
            });
            (state, count_signal, mode_signal, trigger, rendered)
        });

        Self {
            inner: Rc::new(Inner {
                label,
                state,
                count: count_signal,
                mode: mode_signal,
                trigger,
                rendered,
                last_supplied: Cell::new(supplied),
                on_change: RefCell::new(on_change),
                _scope: scope,
            }),
        }
    }

    /// Re-resolve ownership for this update.
    ///
    /// A supplied value that differs from the previous sync is adopted into
    /// internal state, so dropping the callback later keeps the last value.
    pub fn sync(&self, count: usize, supplied: Option<usize>, on_change: Option<IndexCallback>) {
        let inner = &self.inner;
        let mode = OwnershipMode::resolve(supplied, on_change.is_some());
        *inner.on_change.borrow_mut() = on_change;
        let adopt = inner.last_supplied.replace(supplied) != supplied;
        batch(|| {
            inner.count.1.set_if_changed(count);
            inner.mode.1.set_if_changed(mode);
            if adopt {
                let value = supplied.and_then(|v| normalize(Some(request(v)), count).flatten());
                inner.state.1.set_if_changed(value);
            }
        });
        tracing::trace!(
            target: "gilt_slider::index",
            controller = inner.label,
            count,
            ?mode,
            "sync"
        );
    }

    /// The rendered index. Tracked when read inside an effect.
    pub fn index(&self) -> Option<usize> {
        self.inner.rendered.get()
    }

    /// The rendered index as a signal, for reactive consumers.
    pub fn signal(&self) -> ReadSignal<Option<usize>> {
        self.inner.rendered
    }

    pub fn mode(&self) -> OwnershipMode {
        self.inner.mode.0.get_untracked()
    }

    pub fn count(&self) -> usize {
        self.inner.count.0.get_untracked()
    }

    /// Internal fallback state (diagnostics and tests).
    pub fn internal_state(&self) -> Option<usize> {
        self.inner.state.0.get_untracked()
    }

    /// Trigger of the most recent accepted request.
    pub fn last_trigger(&self) -> Option<NavigationTrigger> {
        self.inner.trigger.0.get_untracked()
    }

    /// Request a new index. Returns whether the request was accepted.
    ///
    /// Rejected requests change nothing and call nothing.
    pub fn set(&self, requested: Option<isize>, trigger: NavigationTrigger) -> bool {
        let inner = &self.inner;
        let count = self.count();
        let Some(index) = normalize(requested, count) else {
            tracing::debug!(
                target: "gilt_slider::index",
                controller = inner.label,
                ?requested,
                count,
                "rejected index request"
            );
            return false;
        };

        let mode = self.mode();
        if mode == OwnershipMode::Internal {
            inner.state.1.set_if_changed(index);
        }
        inner.trigger.1.set(Some(trigger));
        tracing::trace!(
            target: "gilt_slider::index",
            controller = inner.label,
            ?index,
            ?trigger,
            ?mode,
            "index request"
        );

        // Cloned out so the callback may re-enter `sync`.
        let callback = inner.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback(IndexChange { index, trigger });
        }
        true
    }

    /// Request a specific position.
    pub fn set_index(&self, index: usize, trigger: NavigationTrigger) -> bool {
        self.set(Some(request(index)), trigger)
    }

    /// Request no selection.
    pub fn clear(&self, trigger: NavigationTrigger) -> bool {
        self.set(None, trigger)
    }
}

impl fmt::Debug for IndexController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexController")
            .field("label", &self.inner.label)
            .field("index", &self.inner.rendered.try_get())
            .field("count", &self.inner.count.0.try_get())
            .field("mode", &self.inner.mode.0.try_get())
            .finish()
    }
}
