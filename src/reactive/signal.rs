//! Signal<T> and create_signal() for reactive state.
//!
//! Fine-grained reactive primitives: signals store values, effects auto-track
//! reads, and memos cache derived computations. Single-threaded, synchronous,
//! thread-local runtime.
//!
//! Signal and effect slots live in [`SlotMap`]s, so handles are generation
//! checked: a handle to a disposed slot never aliases a newer one. Everything
//! created while a [`Scope`](super::scope::Scope) is running is recorded
//! against it and released when the scope drops.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

// ---------------------------------------------------------------------------
// IDs
// ---------------------------------------------------------------------------

new_key_type! {
    /// Identifies a signal slot inside the runtime.
    pub struct SignalId;
    /// Identifies an effect slot inside the runtime.
    pub struct EffectId;
}

// ---------------------------------------------------------------------------
// Runtime internals
// ---------------------------------------------------------------------------

struct SignalState {
    value: Box<dyn Any>,
    subscribers: HashSet<EffectId>,
}

struct EffectState {
    /// Taken out while the effect runs so no `RefMut` on the runtime is held
    /// across the user callback.
    callback: Option<Box<dyn FnMut()>>,
    dependencies: HashSet<SignalId>,
}

/// Signals and effects created while an owner was installed.
#[derive(Debug, Default)]
pub(crate) struct Owned {
    pub(crate) signals: Vec<SignalId>,
    pub(crate) effects: Vec<EffectId>,
}

pub(crate) struct Runtime {
    signals: SlotMap<SignalId, SignalState>,
    effects: SlotMap<EffectId, EffectState>,
    /// The effect currently executing (for auto-tracking).
    tracking: Option<EffectId>,
    /// When > 0 we are inside a `batch()` call; effects are deferred.
    batch_depth: usize,
    /// Effects that need to be re-run once the outermost batch ends.
    pending_effects: Vec<EffectId>,
    /// Set while the notification loop runs; nested writes queue instead.
    running_effects: bool,
    /// Records new slots for the running scope, if any.
    owner: Option<Rc<RefCell<Owned>>>,
}

impl Runtime {
    fn new() -> Self {
        Self {
            signals: SlotMap::with_key(),
            effects: SlotMap::with_key(),
            tracking: None,
            batch_depth: 0,
            pending_effects: Vec::new(),
            running_effects: false,
            owner: None,
        }
    }
}

thread_local! {
    pub(crate) static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

/// Install `owner` as the current owner and return the previous one.
pub(crate) fn swap_owner(owner: Option<Rc<RefCell<Owned>>>) -> Option<Rc<RefCell<Owned>>> {
    RUNTIME
        .try_with(|rt| std::mem::replace(&mut rt.borrow_mut().owner, owner))
        .unwrap_or(None)
}

/// Number of live signals on this thread.
pub fn live_signal_count() -> usize {
    RUNTIME.with(|rt| rt.borrow().signals.len())
}

/// Number of live effects on this thread.
pub fn live_effect_count() -> usize {
    RUNTIME.with(|rt| rt.borrow().effects.len())
}

// ---------------------------------------------------------------------------
// Signal creation
// ---------------------------------------------------------------------------

/// Create a reactive signal with the given initial value.
///
/// Returns a `(ReadSignal<T>, WriteSignal<T>)` pair. Reading inside an effect
/// automatically subscribes that effect to changes.
pub fn create_signal<T: 'static>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
    let id = RUNTIME.with(|rt| {
        let mut rt = rt.borrow_mut();
        let id = rt.signals.insert(SignalState {
            value: Box::new(initial),
            subscribers: HashSet::new(),
        });
        if let Some(owner) = &rt.owner {
            owner.borrow_mut().signals.push(id);
        }
        id
    });

    (
        ReadSignal {
            id,
            _marker: PhantomData,
        },
        WriteSignal {
            id,
            _marker: PhantomData,
        },
    )
}

/// Release a signal's slot and drop its value.
///
/// Handles to a disposed signal report `None` from the `try_` readers and
/// ignore writes. Disposing twice is a no-op.
pub fn dispose_signal(id: SignalId) {
    let removed = RUNTIME
        .try_with(|rt| {
            let mut rt_ref = rt.borrow_mut();
            let state = rt_ref.signals.remove(id)?;
            for eid in &state.subscribers {
                if let Some(effect) = rt_ref.effects.get_mut(*eid) {
                    effect.dependencies.remove(&id);
                }
            }
            Some(state)
        })
        .ok()
        .flatten();
    // The value may own handles whose Drop re-enters the runtime.
    drop(removed);
}

// ---------------------------------------------------------------------------
// ReadSignal
// ---------------------------------------------------------------------------

/// Read-half of a signal. `Copy`; only stores an id.
pub struct ReadSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<T>,
}

// Manual impls so we don't require T: Copy/Clone for the signal itself.
impl<T: 'static> Copy for ReadSignal<T> {}
impl<T: 'static> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> ReadSignal<T> {
    /// The slot this handle points at.
    pub fn id(&self) -> SignalId {
        self.id
    }

    /// Read the current value, subscribing the running effect (if any).
    ///
    /// # Panics
    ///
    /// Panics if the signal has been disposed.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(|v| v.clone())
    }

    /// Read by reference without cloning. Still subscribes the running effect.
    ///
    /// `f` must not read other signals.
    ///
    /// # Panics
    ///
    /// Panics if the signal has been disposed.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.try_with(f).expect("read of a disposed signal")
    }

    /// Like [`with`](Self::with), but returns `None` once the signal is disposed.
    pub fn try_with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        RUNTIME.with(|rt| {
            {
                let mut rt_ref = rt.borrow_mut();
                if !rt_ref.signals.contains_key(self.id) {
                    return None;
                }
                if let Some(eid) = rt_ref.tracking {
                    if let Some(effect) = rt_ref.effects.get_mut(eid) {
                        effect.dependencies.insert(self.id);
                        rt_ref.signals[self.id].subscribers.insert(eid);
                    }
                }
            }
            let rt_ref = rt.borrow();
            let any_ref = &rt_ref.signals.get(self.id)?.value;
            Some(f(any_ref.downcast_ref::<T>().expect("signal type mismatch")))
        })
    }

    /// Like [`get`](Self::get), but returns `None` once the signal is disposed.
    pub fn try_get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.try_with(|v| v.clone())
    }

    /// Read without tracking; will not subscribe any running effect.
    ///
    /// # Panics
    ///
    /// Panics if the signal has been disposed.
    pub fn get_untracked(&self) -> T
    where
        T: Clone,
    {
        RUNTIME.with(|rt| {
            let rt_ref = rt.borrow();
            let any_ref = &rt_ref
                .signals
                .get(self.id)
                .expect("read of a disposed signal")
                .value;
            any_ref
                .downcast_ref::<T>()
                .expect("signal type mismatch")
                .clone()
        })
    }

    /// Whether the underlying slot is still alive.
    pub fn is_alive(&self) -> bool {
        RUNTIME.with(|rt| rt.borrow().signals.contains_key(self.id))
    }
}

// ---------------------------------------------------------------------------
// WriteSignal
// ---------------------------------------------------------------------------

/// Write-half of a signal. `Copy`; only stores an id.
pub struct WriteSignal<T: 'static> {
    id: SignalId,
    _marker: PhantomData<T>,
}

impl<T: 'static> Copy for WriteSignal<T> {}
impl<T: 'static> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> fmt::Debug for WriteSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteSignal").field("id", &self.id).finish()
    }
}

impl<T: 'static> WriteSignal<T> {
    /// Overwrite the signal value and notify subscribers.
    ///
    /// Writing to a disposed signal is ignored.
    pub fn set(&self, value: T) {
        let written = RUNTIME.with(|rt| {
            let mut rt_ref = rt.borrow_mut();
            let state = rt_ref.signals.get_mut(self.id)?;
            let old = std::mem::replace(&mut state.value, Box::new(value));
            Some((old, state.subscribers.iter().copied().collect::<Vec<_>>()))
        });
        if let Some((old, subs)) = written {
            drop(old);
            notify_subscribers(subs);
        }
    }

    /// Overwrite the value only if it differs; returns whether it changed.
    pub fn set_if_changed(&self, value: T) -> bool
    where
        T: PartialEq,
    {
        let differs = RUNTIME.with(|rt| {
            let rt_ref = rt.borrow();
            rt_ref.signals.get(self.id).map(|state| {
                state
                    .value
                    .downcast_ref::<T>()
                    .expect("signal type mismatch")
                    != &value
            })
        });
        if differs == Some(true) {
            self.set(value);
            true
        } else {
            false
        }
    }

    /// Mutate the value in-place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let subs = RUNTIME.with(|rt| {
            let mut rt_ref = rt.borrow_mut();
            let state = rt_ref.signals.get_mut(self.id)?;
            let val = state
                .value
                .downcast_mut::<T>()
                .expect("signal type mismatch");
            f(val);
            Some(state.subscribers.iter().copied().collect::<Vec<_>>())
        });
        if let Some(subs) = subs {
            notify_subscribers(subs);
        }
    }
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

fn insert_effect(f: Box<dyn FnMut()>) -> EffectId {
    RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        let eid = rt_ref.effects.insert(EffectState {
            callback: Some(f),
            dependencies: HashSet::new(),
        });
        if let Some(owner) = &rt_ref.owner {
            owner.borrow_mut().effects.push(eid);
        }
        eid
    })
}

/// Create a side-effect that auto-tracks signal reads.
///
/// The closure runs immediately once (establishing initial subscriptions),
/// then re-runs whenever any tracked signal changes.
pub fn create_effect(f: impl FnMut() + 'static) {
    create_effect_with_id(f);
}

/// Create an effect and return its [`EffectId`] so it can later be disposed.
pub fn create_effect_with_id(f: impl FnMut() + 'static) -> EffectId {
    let eid = insert_effect(Box::new(f));
    run_effect(eid);
    eid
}

/// Create a memoised derived computation.
///
/// The function `f` is run immediately and whenever its dependencies change.
/// The returned `ReadSignal<T>` only notifies *its* subscribers when the
/// computed value actually changes (by `PartialEq`).
pub fn create_memo<T: Clone + PartialEq + 'static>(
    mut f: impl FnMut() -> T + 'static,
) -> ReadSignal<T> {
    // Eager first evaluation with tracking cleared so a parent effect does
    // not subscribe to the memo's inputs.
    let prev = RUNTIME.with(|rt| rt.borrow_mut().tracking.take());
    let first_value = f();
    RUNTIME.with(|rt| rt.borrow_mut().tracking = prev);

    let (read, write) = create_signal(first_value);

    create_effect(move || {
        let new_val = f();
        write.set_if_changed(new_val);
    });

    read
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Batch multiple signal writes so that effects run only once.
///
/// Memos read inside the batch still hold their pre-batch value.
///
/// ```ignore
/// batch(|| {
///     set_a(1);
///     set_b(2);
/// });
/// // Effects that depend on a and/or b run once here.
/// ```
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    RUNTIME.with(|rt| {
        rt.borrow_mut().batch_depth += 1;
    });

    let out = f();

    let pending = RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        rt_ref.batch_depth -= 1;
        if rt_ref.batch_depth == 0 {
            let mut seen = HashSet::new();
            rt_ref
                .pending_effects
                .drain(..)
                .filter(|id| seen.insert(*id))
                .collect()
        } else {
            Vec::new()
        }
    });

    notify_subscribers(pending);
    out
}

// ---------------------------------------------------------------------------
// Dispose
// ---------------------------------------------------------------------------

/// Remove an effect so it no longer re-runs when its dependencies change.
///
/// Disposing twice is a no-op.
pub fn dispose_effect(eid: EffectId) {
    let removed = RUNTIME
        .try_with(|rt| {
            let mut rt_ref = rt.borrow_mut();
            let state = rt_ref.effects.remove(eid)?;
            for sid in &state.dependencies {
                if let Some(signal) = rt_ref.signals.get_mut(*sid) {
                    signal.subscribers.remove(&eid);
                }
            }
            if rt_ref.tracking == Some(eid) {
                rt_ref.tracking = None;
            }
            Some(state)
        })
        .ok()
        .flatten();
    // Captured state may own handles whose Drop re-enters the runtime.
    drop(removed);
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Run a single effect: clear old deps, set tracking, execute callback.
fn run_effect(eid: EffectId) {
    let maybe_cb = RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        let effect = rt_ref.effects.get_mut(eid)?;
        let old_deps: Vec<SignalId> = effect.dependencies.drain().collect();
        let cb = effect.callback.take();
        for sid in old_deps {
            if let Some(signal) = rt_ref.signals.get_mut(sid) {
                signal.subscribers.remove(&eid);
            }
        }
        cb
    });

    let Some(mut cb) = maybe_cb else {
        return;
    };

    let prev_tracking = RUNTIME.with(|rt| rt.borrow_mut().tracking.replace(eid));

    cb();

    // Put the callback back unless the effect was disposed while running.
    let leftover = RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        rt_ref.tracking = prev_tracking;
        match rt_ref.effects.get_mut(eid) {
            Some(effect) => {
                effect.callback = Some(cb);
                None
            }
            None => Some(cb),
        }
    });
    drop(leftover);
}

/// Notify a list of subscriber effects that a signal changed.
fn notify_subscribers(subs: Vec<EffectId>) {
    if subs.is_empty() {
        return;
    }

    // Inside a batch, or already inside the notification loop: queue.
    let queued = RUNTIME.with(|rt| {
        let mut rt_ref = rt.borrow_mut();
        if rt_ref.batch_depth > 0 || rt_ref.running_effects {
            rt_ref.pending_effects.extend(subs.iter().copied());
            true
        } else {
            rt_ref.running_effects = true;
            false
        }
    });
    if queued {
        return;
    }

    let mut queue: Vec<EffectId> = subs;
    while !queue.is_empty() {
        let mut seen = HashSet::new();
        for eid in std::mem::take(&mut queue) {
            if seen.insert(eid) {
                run_effect(eid);
            }
        }
        RUNTIME.with(|rt| {
            let mut rt_ref = rt.borrow_mut();
            queue.append(&mut rt_ref.pending_effects);
        });
    }

    RUNTIME.with(|rt| {
        rt.borrow_mut().running_effects = false;
    });
}

// ---------------------------------------------------------------------------
// Test helper: reset the thread-local runtime between tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn reset_runtime() {
    let old = RUNTIME.with(|rt| std::mem::replace(&mut *rt.borrow_mut(), Runtime::new()));
    drop(old);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
