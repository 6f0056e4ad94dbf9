//! Reactive state: signals, effects, memos, scopes.
//!
//! - [`create_signal`]: create a read/write signal pair.
//! - [`create_effect`]: auto-tracking side effect.
//! - [`create_memo`]: cached derived computation.
//! - [`batch`]: coalesce multiple writes into one notification pass.
//! - [`Scope`]: owns everything created under it and disposes it on drop.

pub mod effect;
pub mod scope;
pub mod signal;

pub use effect::{batch, create_effect, create_effect_with_id, create_memo, dispose_effect, EffectId};
pub use scope::Scope;
pub use signal::{
    create_signal, dispose_signal, live_effect_count, live_signal_count, ReadSignal, SignalId,
    WriteSignal,
};
