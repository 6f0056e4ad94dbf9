//! Auto-tracking side effects and computed memos.
//!
//! Re-exports the effect and memo APIs from [`super::signal`].
//!
//! An effect is a closure that re-runs whenever any signal it reads changes;
//! a memo is a cached derived computation that only notifies downstream
//! subscribers when its output actually changes:
//!
//! ```ignore
//! let (index, set_index) = create_signal(3_usize);
//! let page = create_memo(move || index.get() / 4);
//! create_effect(move || tracing::debug!(page = page.get()));
//! set_index.set(4); // logs page = 1
//! ```

pub use super::signal::{
    batch, create_effect, create_effect_with_id, create_memo, dispose_effect, EffectId,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::signal::{create_signal, reset_runtime, ReadSignal};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn setup() {
        reset_runtime();
    }

    // ── Effects ──────────────────────────────────────────────────────

    #[test]
    fn effect_follows_index_changes() {
        setup();
        let (index, set_index) = create_signal(0_usize);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_c = seen.clone();
        create_effect(move || seen_c.borrow_mut().push(index.get()));
        set_index.set(3);
        set_index.set(1);
        assert_eq!(*seen.borrow(), vec![0, 3, 1]);
    }

    #[test]
    fn effect_retracks_conditional_deps() {
        setup();
        let (open, set_open) = create_signal(false);
        let (inline, _) = create_signal(2_usize);
        let (overlay, set_overlay) = create_signal(7_usize);
        let shown = Rc::new(Cell::new(0));
        let shown_c = shown.clone();
        create_effect(move || {
            shown_c.set(if open.get() { overlay.get() } else { inline.get() });
        });
        assert_eq!(shown.get(), 2);
        set_open.set(true);
        assert_eq!(shown.get(), 7);
        set_overlay.set(8);
        assert_eq!(shown.get(), 8);
    }

    #[test]
    fn effect_writing_another_signal_settles() {
        setup();
        let (index, set_index) = create_signal(0_usize);
        let (page, set_page) = create_signal(0_usize);
        create_effect(move || set_page.set(index.get() / 4));
        set_index.set(9);
        assert_eq!(page.get(), 2);
    }

    // ── Memos ────────────────────────────────────────────────────────

    #[test]
    fn memo_notifies_only_on_change() {
        setup();
        let (width, set_width) = create_signal(1000_i32);
        let per_page: ReadSignal<i32> = create_memo(move || (width.get() / 250).max(1));
        let runs = Rc::new(Cell::new(0));
        let runs_c = runs.clone();
        create_effect(move || {
            let _ = per_page.get();
            runs_c.set(runs_c.get() + 1);
        });
        set_width.set(1100); // still 4 per page
        assert_eq!(runs.get(), 1);
        set_width.set(500);
        assert_eq!(per_page.get(), 2);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn memo_chain() {
        setup();
        let (count, set_count) = create_signal(10_usize);
        let last = create_memo(move || count.get().saturating_sub(1));
        let has_next = create_memo(move || last.get() > 0);
        assert!(has_next.get());
        set_count.set(1);
        assert_eq!(last.get(), 0);
        assert!(!has_next.get());
    }

    // ── Batch / dispose ──────────────────────────────────────────────

    #[test]
    fn batch_coalesces_nested_writes() {
        setup();
        let (a, set_a) = create_signal(0_i32);
        let (b, set_b) = create_signal(0_i32);
        let runs = Rc::new(Cell::new(0_u32));
        let runs_c = runs.clone();
        create_effect(move || {
            let _ = a.get() + b.get();
            runs_c.set(runs_c.get() + 1);
        });
        batch(|| {
            set_a.set(1);
            batch(|| set_b.set(2));
            set_a.set(0);
        });
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn dispose_is_idempotent() {
        setup();
        let (r, w) = create_signal(0_i32);
        let log = Rc::new(RefCell::new(Vec::<i32>::new()));
        let log_c = log.clone();
        let eid = create_effect_with_id(move || log_c.borrow_mut().push(r.get()));
        w.set(1);
        dispose_effect(eid);
        dispose_effect(eid);
        w.set(2);
        assert_eq!(*log.borrow(), vec![0, 1]);
    }
}
