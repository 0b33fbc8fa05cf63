// ============================================================================
// spark-breakpoints - Reactive Context
// Thread-local state for the currently running reaction, batching and the
// effect queue
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use super::types::{same_node, AnyReaction, AnySource};

/// All per-thread state of the reactive runtime.
///
/// The runtime is single-threaded: every signal, derived and effect created
/// on a thread shares this context and nothing crosses threads.
pub struct ReactiveContext {
    /// Reaction whose reads are currently being recorded
    active_reaction: RefCell<Option<Weak<dyn AnyReaction>>>,

    /// Reads inside `untrack` are not recorded
    untracking: Cell<bool>,

    /// Sources read by the active reaction during this run
    collected: RefCell<Vec<Rc<dyn AnySource>>>,

    /// Logical clock, advanced on every value change
    clock: Cell<u64>,

    batch_depth: Cell<u32>,

    /// Stale render effects; drained before `pending_effects`
    render_effects: RefCell<VecDeque<Weak<dyn AnyReaction>>>,

    /// Stale effects waiting to run, in the order they went stale
    pending_effects: RefCell<VecDeque<Weak<dyn AnyReaction>>>,

    flushing: Cell<bool>,
}

impl ReactiveContext {
    pub fn new() -> Self {
        Self {
            active_reaction: RefCell::new(None),
            untracking: Cell::new(false),
            collected: RefCell::new(Vec::new()),
            clock: Cell::new(0),
            batch_depth: Cell::new(0),
            render_effects: RefCell::new(VecDeque::new()),
            pending_effects: RefCell::new(VecDeque::new()),
            flushing: Cell::new(false),
        }
    }

    // =========================================================================
    // TRACKING
    // =========================================================================

    pub fn set_active_reaction(
        &self,
        reaction: Option<Weak<dyn AnyReaction>>,
    ) -> Option<Weak<dyn AnyReaction>> {
        self.active_reaction.replace(reaction)
    }

    pub fn active_reaction(&self) -> Option<Rc<dyn AnyReaction>> {
        self.active_reaction.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn set_untracking(&self, value: bool) -> bool {
        self.untracking.replace(value)
    }

    pub fn is_untracking(&self) -> bool {
        self.untracking.get()
    }

    pub fn is_tracking(&self) -> bool {
        !self.is_untracking() && self.active_reaction.borrow().is_some()
    }

    pub fn swap_collected(&self, deps: Vec<Rc<dyn AnySource>>) -> Vec<Rc<dyn AnySource>> {
        self.collected.replace(deps)
    }

    /// Record a read, ignoring repeats within the same run.
    pub fn collect(&self, source: Rc<dyn AnySource>) {
        let mut collected = self.collected.borrow_mut();
        if !collected.iter().any(|dep| same_node(dep, &source)) {
            collected.push(source);
        }
    }

    // =========================================================================
    // CLOCK
    // =========================================================================

    pub fn now(&self) -> u64 {
        self.clock.get()
    }

    /// Advance the clock and return the new tick.
    pub fn tick(&self) -> u64 {
        let next = self.clock.get() + 1;
        self.clock.set(next);
        next
    }

    // =========================================================================
    // BATCHING
    // =========================================================================

    pub fn enter_batch(&self) -> u32 {
        let depth = self.batch_depth.get() + 1;
        self.batch_depth.set(depth);
        depth
    }

    pub fn exit_batch(&self) -> u32 {
        let depth = self.batch_depth.get().saturating_sub(1);
        self.batch_depth.set(depth);
        depth
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth.get() > 0
    }

    // =========================================================================
    // EFFECT QUEUE
    // =========================================================================

    pub fn enqueue_effect(&self, effect: Weak<dyn AnyReaction>) {
        self.pending_effects.borrow_mut().push_back(effect);
    }

    pub fn take_pending_effects(&self) -> VecDeque<Weak<dyn AnyReaction>> {
        self.pending_effects.replace(VecDeque::new())
    }

    pub fn enqueue_render_effect(&self, effect: Weak<dyn AnyReaction>) {
        self.render_effects.borrow_mut().push_back(effect);
    }

    pub fn take_render_effects(&self) -> VecDeque<Weak<dyn AnyReaction>> {
        self.render_effects.replace(VecDeque::new())
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.render_effects.borrow().is_empty() || !self.pending_effects.borrow().is_empty()
    }

    pub fn set_flushing(&self, value: bool) -> bool {
        self.flushing.replace(value)
    }

    pub fn is_flushing(&self) -> bool {
        self.flushing.get()
    }
}

impl Default for ReactiveContext {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static CONTEXT: ReactiveContext = ReactiveContext::new();
}

/// Access the thread-local reactive context.
pub fn with_context<R>(f: impl FnOnce(&ReactiveContext) -> R) -> R {
    CONTEXT.with(f)
}

/// True inside a derived or effect run, outside `untrack`.
pub fn is_tracking() -> bool {
    with_context(|ctx| ctx.is_tracking())
}

/// True inside `batch`.
pub fn is_batching() -> bool {
    with_context(|ctx| ctx.is_batching())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SourceInner;

    #[test]
    fn fresh_context_is_idle() {
        let ctx = ReactiveContext::new();
        assert_eq!(ctx.now(), 0);
        assert!(!ctx.is_tracking());
        assert!(!ctx.is_batching());
        assert!(!ctx.is_flushing());
        assert!(!ctx.has_pending_effects());
    }

    #[test]
    fn clock_only_moves_forward() {
        let ctx = ReactiveContext::new();
        assert_eq!(ctx.tick(), 1);
        assert_eq!(ctx.tick(), 2);
        assert_eq!(ctx.now(), 2);
    }

    #[test]
    fn nested_batches_unwind() {
        let ctx = ReactiveContext::new();
        assert_eq!(ctx.enter_batch(), 1);
        assert_eq!(ctx.enter_batch(), 2);
        assert_eq!(ctx.exit_batch(), 1);
        assert!(ctx.is_batching());
        assert_eq!(ctx.exit_batch(), 0);
        assert_eq!(ctx.exit_batch(), 0);
        assert!(!ctx.is_batching());
    }

    #[test]
    fn collect_ignores_repeat_reads() {
        let ctx = ReactiveContext::new();
        let a: Rc<dyn AnySource> = Rc::new(SourceInner::new(1));
        let b: Rc<dyn AnySource> = Rc::new(SourceInner::new(2));

        ctx.collect(a.clone());
        ctx.collect(b);
        ctx.collect(a);

        assert_eq!(ctx.swap_collected(Vec::new()).len(), 2);
    }

    #[test]
    fn render_queue_counts_as_pending() {
        let ctx = ReactiveContext::new();
        let handle = crate::primitives::effect::effect(|| {});
        let reaction: Rc<dyn AnyReaction> = handle.inner().clone();
        ctx.enqueue_render_effect(Rc::downgrade(&reaction));

        assert!(ctx.has_pending_effects());
        assert!(ctx.take_pending_effects().is_empty());
        assert_eq!(ctx.take_render_effects().len(), 1);
        assert!(!ctx.has_pending_effects());
    }
}
