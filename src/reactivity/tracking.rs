// ============================================================================
// spark-breakpoints - Dependency Tracking
// Recording reads, wiring dependencies and propagating staleness
// ============================================================================
//
// Borrow discipline: nothing here holds a RefCell borrow across a call that
// can re-enter the graph. Reaction and dependency lists are collected into
// owned Vecs first, then walked and mutated ("collect-then-mutate").
// ============================================================================

use std::rc::{Rc, Weak};

use crate::core::constants::NodeFlags;
use crate::core::context::with_context;
use crate::core::types::{same_node, AnyReaction, AnySource};
use crate::reactivity::scheduling::{flush_effects, schedule_effect};

// =============================================================================
// TRACK READ
// =============================================================================

/// Record `source` as a dependency of the running reaction, if any.
pub fn track_read(source: Rc<dyn AnySource>) {
    with_context(|ctx| {
        if ctx.is_tracking() {
            ctx.collect(source);
        }
    });
}

/// Restores the caller's tracking state when a reaction run ends, including
/// when it unwinds.
struct TrackingScope {
    prev_reaction: Option<Option<Weak<dyn AnyReaction>>>,
    prev_collected: Vec<Rc<dyn AnySource>>,
    prev_untracking: bool,
}

impl TrackingScope {
    fn enter(reaction: &Rc<dyn AnyReaction>) -> Self {
        with_context(|ctx| Self {
            prev_reaction: Some(ctx.set_active_reaction(Some(Rc::downgrade(reaction)))),
            prev_collected: ctx.swap_collected(Vec::new()),
            prev_untracking: ctx.set_untracking(false),
        })
    }

    /// Leave the scope, returning the sources read inside it.
    fn exit(mut self) -> Vec<Rc<dyn AnySource>> {
        self.restore()
    }

    fn restore(&mut self) -> Vec<Rc<dyn AnySource>> {
        let prev_reaction = self.prev_reaction.take().flatten();
        let prev_collected = std::mem::take(&mut self.prev_collected);
        with_context(|ctx| {
            ctx.set_active_reaction(prev_reaction);
            ctx.set_untracking(self.prev_untracking);
            ctx.swap_collected(prev_collected)
        })
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        if self.prev_reaction.is_some() {
            self.restore();
        }
    }
}

/// Run `f` as the body of `reaction`, then make the sources it read the
/// reaction's dependency list.
pub fn run_tracked<R>(reaction: &Rc<dyn AnyReaction>, f: impl FnOnce() -> R) -> R {
    reaction.set_flags(reaction.flags() | NodeFlags::UPDATING);
    let scope = TrackingScope::enter(reaction);

    let result = f();

    let deps = scope.exit();
    reaction.set_flags(reaction.flags() - NodeFlags::UPDATING);
    install_dependencies(reaction, deps);
    result
}

/// Replace the dependency list of `reaction`, unsubscribing from sources it
/// no longer reads and subscribing to the new ones.
pub fn install_dependencies(reaction: &Rc<dyn AnyReaction>, deps: Vec<Rc<dyn AnySource>>) {
    let previous = reaction.replace_deps(deps.clone());

    for old in &previous {
        if !deps.iter().any(|dep| same_node(dep, old)) {
            old.remove_reaction(reaction);
        }
    }
    for dep in &deps {
        dep.add_reaction(Rc::downgrade(reaction));
    }
}

/// Unsubscribe `reaction` from every source it depends on.
pub fn remove_reactions(reaction: &Rc<dyn AnyReaction>) {
    for dep in reaction.replace_deps(Vec::new()) {
        dep.remove_reaction(reaction);
    }
}

// =============================================================================
// NOTIFY WRITE
// =============================================================================

/// Propagate a change of `source` and, outside batches, run stale effects.
///
/// # Panics
///
/// Writing to a signal while a derived is computing is a programming error.
pub fn notify_write(source: Rc<dyn AnySource>) {
    let in_derived = with_context(|ctx| {
        ctx.active_reaction()
            .is_some_and(|r| r.flags().contains(NodeFlags::DERIVED))
    });
    if in_derived {
        panic!(
            "Cannot write to signals inside a derived. \
             Deriveds must be pure computations."
        );
    }

    mark_reactions(source);

    let should_flush = with_context(|ctx| !ctx.is_batching() && !ctx.is_flushing());
    if should_flush {
        flush_effects();
    }
}

// =============================================================================
// MARK REACTIONS
// =============================================================================

/// Mark direct reactions of `source` DIRTY and everything downstream of a
/// derived MAYBE_DIRTY. Effects that go stale are queued in that order.
pub fn mark_reactions(source: Rc<dyn AnySource>) {
    let mut stack: Vec<(Rc<dyn AnySource>, NodeFlags)> = vec![(source, NodeFlags::DIRTY)];

    while let Some((current, status)) = stack.pop() {
        for reaction in current.reactions() {
            let flags = reaction.flags();
            if flags.contains(NodeFlags::DESTROYED) {
                continue;
            }

            let was_clean = !flags.is_stale();
            // Never downgrade DIRTY to MAYBE_DIRTY
            if !flags.contains(NodeFlags::DIRTY) {
                reaction.mark_status(status);
            }

            if flags.contains(NodeFlags::DERIVED) {
                if let Some(derived) = reaction.as_derived_source() {
                    stack.push((derived, NodeFlags::MAYBE_DIRTY));
                }
            } else if was_clean && flags.contains(NodeFlags::EFFECT) {
                schedule_effect(&reaction);
            }
        }
    }
}

// =============================================================================
// IS DIRTY
// =============================================================================

/// Decide whether a stale reaction really has to rerun.
///
/// DIRTY always reruns. MAYBE_DIRTY refreshes upstream deriveds and reruns
/// only if one of them changed after the reaction was last verified.
pub fn is_dirty(reaction: &dyn AnyReaction) -> bool {
    let flags = reaction.flags();
    if flags.contains(NodeFlags::DIRTY) {
        return true;
    }
    if !flags.contains(NodeFlags::MAYBE_DIRTY) {
        return false;
    }

    let verified = reaction.verified_at();
    reaction.deps().iter().any(|dep| {
        dep.refresh();
        dep.changed_at() > verified
    })
}
