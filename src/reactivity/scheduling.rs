// ============================================================================
// spark-breakpoints - Effect Scheduling
// Queue stale effects and run them synchronously in the order they went stale
// ============================================================================
//
// There is no microtask queue in Rust. Effects are flushed right after the
// write that made them stale, or when the outermost batch ends.
// ============================================================================

use std::rc::Rc;

use crate::core::constants::NodeFlags;
use crate::core::context::with_context;
use crate::core::types::AnyReaction;
use crate::reactivity::tracking::is_dirty;

/// Flush passes allowed before an effect feedback loop is assumed.
pub const MAX_FLUSH_PASSES: u32 = 1000;

/// Queue a stale effect to run at the next flush.
///
/// Render effects go to their own queue, which every flush drains before
/// each ordinary effect runs.
pub fn schedule_effect(effect: &Rc<dyn AnyReaction>) {
    let weak = Rc::downgrade(effect);
    if effect.flags().contains(NodeFlags::RENDER_EFFECT) {
        with_context(|ctx| ctx.enqueue_render_effect(weak));
    } else {
        with_context(|ctx| ctx.enqueue_effect(weak));
    }
}

/// Clears the flushing flag even if an effect panics.
struct FlushGuard;

impl Drop for FlushGuard {
    fn drop(&mut self) {
        with_context(|ctx| ctx.set_flushing(false));
    }
}

/// Run every queued effect, including effects queued by those runs.
///
/// Queued render effects always run before the next ordinary effect, so an
/// ordinary effect never observes state a render effect has yet to update.
/// Re-entrant calls return immediately; the outer flush picks up anything
/// queued meanwhile.
///
/// # Panics
///
/// Panics after [`MAX_FLUSH_PASSES`] passes, which means some effect keeps
/// re-triggering itself.
pub fn flush_effects() {
    if with_context(|ctx| ctx.set_flushing(true)) {
        return;
    }
    let _guard = FlushGuard;

    let mut passes = 0;
    loop {
        flush_render_effects(&mut passes);

        let pending = with_context(|ctx| ctx.take_pending_effects());
        if pending.is_empty() {
            break;
        }
        count_pass(&mut passes);

        for effect in pending.iter().filter_map(|weak| weak.upgrade()) {
            flush_render_effects(&mut passes);
            run_if_stale(&effect);
        }
    }
}

fn flush_render_effects(passes: &mut u32) {
    loop {
        let pending = with_context(|ctx| ctx.take_render_effects());
        if pending.is_empty() {
            return;
        }
        count_pass(passes);

        for effect in pending.iter().filter_map(|weak| weak.upgrade()) {
            run_if_stale(&effect);
        }
    }
}

fn count_pass(passes: &mut u32) {
    *passes += 1;
    if *passes > MAX_FLUSH_PASSES {
        panic!("Maximum update depth exceeded. An effect keeps re-triggering itself.");
    }
}

fn run_if_stale(effect: &Rc<dyn AnyReaction>) {
    let flags = effect.flags();
    if flags.contains(NodeFlags::DESTROYED) || !flags.is_stale() {
        return;
    }

    if is_dirty(&**effect) {
        effect.update();
    } else {
        effect.mark_status(NodeFlags::CLEAN);
    }
}

/// Run pending effects now, unless a batch is still open.
pub fn flush_sync() {
    if !with_context(|ctx| ctx.is_batching()) {
        flush_effects();
    }
}
