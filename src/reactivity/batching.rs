// ============================================================================
// spark-breakpoints - Batching
// Group writes so observers only ever see the finished state
// ============================================================================

use crate::core::context::with_context;
use crate::reactivity::scheduling::flush_effects;

/// Run `f` with effect flushing deferred until the outermost batch ends.
///
/// Every write inside the batch still marks its dependents stale right away,
/// so deriveds read inside the batch are current. Effects run once, after
/// all writes have landed.
///
/// # Example
///
/// ```
/// use spark_breakpoints::{batch, effect, signal};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let width = signal(0.0);
/// let height = signal(0.0);
/// let runs = Rc::new(Cell::new(0));
///
/// let _watch = effect({
///     let (width, height, runs) = (width.clone(), height.clone(), runs.clone());
///     move || {
///         let _ = width.get() * height.get();
///         runs.set(runs.get() + 1);
///     }
/// });
/// assert_eq!(runs.get(), 1);
///
/// batch(|| {
///     width.set(1280.0);
///     height.set(720.0);
/// });
/// assert_eq!(runs.get(), 2);
/// ```
pub fn batch<T>(f: impl FnOnce() -> T) -> T {
    struct BatchGuard;

    impl Drop for BatchGuard {
        fn drop(&mut self) {
            if with_context(|ctx| ctx.exit_batch()) == 0 {
                flush_effects();
            }
        }
    }

    with_context(|ctx| ctx.enter_batch());
    let _guard = BatchGuard;
    f()
}

/// Read signals without making the running reaction depend on them.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    struct UntrackGuard {
        prev: bool,
    }

    impl Drop for UntrackGuard {
        fn drop(&mut self) {
            with_context(|ctx| ctx.set_untracking(self.prev));
        }
    }

    let _guard = UntrackGuard {
        prev: with_context(|ctx| ctx.set_untracking(true)),
    };
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{is_batching, is_tracking};
    use crate::primitives::effect::effect;
    use crate::primitives::signal::signal;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn batch_reports_depth() {
        assert!(!is_batching());
        batch(|| {
            assert!(is_batching());
            batch(|| assert!(is_batching()));
            assert!(is_batching());
        });
        assert!(!is_batching());
    }

    #[test]
    fn batch_returns_closure_value() {
        assert_eq!(batch(|| 7), 7);
    }

    #[test]
    fn untracked_reads_do_not_subscribe() {
        let tracked = signal(0);
        let hidden = signal(0);
        let runs = Rc::new(Cell::new(0));

        let _effect = effect({
            let (tracked, hidden, runs) = (tracked.clone(), hidden.clone(), runs.clone());
            move || {
                tracked.get();
                untrack(|| {
                    assert!(!is_tracking());
                    hidden.get()
                });
                runs.set(runs.get() + 1);
            }
        });

        hidden.set(1);
        assert_eq!(runs.get(), 1);

        tracked.set(1);
        assert_eq!(runs.get(), 2);
    }
}
