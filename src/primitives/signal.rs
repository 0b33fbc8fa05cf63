// ============================================================================
// spark-breakpoints - Signal Primitive
// Writable reactive values and their read-only views
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::context::with_context;
use crate::core::types::{AnySource, EqualsFn, SourceInner};
use crate::reactivity::batching::untrack;
use crate::reactivity::equality::safe_equals_f64;
use crate::reactivity::tracking::{notify_write, track_read};

// =============================================================================
// SIGNAL<T>
// =============================================================================

/// A writable reactive value.
///
/// Reading inside a derived or effect subscribes it; writing a different
/// value marks every subscriber stale and runs stale effects.
///
/// ```
/// use spark_breakpoints::signal;
///
/// let width = signal(800.0);
/// assert_eq!(width.get(), 800.0);
///
/// assert!(width.set(1200.0));
/// assert!(!width.set(1200.0));
/// ```
pub struct Signal<T> {
    inner: Rc<SourceInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self {
            inner: Rc::new(SourceInner::new(value)),
        }
    }

    pub fn new_with_equals(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            inner: Rc::new(SourceInner::new_with_equals(value, equals)),
        }
    }

    /// Current value, tracked.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        track_read(self.inner.clone());
        self.inner.get()
    }

    /// Borrow the current value, tracked.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        track_read(self.inner.clone());
        self.inner.with(f)
    }

    /// Current value without subscribing the running reaction.
    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        untrack(|| self.inner.get())
    }

    /// Store a new value. Returns true if it differed from the old one.
    pub fn set(&self, value: T) -> bool {
        let changed = self.inner.replace(value);
        if changed {
            self.publish();
        }
        changed
    }

    /// Mutate the value in place. Returns true if it ended up different.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let changed = self.inner.modify(f);
        if changed {
            self.publish();
        }
        changed
    }

    fn publish(&self) {
        with_context(|ctx| self.inner.stamp(ctx.tick()));
        notify_write(self.inner.clone());
    }

    /// A handle that can read this signal but never write it.
    pub fn read_only(&self) -> ReadSignal<T> {
        ReadSignal {
            inner: self.inner.clone(),
        }
    }

    /// Number of live reactions reading this signal.
    pub fn reaction_count(&self) -> usize {
        self.inner.reaction_count()
    }
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal").field("value", &self.peek()).finish()
    }
}

// =============================================================================
// READ SIGNAL<T>
// =============================================================================

/// Read-only view of a [`Signal`] owned by someone else.
pub struct ReadSignal<T> {
    inner: Rc<SourceInner<T>>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: 'static> ReadSignal<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        track_read(self.inner.clone());
        self.inner.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        track_read(self.inner.clone());
        self.inner.with(f)
    }

    pub fn peek(&self) -> T
    where
        T: Clone,
    {
        untrack(|| self.inner.get())
    }

    pub fn reaction_count(&self) -> usize {
        self.inner.reaction_count()
    }
}

impl<T: 'static> From<Signal<T>> for ReadSignal<T> {
    fn from(signal: Signal<T>) -> Self {
        ReadSignal {
            inner: signal.inner,
        }
    }
}

impl<T: 'static> From<&Signal<T>> for ReadSignal<T> {
    fn from(signal: &Signal<T>) -> Self {
        signal.read_only()
    }
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for ReadSignal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadSignal")
            .field("value", &self.peek())
            .finish()
    }
}

// =============================================================================
// CREATION FUNCTIONS
// =============================================================================

pub fn signal<T: PartialEq + 'static>(value: T) -> Signal<T> {
    Signal::new(value)
}

pub fn signal_with_equals<T: 'static>(value: T, equals: EqualsFn<T>) -> Signal<T> {
    Signal::new_with_equals(value, equals)
}

/// `f64` signal whose NaN writes do not count as changes.
pub fn signal_f64(value: f64) -> Signal<f64> {
    Signal::new_with_equals(value, safe_equals_f64)
}
