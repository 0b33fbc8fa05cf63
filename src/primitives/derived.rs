// ============================================================================
// spark-breakpoints - Derived Values
// Lazily computed, cached values that recompute when their inputs change
// ============================================================================
//
// A derived is both a source (others read it) and a reaction (it reads
// others). Reads are pull-based: a stale derived recomputes on the next
// `get`, and a MAYBE_DIRTY one first checks whether any input actually
// changed before paying for the computation.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::constants::NodeFlags;
use crate::core::context::with_context;
use crate::core::types::{default_equals, AnyReaction, AnySource, EqualsFn, ReactionList};
use crate::reactivity::batching::untrack;
use crate::reactivity::tracking::{is_dirty, run_tracked, track_read};

// =============================================================================
// DERIVED INNER
// =============================================================================

pub struct DerivedInner<T> {
    flags: Cell<NodeFlags>,
    compute: Box<dyn Fn() -> T>,
    /// `None` until the first computation
    value: RefCell<Option<T>>,
    equals: EqualsFn<T>,
    changed_at: Cell<u64>,
    verified_at: Cell<u64>,
    reactions: ReactionList,
    deps: RefCell<Vec<Rc<dyn AnySource>>>,
    self_ref: Weak<DerivedInner<T>>,
}

impl<T: Clone + 'static> DerivedInner<T> {
    pub fn new_with_equals(compute: impl Fn() -> T + 'static, equals: EqualsFn<T>) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            flags: Cell::new(NodeFlags::DERIVED | NodeFlags::SOURCE | NodeFlags::DIRTY),
            compute: Box::new(compute),
            value: RefCell::new(None),
            equals,
            changed_at: Cell::new(0),
            verified_at: Cell::new(0),
            reactions: ReactionList::default(),
            deps: RefCell::new(Vec::new()),
            self_ref: self_ref.clone(),
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.value.borrow().is_some()
    }

    pub fn is_stale(&self) -> bool {
        self.flags.get().is_stale()
    }

    /// Run the computation and store the result if it differs.
    fn recompute(&self) -> bool {
        let Some(this) = self.self_ref.upgrade() else {
            return false;
        };
        let reaction: Rc<dyn AnyReaction> = this;

        let next = run_tracked(&reaction, || (self.compute)());
        self.verified_at.set(with_context(|ctx| ctx.now()));

        let changed = match self.value.borrow().as_ref() {
            Some(current) => !(self.equals)(current, &next),
            None => true,
        };
        if changed {
            *self.value.borrow_mut() = Some(next);
            self.changed_at.set(with_context(|ctx| ctx.tick()));
        }
        changed
    }

    fn cached(&self) -> T {
        self.with_cached(T::clone)
    }

    fn with_cached<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.value.borrow();
        f(value
            .as_ref()
            .expect("derived read before its first computation"))
    }
}

impl<T: Clone + 'static> AnySource for DerivedInner<T> {
    fn flags(&self) -> NodeFlags {
        self.flags.get()
    }

    fn set_flags(&self, flags: NodeFlags) {
        self.flags.set(flags);
    }

    fn changed_at(&self) -> u64 {
        self.changed_at.get()
    }

    fn add_reaction(&self, reaction: Weak<dyn AnyReaction>) {
        self.reactions.push(reaction);
    }

    fn remove_reaction(&self, reaction: &Rc<dyn AnyReaction>) {
        self.reactions.remove(reaction);
    }

    fn reactions(&self) -> Vec<Rc<dyn AnyReaction>> {
        self.reactions.live()
    }

    fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    fn refresh(&self) {
        let flags = self.flags.get();
        if flags.contains(NodeFlags::UPDATING) {
            panic!("Cycle detected: a derived read itself while computing.");
        }
        if !flags.is_stale() && self.is_initialized() {
            return;
        }

        if !self.is_initialized() || is_dirty(self) {
            self.recompute();
        }
        self.flags.set(self.flags.get().with_status(NodeFlags::CLEAN));
    }

    fn as_derived_reaction(&self) -> Option<Rc<dyn AnyReaction>> {
        self.self_ref
            .upgrade()
            .map(|rc| rc as Rc<dyn AnyReaction>)
    }
}

impl<T: Clone + 'static> AnyReaction for DerivedInner<T> {
    fn flags(&self) -> NodeFlags {
        self.flags.get()
    }

    fn set_flags(&self, flags: NodeFlags) {
        self.flags.set(flags);
    }

    fn verified_at(&self) -> u64 {
        self.verified_at.get()
    }

    fn deps(&self) -> Vec<Rc<dyn AnySource>> {
        self.deps.borrow().clone()
    }

    fn replace_deps(&self, deps: Vec<Rc<dyn AnySource>>) -> Vec<Rc<dyn AnySource>> {
        self.deps.replace(deps)
    }

    fn update(&self) -> bool {
        self.recompute()
    }

    fn as_derived_source(&self) -> Option<Rc<dyn AnySource>> {
        self.self_ref.upgrade().map(|rc| rc as Rc<dyn AnySource>)
    }
}

// =============================================================================
// DERIVED<T>
// =============================================================================

/// A cached computation over other reactive values.
///
/// ```
/// use spark_breakpoints::{derived, signal};
///
/// let width = signal(640.0);
/// let wide = derived({
///     let width = width.clone();
///     move || width.get() >= 992.0
/// });
///
/// assert!(!wide.get());
/// width.set(1200.0);
/// assert!(wide.get());
/// ```
pub struct Derived<T> {
    inner: Rc<DerivedInner<T>>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Derived<T> {
    /// Current value, recomputed first if stale. Tracked.
    pub fn get(&self) -> T {
        self.inner.refresh();
        track_read(self.inner.clone());
        self.inner.cached()
    }

    /// Borrow the current value, recomputed first if stale. Tracked.
    ///
    /// The cache stays borrowed while `f` runs, so `f` must not write to
    /// this derived's inputs and then read it again.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.refresh();
        track_read(self.inner.clone());
        self.inner.with_cached(f)
    }

    /// Current value without subscribing the running reaction.
    pub fn peek(&self) -> T {
        untrack(|| self.get())
    }

    /// True when the next read would have to check or recompute.
    pub fn is_stale(&self) -> bool {
        self.inner.is_stale() || !self.inner.is_initialized()
    }

    /// Number of live reactions reading this derived.
    pub fn reaction_count(&self) -> usize {
        AnySource::reaction_count(&*self.inner)
    }

    pub fn inner(&self) -> &Rc<DerivedInner<T>> {
        &self.inner
    }
}

impl<T: fmt::Debug + Clone + 'static> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived")
            .field("value", &self.peek())
            .finish()
    }
}

// =============================================================================
// CREATION FUNCTIONS
// =============================================================================

pub fn derived<T, F>(compute: F) -> Derived<T>
where
    T: Clone + PartialEq + 'static,
    F: Fn() -> T + 'static,
{
    derived_with_equals(compute, default_equals)
}

pub fn derived_with_equals<T, F>(compute: F, equals: EqualsFn<T>) -> Derived<T>
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    Derived {
        inner: DerivedInner::new_with_equals(compute, equals),
    }
}
