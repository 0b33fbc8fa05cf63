// ============================================================================
// spark-breakpoints - Graph Types
// Type-erased source/reaction traits and the storage behind Signal<T>
// ============================================================================
//
// Graph operations (marking stale, comparing clocks, wiring dependencies)
// never need the value type, so sources and reactions are stored as
// `Rc<dyn AnySource>` / `Weak<dyn AnyReaction>`. Only reads and writes of the
// value go through the concrete generic types.
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::constants::NodeFlags;

// =============================================================================
// TYPE-ERASED TRAITS
// =============================================================================

/// Something that can be read and depended upon: a signal or a derived.
pub trait AnySource: Any {
    fn flags(&self) -> NodeFlags;

    fn set_flags(&self, flags: NodeFlags);

    /// Clock tick at which the held value last changed.
    fn changed_at(&self) -> u64;

    /// Register a reaction that depends on this source.
    fn add_reaction(&self, reaction: Weak<dyn AnyReaction>);

    /// Forget a reaction that no longer depends on this source.
    fn remove_reaction(&self, reaction: &Rc<dyn AnyReaction>);

    /// Live reactions, collected so the caller holds no borrow while mutating.
    fn reactions(&self) -> Vec<Rc<dyn AnyReaction>>;

    fn reaction_count(&self) -> usize;

    /// Bring the held value up to date. No-op for plain signals.
    fn refresh(&self) {}

    /// The reaction side of a derived. `None` for plain signals.
    fn as_derived_reaction(&self) -> Option<Rc<dyn AnyReaction>> {
        None
    }
}

/// Something that reruns when its dependencies change: a derived or an effect.
pub trait AnyReaction: Any {
    fn flags(&self) -> NodeFlags;

    fn set_flags(&self, flags: NodeFlags);

    /// Clock tick at which this reaction last ran against fresh inputs.
    fn verified_at(&self) -> u64;

    /// Sources read during the last run, in first-read order.
    fn deps(&self) -> Vec<Rc<dyn AnySource>>;

    /// Swap in a new dependency list, returning the previous one.
    fn replace_deps(&self, deps: Vec<Rc<dyn AnySource>>) -> Vec<Rc<dyn AnySource>>;

    /// Run the reaction. Returns true when a derived produced a new value.
    fn update(&self) -> bool;

    /// The source side of a derived. `None` for effects.
    fn as_derived_source(&self) -> Option<Rc<dyn AnySource>>;

    fn mark_status(&self, status: NodeFlags) {
        self.set_flags(self.flags().with_status(status));
    }
}

/// Pointer identity for type-erased graph nodes.
pub fn same_node<A: ?Sized, B: ?Sized>(a: &Rc<A>, b: &Rc<B>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

// =============================================================================
// REACTION LIST
// =============================================================================

/// Weak back-references from a source to the reactions reading it.
#[derive(Default)]
pub struct ReactionList {
    entries: RefCell<Vec<Weak<dyn AnyReaction>>>,
}

impl ReactionList {
    pub fn push(&self, reaction: Weak<dyn AnyReaction>) {
        let mut entries = self.entries.borrow_mut();
        if !entries.iter().any(|w| Weak::ptr_eq(w, &reaction)) {
            entries.push(reaction);
        }
    }

    pub fn remove(&self, reaction: &Rc<dyn AnyReaction>) {
        self.entries.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(rc) => !same_node(&rc, reaction),
            None => false,
        });
    }

    /// Prune dropped reactions and return the live ones.
    pub fn live(&self) -> Vec<Rc<dyn AnyReaction>> {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|w| w.strong_count() > 0);
        entries.iter().filter_map(Weak::upgrade).collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// SOURCE INNER (the data behind Signal<T>)
// =============================================================================

/// Equality used to decide whether a write is a change.
pub type EqualsFn<T> = fn(&T, &T) -> bool;

pub fn default_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// Storage for a writable signal.
pub struct SourceInner<T> {
    flags: Cell<NodeFlags>,
    value: RefCell<T>,
    changed_at: Cell<u64>,
    reactions: ReactionList,
    equals: EqualsFn<T>,
}

impl<T> SourceInner<T> {
    pub fn new(value: T) -> Self
    where
        T: PartialEq,
    {
        Self::new_with_equals(value, default_equals)
    }

    pub fn new_with_equals(value: T, equals: EqualsFn<T>) -> Self {
        Self {
            flags: Cell::new(NodeFlags::SOURCE | NodeFlags::CLEAN),
            value: RefCell::new(value),
            changed_at: Cell::new(0),
            reactions: ReactionList::default(),
            equals,
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Store `value` if it differs from the current one. Returns true on change.
    pub fn replace(&self, value: T) -> bool {
        let changed = !(self.equals)(&self.value.borrow(), &value);
        if changed {
            *self.value.borrow_mut() = value;
        }
        changed
    }

    /// Mutate in place. Returns true when the value ended up different.
    pub fn modify(&self, f: impl FnOnce(&mut T)) -> bool
    where
        T: Clone,
    {
        let before = self.value.borrow().clone();
        f(&mut self.value.borrow_mut());
        !(self.equals)(&before, &self.value.borrow())
    }

    pub fn stamp(&self, tick: u64) {
        self.changed_at.set(tick);
    }
}

impl<T: 'static> AnySource for SourceInner<T> {
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
}
