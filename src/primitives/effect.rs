// ============================================================================
// spark-breakpoints - Effects
// Side effects that rerun when the values they read change
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::constants::NodeFlags;
use crate::core::context::with_context;
use crate::core::types::{AnyReaction, AnySource};
use crate::reactivity::batching::batch;
use crate::reactivity::tracking::{remove_reactions, run_tracked};

/// Body of an effect.
pub type EffectFn = Box<dyn FnMut()>;

// =============================================================================
// EFFECT INNER
// =============================================================================

pub struct EffectInner {
    flags: Cell<NodeFlags>,
    func: RefCell<Option<EffectFn>>,
    deps: RefCell<Vec<Rc<dyn AnySource>>>,
    verified_at: Cell<u64>,
    self_ref: Weak<EffectInner>,
}

impl EffectInner {
    fn new(func: EffectFn, kind: NodeFlags) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            flags: Cell::new(kind | NodeFlags::DIRTY),
            func: RefCell::new(Some(func)),
            deps: RefCell::new(Vec::new()),
            verified_at: Cell::new(0),
            self_ref: self_ref.clone(),
        })
    }

    pub fn is_destroyed(&self) -> bool {
        self.flags.get().contains(NodeFlags::DESTROYED)
    }
}

impl AnyReaction for EffectInner {
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
        if self.is_destroyed() {
            return false;
        }
        let Some(this) = self.self_ref.upgrade() else {
            return false;
        };
        // Clean before running so writes made by the body can re-stale it
        self.mark_status(NodeFlags::CLEAN);

        let reaction: Rc<dyn AnyReaction> = this;
        run_tracked(&reaction, || {
            if let Some(func) = self.func.borrow_mut().as_mut() {
                func();
            }
        });
        self.verified_at.set(with_context(|ctx| ctx.now()));
        false
    }

    fn as_derived_source(&self) -> Option<Rc<dyn AnySource>> {
        None
    }
}

// =============================================================================
// EFFECT HANDLE
// =============================================================================

/// Owning handle to a running effect.
///
/// The effect stops when the last handle is dropped or [`Effect::dispose`]
/// is called.
#[must_use = "dropping the handle stops the effect"]
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    pub fn is_destroyed(&self) -> bool {
        self.inner.is_destroyed()
    }

    /// Stop the effect and unsubscribe it from everything it reads.
    pub fn dispose(&self) {
        if self.inner.is_destroyed() {
            return;
        }
        self.inner
            .flags
            .set(self.inner.flags.get() | NodeFlags::DESTROYED);

        let reaction: Rc<dyn AnyReaction> = self.inner.clone();
        remove_reactions(&reaction);

        // Disposal from inside the body leaves the closure to be dropped
        // with the inner
        if let Ok(mut func) = self.inner.func.try_borrow_mut() {
            func.take();
        }
    }

    pub fn inner(&self) -> &Rc<EffectInner> {
        &self.inner
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if Rc::strong_count(&self.inner) == 1 {
            self.dispose();
        }
    }
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Run `f` now and again whenever a value it read changes.
///
/// The first run happens inside a batch, so effects it makes stale run
/// after it returns rather than in the middle of it.
pub fn effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    spawn(Box::new(f), NodeFlags::EFFECT)
}

/// Like [`effect`], but reruns ahead of every ordinary effect in a flush.
///
/// Use it for effects that keep other reactive state in step, so ordinary
/// effects reading that state never see it half updated.
pub fn render_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    spawn(Box::new(f), NodeFlags::EFFECT | NodeFlags::RENDER_EFFECT)
}

fn spawn(func: EffectFn, kind: NodeFlags) -> Effect {
    let inner = EffectInner::new(func, kind);
    batch(|| inner.update());
    Effect { inner }
}
