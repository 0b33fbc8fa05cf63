// ============================================================================
// spark-breakpoints - Status Map
// One reactive flag per configured breakpoint name
// ============================================================================

use std::rc::Rc;

use indexmap::IndexMap;

use super::active::ActiveBreakpoint;
use crate::primitives::signal::{signal, ReadSignal, Signal};
use crate::reactivity::batching::batch;

/// Per-name boolean flags. At most one is true: the one named by the active
/// breakpoint.
///
/// Callers only ever get [`ReadSignal`]s; the owning resolver is the single
/// writer.
pub struct StatusMap {
    flags: IndexMap<Rc<str>, Signal<bool>>,
}

impl StatusMap {
    pub(crate) fn new(names: &[Rc<str>]) -> Self {
        let flags = names
            .iter()
            .map(|name| (name.clone(), signal(false)))
            .collect();
        Self { flags }
    }

    /// Read-only flag for `name`, `None` if no such breakpoint exists.
    pub fn get(&self, name: &str) -> Option<ReadSignal<bool>> {
        self.flags.get(name).map(Signal::read_only)
    }

    /// Tracked read of one flag. Unknown names read as false.
    pub fn is_active(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(Signal::get)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(|name| name.as_ref())
    }

    /// Tracked read of every flag, in declaration order.
    pub fn snapshot(&self) -> IndexMap<String, bool> {
        self.flags
            .iter()
            .map(|(name, flag)| (name.to_string(), flag.get()))
            .collect()
    }

    /// The name whose flag is set, if any. Tracked.
    pub fn active(&self) -> Option<&str> {
        self.flags
            .iter()
            .find(|(_, flag)| flag.get())
            .map(|(name, _)| name.as_ref())
    }

    /// Clear every flag, then raise the one matching `active`.
    ///
    /// Runs as one batch so effects never see a half-applied pass.
    pub(crate) fn sync(&self, active: &ActiveBreakpoint) {
        batch(|| {
            for flag in self.flags.values() {
                flag.set(false);
            }
            if let Some(flag) = active.name().and_then(|name| self.flags.get(name)) {
                flag.set(true);
            }
        });
        tracing::trace!(active = %active, "breakpoint status synchronized");
    }
}

impl std::fmt::Debug for StatusMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, flag) in &self.flags {
            map.entry(&name.as_ref(), &flag.peek());
        }
        map.finish()
    }
}
