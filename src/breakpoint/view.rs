// ============================================================================
// spark-breakpoints - Filtered Views
// ============================================================================

use super::active::ActiveBreakpoint;
use super::thresholds::ThresholdSet;
use crate::primitives::derived::{derived, Derived};

/// A read-only view of a resolver's active breakpoint.
///
/// The view keeps the `min_value` and `overrides` it was created with, but
/// they do not influence the result yet: reading a view is the same as
/// reading [`BreakpointResolver::breakpoint`]. Every view has its own cache,
/// so reading one never recomputes another.
///
/// [`BreakpointResolver::breakpoint`]: super::BreakpointResolver::breakpoint
#[derive(Clone, Debug)]
pub struct FilteredView {
    min_value: Option<f64>,
    overrides: Option<ThresholdSet>,
    value: Derived<ActiveBreakpoint>,
}

impl FilteredView {
    pub(crate) fn new(
        source: &Derived<ActiveBreakpoint>,
        min_value: Option<f64>,
        overrides: Option<ThresholdSet>,
    ) -> Self {
        let source = source.clone();
        Self {
            min_value,
            overrides,
            value: derived(move || source.get()),
        }
    }

    pub fn get(&self) -> ActiveBreakpoint {
        self.value.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&ActiveBreakpoint) -> R) -> R {
        self.value.with(f)
    }

    pub fn peek(&self) -> ActiveBreakpoint {
        self.value.peek()
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    pub fn overrides(&self) -> Option<&ThresholdSet> {
        self.overrides.as_ref()
    }

    /// True when the next read has to check upstream first.
    pub fn is_stale(&self) -> bool {
        self.value.is_stale()
    }

    pub fn as_derived(&self) -> &Derived<ActiveBreakpoint> {
        &self.value
    }
}
