// ============================================================================
// spark-breakpoints - Breakpoint Resolver
// Turns a width signal into an active breakpoint and per-name flags
// ============================================================================
//
// Graph per resolver:
//
//   width ──► active_value ──► breakpoint ──┬──► min
//                                           ├──► sync effect ──► StatusMap
//                                           └──► filtered views
//
// Everything left of the sync effect is pull-based. The effect is the only
// eager node; it keeps the StatusMap in step with the active breakpoint.
// It is a render effect, so it runs before any ordinary effect in the same
// flush, whichever signal made that effect stale.
// ============================================================================

use std::fmt;
use std::rc::Rc;

use super::active::ActiveBreakpoint;
use super::status::StatusMap;
use super::thresholds::{Pairing, SortedThresholds, ThresholdSet};
use super::view::FilteredView;
use crate::config::ConfigProvider;
use crate::error::ConfigurationError;
use crate::primitives::derived::{derived, Derived};
use crate::primitives::effect::{render_effect, Effect};
use crate::primitives::signal::ReadSignal;
use crate::reactivity::batching::untrack;

/// Reactive breakpoint state for one width signal.
///
/// ```
/// use spark_breakpoints::{signal, BreakpointResolver, ThresholdSet};
///
/// let width = signal(500.0);
/// let set = ThresholdSet::from_pairs([("sm", 576.0), ("md", 768.0), ("lg", 992.0)]).unwrap();
/// let resolver = BreakpointResolver::new(&set, &width);
///
/// assert_eq!(resolver.breakpoint().get(), "min");
/// assert!(resolver.min().get());
///
/// width.set(800.0);
/// assert_eq!(resolver.breakpoint().get(), "md");
/// assert!(resolver.statuses().is_active("md"));
/// ```
pub struct BreakpointResolver {
    thresholds: Rc<SortedThresholds>,
    width: ReadSignal<f64>,
    active_value: Derived<f64>,
    breakpoint: Derived<ActiveBreakpoint>,
    min: Derived<bool>,
    statuses: Rc<StatusMap>,
    _sync: Effect,
}

impl BreakpointResolver {
    /// Resolver with [`Pairing::Positional`] normalization.
    pub fn new(set: &ThresholdSet, width: impl Into<ReadSignal<f64>>) -> Self {
        Self::with_pairing(set, Pairing::default(), width)
    }

    pub fn with_pairing(
        set: &ThresholdSet,
        pairing: Pairing,
        width: impl Into<ReadSignal<f64>>,
    ) -> Self {
        let width = width.into();
        let thresholds = Rc::new(SortedThresholds::normalize(set, pairing));

        let active_value = derived(cloned!(thresholds, width => move || {
            thresholds.active_value(width.get())
        }));
        let breakpoint = derived(cloned!(thresholds, active_value => move || {
            thresholds.breakpoint_for(active_value.get())
        }));
        let min = derived(cloned!(breakpoint => move || breakpoint.with(ActiveBreakpoint::is_min)));

        let statuses = Rc::new(StatusMap::new(thresholds.names()));
        let sync = render_effect(cloned!(breakpoint, statuses => move || {
            let active = breakpoint.get();
            untrack(|| statuses.sync(&active));
        }));

        tracing::debug!(
            breakpoints = thresholds.names().len(),
            ?pairing,
            width = width.peek(),
            active = %breakpoint.peek(),
            "breakpoint resolver created"
        );

        Self {
            thresholds,
            width,
            active_value,
            breakpoint,
            min,
            statuses,
            _sync: sync,
        }
    }

    /// The active breakpoint name, or `"min"`.
    pub fn breakpoint(&self) -> &Derived<ActiveBreakpoint> {
        &self.breakpoint
    }

    /// True while no threshold applies.
    pub fn min(&self) -> &Derived<bool> {
        &self.min
    }

    /// The threshold value selected for the current width, 0 when none.
    pub fn active_value(&self) -> &Derived<f64> {
        &self.active_value
    }

    /// Read-only flag for one configured breakpoint.
    pub fn status(&self, name: &str) -> Option<ReadSignal<bool>> {
        self.statuses.get(name)
    }

    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    pub fn thresholds(&self) -> &SortedThresholds {
        &self.thresholds
    }

    pub fn width(&self) -> &ReadSignal<f64> {
        &self.width
    }

    /// A new, independent view of the active breakpoint.
    ///
    /// `min_value` and `overrides` are stored on the view but do not change
    /// what it reports.
    pub fn filter(&self, min_value: Option<f64>, overrides: Option<ThresholdSet>) -> FilteredView {
        FilteredView::new(&self.breakpoint, min_value, overrides)
    }
}

impl fmt::Debug for BreakpointResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointResolver")
            .field("width", &self.width.peek())
            .field("breakpoint", &self.breakpoint.peek())
            .field("statuses", &self.statuses)
            .finish_non_exhaustive()
    }
}

/// Build a resolver from `explicit` thresholds, falling back to the
/// provider's when none are given. The provider's pairing applies either way.
///
/// ```
/// use spark_breakpoints::{signal, use_breakpoint, BreakpointConfig};
///
/// let width = signal(1300.0);
/// let resolver = use_breakpoint(None, &BreakpointConfig::default(), &width).unwrap();
/// assert_eq!(resolver.breakpoint().get(), "xl");
/// ```
pub fn use_breakpoint<P>(
    explicit: Option<ThresholdSet>,
    provider: &P,
    width: impl Into<ReadSignal<f64>>,
) -> Result<BreakpointResolver, ConfigurationError>
where
    P: ConfigProvider + ?Sized,
{
    let set = match explicit {
        Some(set) => set,
        None => provider.breakpoints()?,
    };
    Ok(BreakpointResolver::with_pairing(&set, provider.pairing(), width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::signal::signal;

    fn standard() -> ThresholdSet {
        ThresholdSet::from_pairs([("sm", 576.0), ("md", 768.0), ("lg", 992.0)]).unwrap()
    }

    #[test]
    fn statuses_are_synced_at_construction() {
        let width = signal(800.0);
        let resolver = BreakpointResolver::new(&standard(), &width);

        assert_eq!(resolver.statuses().active(), Some("md"));
        assert_eq!(resolver.status("md").map(|s| s.get()), Some(true));
    }

    #[test]
    fn active_value_follows_width() {
        let width = signal(0.0);
        let resolver = BreakpointResolver::new(&standard(), &width);
        assert_eq!(resolver.active_value().get(), 0.0);

        width.set(991.0);
        assert_eq!(resolver.active_value().get(), 768.0);
        width.set(992.0);
        assert_eq!(resolver.active_value().get(), 992.0);
    }

    #[test]
    fn width_changes_inside_one_step_keep_the_breakpoint_cached() {
        let width = signal(800.0);
        let resolver = BreakpointResolver::new(&standard(), &width);
        let before = resolver.breakpoint().get();

        width.set(900.0);
        assert_eq!(resolver.breakpoint().get(), before);
        assert_eq!(resolver.active_value().get(), 768.0);
    }

    #[test]
    fn dropping_resolver_releases_width() {
        let width = signal(800.0);
        let resolver = BreakpointResolver::new(&standard(), &width);
        assert_eq!(width.reaction_count(), 1);

        drop(resolver);
        assert_eq!(width.reaction_count(), 0);
    }

    #[test]
    fn filter_keeps_its_arguments() {
        let width = signal(800.0);
        let resolver = BreakpointResolver::new(&standard(), &width);
        let overrides = ThresholdSet::from_pairs([("tablet", 600.0)]).unwrap();
        let view = resolver.filter(Some(320.0), Some(overrides.clone()));

        assert_eq!(view.min_value(), Some(320.0));
        assert_eq!(view.overrides(), Some(&overrides));
        assert_eq!(view.get(), "md");
    }

    #[test]
    fn debug_lists_current_state() {
        let width = signal(600.0);
        let resolver = BreakpointResolver::new(&standard(), &width);
        let out = format!("{resolver:?}");
        assert!(out.contains("width: 600.0"));
        assert!(out.contains("\"sm\": true"));
    }
}
