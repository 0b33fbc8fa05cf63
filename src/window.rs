// ============================================================================
// spark-breakpoints - Window Size
// Width and height signals fed by whatever observes the viewport
// ============================================================================

use crate::primitives::signal::{signal_f64, ReadSignal, Signal};
use crate::reactivity::batching::batch;

/// Viewport dimensions as reactive values.
///
/// The host (a resize handler, a terminal SIGWINCH hook, a test) writes
/// through [`resize`](WindowSize::resize); everything else reads the
/// read-only signals.
///
/// ```
/// use spark_breakpoints::{BreakpointResolver, ThresholdSet, WindowSize};
///
/// let window = WindowSize::new(400.0, 300.0);
/// let set = ThresholdSet::from_pairs([("md", 768.0)]).unwrap();
/// let resolver = BreakpointResolver::new(&set, window.width());
///
/// window.resize(1024.0, 768.0);
/// assert_eq!(resolver.breakpoint().get(), "md");
/// ```
#[derive(Clone, Debug)]
pub struct WindowSize {
    width: Signal<f64>,
    height: Signal<f64>,
}

impl WindowSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: signal_f64(sanitize("width", width)),
            height: signal_f64(sanitize("height", height)),
        }
    }

    pub fn width(&self) -> ReadSignal<f64> {
        self.width.read_only()
    }

    pub fn height(&self) -> ReadSignal<f64> {
        self.height.read_only()
    }

    /// Set only the width. Returns true if it changed.
    pub fn set_width(&self, width: f64) -> bool {
        self.width.set(sanitize("width", width))
    }

    /// Set both dimensions; observers run once afterwards.
    pub fn resize(&self, width: f64, height: f64) -> bool {
        batch(|| {
            let width_changed = self.width.set(sanitize("width", width));
            let height_changed = self.height.set(sanitize("height", height));
            width_changed || height_changed
        })
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Dimensions are never negative or non-finite; bad input clamps to 0.
fn sanitize(dimension: &'static str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        return value + 0.0;
    }
    tracing::warn!(dimension, value, "invalid window dimension, clamping to 0");
    0.0
}
