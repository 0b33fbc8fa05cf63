// ============================================================================
// spark-breakpoints - Reactive Breakpoints for Rust
// ============================================================================
//
// Resolves a viewport width into the active layout breakpoint, with one
// reactive flag per breakpoint name. Ships its own single-threaded signal
// runtime so the outputs can be observed like any other reactive value.
// ============================================================================

#[macro_use]
mod macros;

pub mod breakpoint;
pub mod config;
pub mod core;
pub mod error;
pub mod primitives;
pub mod reactivity;
pub mod window;

// Reactive runtime
pub use crate::core::constants::NodeFlags;
pub use crate::core::context::{is_batching, is_tracking};
pub use primitives::derived::{derived, derived_with_equals, Derived};
pub use primitives::effect::{effect, render_effect, Effect};
pub use primitives::signal::{signal, signal_f64, signal_with_equals, ReadSignal, Signal};
pub use reactivity::batching::{batch, untrack};
pub use reactivity::equality::{never_equals, safe_equals_f64};
pub use reactivity::scheduling::flush_sync;

// Breakpoints
pub use breakpoint::{
    use_breakpoint, ActiveBreakpoint, BreakpointResolver, FilteredView, Pairing,
    SortedThresholds, StatusMap, ThresholdSet, MIN, RESERVED_NAMES,
};
pub use config::{BreakpointConfig, ConfigProvider, DEFAULT_BREAKPOINTS};
pub use error::ConfigurationError;
pub use window::WindowSize;
