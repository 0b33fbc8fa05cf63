// ============================================================================
// spark-breakpoints - Breakpoint Module
// Threshold normalization, active-breakpoint derivation and status flags
// ============================================================================

pub mod active;
pub mod resolver;
pub mod status;
pub mod thresholds;
pub mod view;

pub use active::{ActiveBreakpoint, MIN};
pub use resolver::{use_breakpoint, BreakpointResolver};
pub use status::StatusMap;
pub use thresholds::{Pairing, SortedThresholds, ThresholdSet, RESERVED_NAMES};
pub use view::FilteredView;
