// ============================================================================
// spark-breakpoints - Core Module
// Node flags, graph traits and the thread-local reactive context
// ============================================================================

pub mod constants;
pub mod context;
pub mod types;

pub use constants::NodeFlags;
pub use context::{is_batching, is_tracking, with_context, ReactiveContext};
pub use types::{default_equals, AnyReaction, AnySource, EqualsFn, SourceInner};
