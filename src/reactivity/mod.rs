// ============================================================================
// spark-breakpoints - Reactivity Module
// Dependency tracking, staleness propagation, batching and effect scheduling
// ============================================================================

pub mod batching;
pub mod equality;
pub mod scheduling;
pub mod tracking;

pub use batching::{batch, untrack};
pub use scheduling::{flush_effects, flush_sync, schedule_effect, MAX_FLUSH_PASSES};
pub use tracking::{
    install_dependencies, is_dirty, mark_reactions, notify_write, remove_reactions, run_tracked,
    track_read,
};
