// ============================================================================
// spark-breakpoints - Primitives Module
// Signals, read-only signals, deriveds and effects
// ============================================================================

pub mod derived;
pub mod effect;
pub mod signal;

pub use derived::{derived, derived_with_equals, Derived, DerivedInner};
pub use effect::{effect, render_effect, Effect, EffectFn, EffectInner};
pub use signal::{signal, signal_f64, signal_with_equals, ReadSignal, Signal};
