// ============================================================================
// spark-breakpoints - Macros
// ============================================================================

/// Clone the listed handles, then evaluate `$e` (usually a `move` closure)
/// with the clones in scope.
///
/// ```
/// use spark_breakpoints::{cloned, derived, signal};
///
/// let width = signal(800.0);
/// let height = signal(600.0);
/// let landscape = derived(cloned!(width, height => move || width.get() > height.get()));
///
/// assert!(landscape.get());
/// height.set(1000.0);
/// assert!(!landscape.get());
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {{
        $( let $n = $n.clone(); )+
        $e
    }};
}
