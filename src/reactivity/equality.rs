// ============================================================================
// spark-breakpoints - Equality Functions
// ============================================================================

/// Equality for `f64` signals that treats NaN as equal to NaN.
///
/// IEEE 754 says `NaN != NaN`, which would make every NaN write look like a
/// change and re-run every dependent.
///
/// ```
/// use spark_breakpoints::reactivity::equality::safe_equals_f64;
///
/// assert!(safe_equals_f64(&768.0, &768.0));
/// assert!(!safe_equals_f64(&768.0, &992.0));
/// assert!(safe_equals_f64(&f64::NAN, &f64::NAN));
/// ```
pub fn safe_equals_f64(a: &f64, b: &f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b
}

/// Equality that never matches, so every write notifies.
pub fn never_equals<T>(_: &T, _: &T) -> bool {
    false
}
