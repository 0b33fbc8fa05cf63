// ============================================================================
// spark-breakpoints - Thresholds
// Validated breakpoint definitions and their sorted lookup form
// ============================================================================

use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::active::{ActiveBreakpoint, MIN};
use crate::error::ConfigurationError;

/// Names that would collide with the resolver's own outputs.
pub const RESERVED_NAMES: [&str; 3] = ["breakPoint", MIN, "filter"];

// =============================================================================
// PAIRING
// =============================================================================

/// How threshold values are matched back to names after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pairing {
    /// Sorted values are zipped with names in their declaration order.
    ///
    /// Matches the long-standing behavior of the component library: a set
    /// declared out of value order, such as `{ lg: 992, sm: 576 }`, maps
    /// 576 to `lg` and 992 to `sm`.
    #[default]
    Positional,
    /// Each name keeps its own value; pairs are stably sorted by value.
    ByName,
}

// =============================================================================
// THRESHOLD SET
// =============================================================================

/// Breakpoint names and their minimum widths, in declaration order.
///
/// Names are unique, non-empty and not reserved; values are finite and
/// non-negative.
///
/// ```
/// use spark_breakpoints::ThresholdSet;
///
/// let set = ThresholdSet::from_pairs([("sm", 576.0), ("md", 768.0)]).unwrap();
/// assert_eq!(set.get("md"), Some(768.0));
/// assert!(ThresholdSet::from_pairs([("min", 0.0)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThresholdSet {
    entries: IndexMap<String, f64>,
}

impl ThresholdSet {
    /// An empty set. Resolvers built on it always report `"min"`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, N>(pairs: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (N, f64)>,
        N: Into<String>,
    {
        let mut entries = IndexMap::new();
        for (name, value) in pairs {
            let name = name.into();
            validate(&name, value)?;
            if entries.contains_key(&name) {
                return Err(ConfigurationError::DuplicateName { name });
            }
            // Fold -0.0 into 0.0 so equal thresholds compare equal bitwise
            entries.insert(name, value + 0.0);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl TryFrom<IndexMap<String, f64>> for ThresholdSet {
    type Error = ConfigurationError;

    fn try_from(map: IndexMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_pairs(map)
    }
}

fn validate(name: &str, value: f64) -> Result<(), ConfigurationError> {
    if name.is_empty() {
        return Err(ConfigurationError::EmptyName);
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(ConfigurationError::ReservedName {
            name: name.to_string(),
        });
    }
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigurationError::InvalidThreshold {
            name: name.to_string(),
            value,
        });
    }
    Ok(())
}

// =============================================================================
// SORTED THRESHOLDS
// =============================================================================

/// Threshold values in ascending order with a value → name lookup.
///
/// Built once per resolver and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedThresholds {
    values: Vec<f64>,
    /// One entry per distinct value, ascending
    lookup: Vec<(f64, Rc<str>)>,
    names: Vec<Rc<str>>,
    pairing: Pairing,
}

impl SortedThresholds {
    pub fn normalize(set: &ThresholdSet, pairing: Pairing) -> Self {
        let names: Vec<Rc<str>> = set.names().map(Rc::from).collect();

        let mut values: Vec<f64> = set.iter().map(|(_, value)| value).collect();
        values.sort_by(f64::total_cmp);

        let ordered: Vec<(f64, Rc<str>)> = match pairing {
            Pairing::Positional => values.iter().copied().zip(names.iter().cloned()).collect(),
            Pairing::ByName => {
                let mut pairs: Vec<(f64, Rc<str>)> = set
                    .iter()
                    .map(|(name, value)| (value, Rc::from(name)))
                    .collect();
                pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
                pairs
            }
        };

        // Equal values: the later pairing wins
        let mut lookup: Vec<(f64, Rc<str>)> = Vec::with_capacity(ordered.len());
        for (value, name) in ordered {
            match lookup.last_mut() {
                Some(last) if last.0 == value => last.1 = name,
                _ => lookup.push((value, name)),
            }
        }

        Self {
            values,
            lookup,
            names,
            pairing,
        }
    }

    /// Ascending threshold values, duplicates kept.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Configured names in declaration order.
    pub fn names(&self) -> &[Rc<str>] {
        &self.names
    }

    pub fn pairing(&self) -> Pairing {
        self.pairing
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name paired with an exact threshold value.
    pub fn name_for(&self, value: f64) -> Option<&Rc<str>> {
        self.lookup
            .binary_search_by(|(v, _)| v.total_cmp(&value))
            .ok()
            .map(|idx| &self.lookup[idx].1)
    }

    /// Largest threshold not above `width`, or 0 when none qualifies.
    pub fn active_value(&self, width: f64) -> f64 {
        let qualifying = self.values.partition_point(|v| *v <= width);
        match qualifying {
            0 => 0.0,
            n => self.values[n - 1],
        }
    }

    /// The breakpoint for a threshold value picked by [`active_value`].
    ///
    /// [`active_value`]: SortedThresholds::active_value
    pub fn breakpoint_for(&self, value: f64) -> ActiveBreakpoint {
        self.name_for(value)
            .map(|name| ActiveBreakpoint::Named(name.clone()))
            .unwrap_or(ActiveBreakpoint::Min)
    }

    pub fn resolve(&self, width: f64) -> ActiveBreakpoint {
        self.breakpoint_for(self.active_value(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, f64)]) -> ThresholdSet {
        ThresholdSet::from_pairs(pairs.iter().map(|(n, v)| (*n, *v))).unwrap()
    }

    #[test]
    fn rejects_reserved_names() {
        for name in RESERVED_NAMES {
            let err = ThresholdSet::from_pairs([(name, 100.0)]).unwrap_err();
            assert!(matches!(err, ConfigurationError::ReservedName { .. }));
        }
    }

    #[test]
    fn rejects_duplicates() {
        let err = ThresholdSet::from_pairs([("md", 768.0), ("md", 800.0)]).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateName { name } if name == "md"));
    }

    #[test]
    fn rejects_empty_names_and_bad_values() {
        assert!(matches!(
            ThresholdSet::from_pairs([("", 1.0)]),
            Err(ConfigurationError::EmptyName)
        ));
        for value in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ThresholdSet::from_pairs([("sm", value)]),
                Err(ConfigurationError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn keeps_declaration_order() {
        let s = set(&[("lg", 992.0), ("sm", 576.0), ("md", 768.0)]);
        assert_eq!(s.names().collect::<Vec<_>>(), vec!["lg", "sm", "md"]);
    }

    #[test]
    fn positional_pairing_zips_sorted_values_with_declared_names() {
        let sorted = SortedThresholds::normalize(&set(&[("lg", 992.0), ("sm", 576.0)]), Pairing::Positional);

        assert_eq!(sorted.values(), &[576.0, 992.0]);
        assert_eq!(sorted.name_for(576.0).map(|n| &**n), Some("lg"));
        assert_eq!(sorted.name_for(992.0).map(|n| &**n), Some("sm"));
        assert_eq!(sorted.resolve(600.0), "lg");
    }

    #[test]
    fn by_name_pairing_keeps_each_name_with_its_value() {
        let sorted = SortedThresholds::normalize(&set(&[("lg", 992.0), ("sm", 576.0)]), Pairing::ByName);

        assert_eq!(sorted.resolve(600.0), "sm");
        assert_eq!(sorted.resolve(1000.0), "lg");
    }

    #[test]
    fn pairings_agree_on_ascending_input() {
        let s = set(&[("sm", 576.0), ("md", 768.0), ("lg", 992.0)]);
        let positional = SortedThresholds::normalize(&s, Pairing::Positional);
        let by_name = SortedThresholds::normalize(&s, Pairing::ByName);

        for width in [0.0, 575.0, 576.0, 700.0, 768.0, 991.9, 992.0, 5000.0] {
            assert_eq!(positional.resolve(width), by_name.resolve(width));
        }
    }

    #[test]
    fn equal_values_last_pairing_wins() {
        let s = set(&[("a", 500.0), ("b", 500.0)]);
        for pairing in [Pairing::Positional, Pairing::ByName] {
            let sorted = SortedThresholds::normalize(&s, pairing);
            assert_eq!(sorted.resolve(600.0), "b");
            assert_eq!(sorted.values(), &[500.0, 500.0]);
        }
    }

    #[test]
    fn width_equal_to_threshold_selects_it() {
        let sorted = SortedThresholds::normalize(&set(&[("md", 768.0)]), Pairing::default());
        assert_eq!(sorted.resolve(767.99), "min");
        assert_eq!(sorted.resolve(768.0), "md");
    }

    #[test]
    fn zero_threshold_covers_small_widths() {
        let sorted = SortedThresholds::normalize(&set(&[("xs", 0.0), ("sm", 576.0)]), Pairing::default());
        assert_eq!(sorted.resolve(0.0), "xs");
        assert_eq!(sorted.resolve(300.0), "xs");
        assert_eq!(sorted.resolve(-0.0), "xs");
    }

    #[test]
    fn empty_set_is_always_min() {
        let sorted = SortedThresholds::normalize(&ThresholdSet::empty(), Pairing::default());
        assert!(sorted.is_empty());
        assert_eq!(sorted.active_value(10_000.0), 0.0);
        assert_eq!(sorted.resolve(10_000.0), ActiveBreakpoint::Min);
    }

    #[test]
    fn nan_width_selects_nothing() {
        let sorted = SortedThresholds::normalize(&set(&[("sm", 576.0)]), Pairing::default());
        assert_eq!(sorted.active_value(f64::NAN), 0.0);
        assert_eq!(sorted.resolve(f64::NAN), "min");
    }
}
