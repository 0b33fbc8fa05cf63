// ============================================================================
// spark-breakpoints - Active Breakpoint
// ============================================================================

use std::fmt;
use std::rc::Rc;

/// Name reported when the width is below every threshold.
pub const MIN: &str = "min";

/// The breakpoint that currently applies to the viewport width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ActiveBreakpoint {
    /// No threshold applies.
    #[default]
    Min,
    /// A configured breakpoint name.
    Named(Rc<str>),
}

impl ActiveBreakpoint {
    /// The name, or `"min"` for the sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            ActiveBreakpoint::Min => MIN,
            ActiveBreakpoint::Named(name) => name.as_ref(),
        }
    }

    pub fn is_min(&self) -> bool {
        matches!(self, ActiveBreakpoint::Min)
    }

    /// The configured name, `None` for the sentinel.
    pub fn name(&self) -> Option<&str> {
        match self {
            ActiveBreakpoint::Min => None,
            ActiveBreakpoint::Named(name) => Some(name.as_ref()),
        }
    }
}

impl fmt::Display for ActiveBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for ActiveBreakpoint {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ActiveBreakpoint {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_reads_as_min() {
        let active = ActiveBreakpoint::Min;
        assert_eq!(active, "min");
        assert!(active.is_min());
        assert_eq!(active.name(), None);
        assert_eq!(active.to_string(), "min");
    }

    #[test]
    fn named_reads_as_its_name() {
        let active = ActiveBreakpoint::Named(Rc::from("md"));
        assert_eq!(active, "md");
        assert!(!active.is_min());
        assert_eq!(active.name(), Some("md"));
    }
}
