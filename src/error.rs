// ============================================================================
// spark-breakpoints - Errors
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// A breakpoint configuration that cannot be used to build a resolver.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The name would shadow one of the resolver's own outputs.
    #[error("breakpoint name `{name}` is reserved (reserved names: breakPoint, min, filter)")]
    ReservedName { name: String },

    #[error("breakpoint `{name}` is defined more than once")]
    DuplicateName { name: String },

    #[error("breakpoint names must not be empty")]
    EmptyName,

    #[error("breakpoint `{name}` has threshold {value}; thresholds must be finite and non-negative")]
    InvalidThreshold { name: String, value: f64 },

    #[error("failed to read breakpoint config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid breakpoint config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize breakpoint config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_breakpoint() {
        let err = ConfigurationError::ReservedName {
            name: "min".to_string(),
        };
        assert!(err.to_string().contains("`min`"));

        let err = ConfigurationError::InvalidThreshold {
            name: "md".to_string(),
            value: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "breakpoint `md` has threshold -1; thresholds must be finite and non-negative"
        );
    }

    #[test]
    fn read_error_keeps_io_source() {
        let err = ConfigurationError::Read {
            path: PathBuf::from("breakpoints.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("breakpoints.toml"));
    }
}
