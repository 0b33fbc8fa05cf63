// ============================================================================
// spark-breakpoints - Configuration
// Where default breakpoints come from when the caller supplies none
// ============================================================================

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::breakpoint::thresholds::{Pairing, ThresholdSet};
use crate::error::ConfigurationError;

/// Thresholds used when nothing else is configured.
pub const DEFAULT_BREAKPOINTS: [(&str, f64); 4] =
    [("sm", 576.0), ("md", 768.0), ("lg", 992.0), ("xl", 1200.0)];

/// Supplies breakpoint defaults to [`use_breakpoint`](crate::use_breakpoint).
pub trait ConfigProvider {
    fn breakpoints(&self) -> Result<ThresholdSet, ConfigurationError>;

    fn pairing(&self) -> Pairing {
        Pairing::default()
    }
}

/// Breakpoint settings, usually read from a TOML file:
///
/// ```toml
/// pairing = "by-name"
///
/// [breakpoints]
/// sm = 576
/// md = 768
/// ```
///
/// Table order is kept, since positional pairing depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakpointConfig {
    pub pairing: Pairing,
    pub breakpoints: IndexMap<String, f64>,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            pairing: Pairing::default(),
            breakpoints: DEFAULT_BREAKPOINTS
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }
}

impl BreakpointConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            breakpoints = config.breakpoints.len(),
            pairing = ?config.pairing,
            "loaded breakpoint config"
        );
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigurationError> {
        Ok(toml::to_string(self)?)
    }
}

impl ConfigProvider for BreakpointConfig {
    fn breakpoints(&self) -> Result<ThresholdSet, ConfigurationError> {
        ThresholdSet::try_from(self.breakpoints.clone())
    }

    fn pairing(&self) -> Pairing {
        self.pairing
    }
}

impl ConfigProvider for ThresholdSet {
    fn breakpoints(&self) -> Result<ThresholdSet, ConfigurationError> {
        Ok(self.clone())
    }
}
