//! Run configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Options applied when running a suite.
///
/// ```
/// use mailassert::RunConfig;
///
/// let config = RunConfig::from_json(r#"{ "filter": "recipient" }"#)?;
/// assert!(config.selects("have a@example.com as a to recipient"));
/// assert!(!config.selects("have subject"));
/// assert!(!config.fail_fast);
/// # Ok::<(), mailassert::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Only run checks whose name contains this string.
    pub filter: Option<String>,
    /// Stop at the first failing check.
    pub fail_fast: bool,
}

impl RunConfig {
    /// Environment variable holding a JSON run configuration.
    pub const ENV_VAR: &'static str = "MAILASSERT_CONFIG";

    /// Parses a JSON run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Reads the configuration from [`Self::ENV_VAR`], or the default when
    /// the variable is unset or empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable holds malformed JSON.
    pub fn from_env() -> Result<Self> {
        match std::env::var(Self::ENV_VAR) {
            Ok(json) if !json.trim().is_empty() => Self::from_json(&json),
            _ => Ok(Self::default()),
        }
    }

    /// Returns true if a check with this name should run.
    #[must_use]
    pub fn selects(&self, check_name: &str) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|filter| check_name.contains(filter))
    }
}
