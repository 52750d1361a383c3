use crate::check::CheckRequest;
use crate::context::{DEFAULT_CHECK_TIMEOUT, TimeoutResolver, TimeoutValue};
use crate::criteria::CriteriaInput;
use crate::error::{CheckError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A TOML file describing checks to run in order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    #[serde(default)]
    pub defaults: SuiteDefaults,

    #[serde(default, rename = "check")]
    pub checks: Vec<SuiteEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteDefaults {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteEntry {
    pub name: String,
    pub target: String,
    pub path: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub criteria: CriteriaInput,
}

impl SuiteConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CheckError::Config(format!("cannot read suite file {}: {e}", path.display()))
        })?;
        let config: SuiteConfig = contents.parse()?;

        log::debug!(
            "Loaded {} check(s) from {}",
            config.checks.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn default_timeout(&self) -> TimeoutValue {
        self.defaults
            .timeout_secs
            .map(TimeoutValue::from_secs)
            .unwrap_or(DEFAULT_CHECK_TIMEOUT)
    }

    /// Timeout for `entry`, honoring a CLI override first.
    pub fn timeout_for(
        &self,
        entry: &SuiteEntry,
        cli_override: Option<&str>,
    ) -> Result<TimeoutValue> {
        TimeoutResolver::new(cli_override, entry.timeout_secs, self.default_timeout()).resolve()
    }

    fn validate(&self) -> Result<()> {
        if self.checks.is_empty() {
            return Err(CheckError::Config("suite contains no checks".to_string()));
        }
        if self.defaults.timeout_secs == Some(0) {
            return Err(CheckError::Config(
                "defaults.timeout_secs must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.checks {
            if !seen.insert(entry.name.as_str()) {
                return Err(CheckError::Config(format!(
                    "duplicate check name '{}'",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for SuiteConfig {
    type Err = CheckError;

    fn from_str(contents: &str) -> Result<Self> {
        let config: SuiteConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}

impl SuiteEntry {
    /// Validates criteria and builds the request for this entry.
    pub fn to_request(&self) -> Result<CheckRequest> {
        let criteria = self.criteria.parse().map_err(|e| match e {
            CheckError::Config(msg) => CheckError::Config(format!("check '{}': {msg}", self.name)),
            other => other,
        })?;

        Ok(CheckRequest::new(&self.target, &self.path)
            .with_credentials(&self.username, &self.password)
            .with_criteria(criteria))
    }
}
