// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expected-output criteria for a retrieved file.
//!
//! Criteria arrive as a loosely typed key-value map ([`RawCriteria`]) or as a
//! `key=value;key=value` string, and are validated once into [`Criteria`]
//! before any network activity happens.

mod spec_string;

pub use spec_string::parse_criteria_spec;

use crate::checksum::{DigestAlgorithm, verify_digest};
use crate::error::{CheckError, Result};
use log::debug;
use memchr::memmem;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

pub const EXISTS: &str = "exists";
pub const SUBSTRING_MATCH: &str = "substring_match";
pub const REGEX_MATCH: &str = "regex_match";
pub const MATCH: &str = "match";

const PREVIEW_CHARS: usize = 128;

/// Criteria as handed over by the caller, before validation.
pub type RawCriteria = BTreeMap<String, Value>;

/// Either accepted shape of criteria in a suite file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CriteriaInput {
    Spec(String),
    Map(RawCriteria),
}

impl Default for CriteriaInput {
    fn default() -> Self {
        CriteriaInput::Map(RawCriteria::new())
    }
}

impl CriteriaInput {
    pub fn parse(&self) -> Result<Criteria> {
        match self {
            CriteriaInput::Spec(spec) => spec.parse(),
            CriteriaInput::Map(raw) => parse_criteria(raw),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Criteria {
    /// Satisfied by a successful retrieval; never inspects content.
    pub exists: bool,
    pub substring_match: Option<String>,
    pub regex_match: Option<Regex>,
    pub exact_match: Option<String>,
    pub sha256: Option<String>,
    pub md5: Option<String>,
    pub sha1: Option<String>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Names of the configured criteria, in evaluation order.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.exists {
            keys.push(EXISTS);
        }
        if self.substring_match.is_some() {
            keys.push(SUBSTRING_MATCH);
        }
        if self.regex_match.is_some() {
            keys.push(REGEX_MATCH);
        }
        if self.exact_match.is_some() {
            keys.push(MATCH);
        }
        for algorithm in DigestAlgorithm::ALL {
            if self.expected_digest(algorithm).is_some() {
                keys.push(algorithm.key());
            }
        }
        keys
    }

    pub fn expected_digest(&self, algorithm: DigestAlgorithm) -> Option<&str> {
        match algorithm {
            DigestAlgorithm::Sha256 => self.sha256.as_deref(),
            DigestAlgorithm::Md5 => self.md5.as_deref(),
            DigestAlgorithm::Sha1 => self.sha1.as_deref(),
        }
    }

    /// Checks `body` against every configured criterion and reports the first failure.
    ///
    /// `substring_match` and `match` compare raw bytes; only `regex_match` and
    /// mismatch previews see the lossy UTF-8 view.
    pub fn evaluate(&self, body: &[u8]) -> Result<()> {
        let text = String::from_utf8_lossy(body);

        if let Some(expected) = &self.substring_match
            && memmem::find(body, expected.as_bytes()).is_none()
        {
            return Err(CheckError::Comparison(format!(
                "substring mismatch: expected {expected:?}"
            )));
        }

        if let Some(pattern) = &self.regex_match
            && !pattern.is_match(&text)
        {
            return Err(CheckError::Comparison(format!(
                "regex mismatch: expected {:?} got {:?}",
                pattern.as_str(),
                preview(&text)
            )));
        }

        if let Some(expected) = &self.exact_match
            && body != expected.as_bytes()
        {
            return Err(CheckError::Comparison(format!(
                "match mismatch: expected {expected:?} got {:?}",
                preview(&text)
            )));
        }

        for algorithm in DigestAlgorithm::ALL {
            if let Some(expected) = self.expected_digest(algorithm) {
                verify_digest(algorithm, body, expected)?;
            }
        }

        Ok(())
    }
}

impl FromStr for Criteria {
    type Err = CheckError;

    fn from_str(spec: &str) -> Result<Self> {
        parse_criteria(&parse_criteria_spec(spec)?)
    }
}

/// Validates a raw criteria map into [`Criteria`].
///
/// Unknown keys are skipped. A known key with a value of the wrong type, or an
/// unparseable regex, is a configuration error.
pub fn parse_criteria(raw: &RawCriteria) -> Result<Criteria> {
    let mut criteria = Criteria::default();

    for (key, value) in raw {
        match key.as_str() {
            EXISTS => criteria.exists = true,
            SUBSTRING_MATCH => criteria.substring_match = Some(expect_string(key, value)?),
            REGEX_MATCH => {
                let pattern = expect_string(key, value)?;
                let regex = Regex::new(&pattern).map_err(|e| {
                    CheckError::Config(format!("invalid regex pattern {pattern:?}: {e}"))
                })?;
                criteria.regex_match = Some(regex);
            }
            MATCH => criteria.exact_match = Some(expect_string(key, value)?),
            "sha256" => criteria.sha256 = Some(expect_string(key, value)?),
            "md5" => criteria.md5 = Some(expect_string(key, value)?),
            "sha1" => criteria.sha1 = Some(expect_string(key, value)?),
            other => debug!("Ignoring unknown criterion '{other}'"),
        }
    }

    Ok(criteria)
}

fn expect_string(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(CheckError::Config(format!(
            "criterion '{key}' expects a string value, got {}",
            value_kind(other)
        ))),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a flag",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(PREVIEW_CHARS).collect();
    truncated.push_str("...");
    truncated
}
