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

use crate::error::{CheckError, Result};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CHECK_TIMEOUT: TimeoutValue = TimeoutValue::from_secs(10);

/// Time budget for a whole check, from dial to the last comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutValue {
    Finite(Duration),
    Infinite,
}

impl TimeoutValue {
    pub const fn from_secs(seconds: u64) -> Self {
        Self::Finite(Duration::from_secs(seconds))
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            TimeoutValue::Finite(duration) => Some(*duration),
            TimeoutValue::Infinite => None,
        }
    }
}

impl fmt::Display for TimeoutValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutValue::Infinite => f.write_str("infinite"),
            TimeoutValue::Finite(duration) => write!(f, "{}s", duration.as_secs()),
        }
    }
}

/// Parses a timeout given as whole seconds or the word `infinite`.
pub fn parse_timeout(value: &str) -> Result<TimeoutValue> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("infinite") {
        return Ok(TimeoutValue::Infinite);
    }

    match trimmed.parse::<u64>() {
        Ok(0) => Err(CheckError::Config(
            "timeout must be greater than zero".to_string(),
        )),
        Ok(seconds) => Ok(TimeoutValue::from_secs(seconds)),
        Err(_) => Err(CheckError::Config(format!(
            "timeout value '{trimmed}' is invalid. Use an integer number of seconds or the word \
             'infinite'."
        ))),
    }
}

/// Resolves the effective timeout with CLI > check entry > suite defaults precedence.
pub struct TimeoutResolver<'a> {
    cli_override: Option<&'a str>,
    entry_secs: Option<u64>,
    default_value: TimeoutValue,
}

impl<'a> TimeoutResolver<'a> {
    pub fn new(
        cli_override: Option<&'a str>,
        entry_secs: Option<u64>,
        default_value: TimeoutValue,
    ) -> Self {
        Self {
            cli_override,
            entry_secs,
            default_value,
        }
    }

    pub fn resolve(self) -> Result<TimeoutValue> {
        if let Some(cli_value) = self.cli_override {
            return parse_timeout(cli_value);
        }

        if let Some(seconds) = self.entry_secs {
            return parse_timeout(&seconds.to_string());
        }

        Ok(self.default_value)
    }
}
