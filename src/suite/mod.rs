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

use crate::check::{CheckRequest, CheckResult, FileCheck};
use crate::config::SuiteConfig;
use crate::context::{CancellationToken, CheckContext, TimeoutValue};
use crate::error::{Result, Stage};
use crate::ftp::FtpConnector;
use log::info;
use std::time::{Duration, Instant};

pub mod formatters;

#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub name: String,
    pub target: String,
    pub path: String,
    pub result: CheckResult,
    pub stage: Option<Stage>,
    pub duration: Duration,
}

impl SuiteOutcome {
    pub fn new(
        name: impl Into<String>,
        request: &CheckRequest,
        outcome: &Result<()>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            target: request.target.clone(),
            path: request.remote_path.clone(),
            result: CheckResult::from(outcome),
            stage: outcome.as_ref().err().map(|e| e.stage()),
            duration,
        }
    }
}

pub struct SuiteSummary {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration: Duration,
}

impl SuiteSummary {
    pub fn from_outcomes(outcomes: &[SuiteOutcome], total_duration: Duration) -> Self {
        let passed = outcomes.iter().filter(|o| o.result.success).count();

        Self {
            total_checks: outcomes.len(),
            passed,
            failed: outcomes.len() - passed,
            total_duration,
        }
    }

    pub fn determine_exit_code(&self) -> i32 {
        if self.failed > 0 { 1 } else { 0 }
    }
}

/// Runs every check of a suite, one after another.
pub struct SuiteRunner<'a, C: FtpConnector> {
    config: &'a SuiteConfig,
    check: FileCheck<C>,
    token: CancellationToken,
}

impl<'a, C: FtpConnector> SuiteRunner<'a, C> {
    pub fn new(config: &'a SuiteConfig, check: FileCheck<C>, token: CancellationToken) -> Self {
        Self {
            config,
            check,
            token,
        }
    }

    /// Every entry is validated before the first connection is made.
    pub fn run(&self, timeout_override: Option<&str>) -> Result<Vec<SuiteOutcome>> {
        let mut planned: Vec<(&str, CheckRequest, TimeoutValue)> = Vec::new();
        for entry in &self.config.checks {
            planned.push((
                entry.name.as_str(),
                entry.to_request()?,
                self.config.timeout_for(entry, timeout_override)?,
            ));
        }

        let mut outcomes = Vec::with_capacity(planned.len());
        for (name, request, timeout) in planned {
            let ctx = CheckContext::new(self.token.clone()).timeout(timeout);
            let start = Instant::now();
            let outcome = self.check.execute(&ctx, &request);
            let duration = start.elapsed();

            match &outcome {
                Ok(()) => info!("Check '{name}' passed in {duration:?}"),
                Err(e) => info!("Check '{name}' failed: {e}"),
            }
            outcomes.push(SuiteOutcome::new(name, &request, &outcome, duration));
        }

        Ok(outcomes)
    }
}
