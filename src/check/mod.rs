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

//! The FTP file check: connect, log in, download one file, compare.


use crate::context::CheckContext;
use crate::criteria::Criteria;
use crate::error::{CheckError, Result};
use crate::ftp::{
    FtpConnector, FtpSession, LoginPolicy, SuppaFtpConnector, TransferGuard, normalize_target,
};
use log::{debug, info};
use serde::Serialize;

/// Everything one invocation needs besides its context.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub target: String,
    pub remote_path: String,
    pub username: String,
    pub password: String,
    pub criteria: Criteria,
}

impl CheckRequest {
    /// Anonymous request with no criteria beyond retrieval.
    pub fn new(target: impl Into<String>, remote_path: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            remote_path: remote_path.into(),
            username: String::new(),
            password: String::new(),
            criteria: Criteria::default(),
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub success: bool,
    pub reason: String,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            success: true,
            reason: String::new(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: reason.into(),
        }
    }
}

impl From<&Result<()>> for CheckResult {
    fn from(outcome: &Result<()>) -> Self {
        match outcome {
            Ok(()) => CheckResult::pass(),
            Err(e) => CheckResult::fail(e.to_string()),
        }
    }
}

pub struct FileCheck<C = SuppaFtpConnector> {
    connector: C,
}

impl FileCheck<SuppaFtpConnector> {
    pub fn new() -> Self {
        Self::with_connector(SuppaFtpConnector::new())
    }
}

impl Default for FileCheck<SuppaFtpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FtpConnector> FileCheck<C> {
    pub fn with_connector(connector: C) -> Self {
        Self { connector }
    }

    /// Runs the check; every failure becomes an unsuccessful result.
    pub fn run(&self, ctx: &CheckContext, request: &CheckRequest) -> CheckResult {
        let outcome = self.execute(ctx, request);
        if let Err(e) = &outcome {
            info!(
                "Check of {} on {} failed at {}: {e}",
                request.remote_path,
                request.target,
                e.stage()
            );
        }
        CheckResult::from(&outcome)
    }

    /// Runs the check and returns the first failure as a typed error.
    pub fn execute(&self, ctx: &CheckContext, request: &CheckRequest) -> Result<()> {
        let address = normalize_target(&request.target);

        ctx.ensure_active()
            .map_err(|interruption| CheckError::Connection(interruption.to_string()))?;
        let mut session = self.connector.connect(&address, ctx)?;

        let outcome = fetch_and_compare(session.as_mut(), ctx, request);

        if ctx.ensure_active().is_ok() {
            session.quit();
        }

        outcome
    }
}

fn fetch_and_compare(
    session: &mut dyn FtpSession,
    ctx: &CheckContext,
    request: &CheckRequest,
) -> Result<()> {
    let policy = LoginPolicy::from_credentials(&request.username, &request.password);
    debug!("Logging in to {} as {policy}", request.target);
    let (username, password) = policy.credentials();
    session.login(username, password)?;

    let mut transfer = TransferGuard::new(
        session.retrieve(&request.remote_path, ctx)?,
        request.remote_path.as_str(),
    );
    let body = transfer.read_to_end(ctx)?;
    transfer.release()?;

    request.criteria.evaluate(&body)
}

/// Runs one check with the default `suppaftp` connector.
pub fn run_check(ctx: &CheckContext, request: &CheckRequest) -> CheckResult {
    FileCheck::new().run(ctx, request)
}
