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
use crate::context::{CheckContext, DEFAULT_CHECK_TIMEOUT, TimeoutResolver, signal_token};
use crate::criteria::{Criteria, RawCriteria, parse_criteria, parse_criteria_spec};
use crate::error::{CheckError, Result, Stage, get_exit_code};
use crate::ftp::{FtpConnector, SuppaFtpConnector};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// Flags of `ftpcheck check` once clap has parsed them.
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    pub target: String,
    pub path: String,
    pub username: String,
    pub password: String,
    pub criteria: Vec<String>,
    pub timeout: Option<String>,
    pub json: bool,
}

#[derive(Serialize)]
struct JsonCheckOutput<'a> {
    target: &'a str,
    path: &'a str,
    #[serde(flatten)]
    result: &'a CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<String>,
}

pub struct CheckCommand<C = SuppaFtpConnector> {
    check: FileCheck<C>,
}

impl CheckCommand<SuppaFtpConnector> {
    pub fn new() -> Self {
        Self::with_connector(SuppaFtpConnector::new())
    }
}

impl Default for CheckCommand<SuppaFtpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FtpConnector> CheckCommand<C> {
    pub fn with_connector(connector: C) -> Self {
        Self {
            check: FileCheck::with_connector(connector),
        }
    }

    /// Runs the check and returns the process exit code.
    ///
    /// Invalid flags are returned as errors before anything is dialed. With
    /// `--json` they are also reported as a failed result on stdout.
    pub fn execute(&self, args: &CheckArgs) -> Result<i32> {
        self.execute_to(&mut std::io::stdout(), args)
    }

    pub fn execute_to<W: Write>(&self, writer: &mut W, args: &CheckArgs) -> Result<i32> {
        let prepared = criteria_from_flags(&args.criteria).and_then(|criteria| {
            let timeout =
                TimeoutResolver::new(args.timeout.as_deref(), None, DEFAULT_CHECK_TIMEOUT)
                    .resolve()?;
            Ok((criteria, timeout))
        });
        let (criteria, timeout) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                if args.json {
                    let result = CheckResult::fail(e.to_string());
                    write_json(writer, args, &result, Some(e.stage()))?;
                }
                return Err(e);
            }
        };

        let request = CheckRequest::new(&args.target, &args.path)
            .with_credentials(&args.username, &args.password)
            .with_criteria(criteria);
        let ctx = CheckContext::new(signal_token()).timeout(timeout);

        log::debug!("Checking {} on {} with timeout {timeout}", args.path, args.target);
        let outcome = self.check.execute(&ctx, &request);
        let result = CheckResult::from(&outcome);
        let stage = outcome.as_ref().err().map(|e| e.stage());

        if args.json {
            write_json(writer, args, &result, stage)?;
        } else {
            write_human(writer, args, &result, stage)?;
        }

        Ok(match &outcome {
            Ok(()) => 0,
            Err(e) => get_exit_code(e),
        })
    }
}

/// Each `--criteria` flag is parsed on its own, then merged; a later key wins.
fn criteria_from_flags(flags: &[String]) -> Result<Criteria> {
    let mut raw = RawCriteria::new();
    for flag in flags {
        raw.extend(parse_criteria_spec(flag).map_err(|e| match e {
            CheckError::Config(msg) => CheckError::Config(format!("--criteria {flag:?}: {msg}")),
            other => other,
        })?);
    }
    parse_criteria(&raw)
}

fn write_human<W: Write>(
    writer: &mut W,
    args: &CheckArgs,
    result: &CheckResult,
    stage: Option<Stage>,
) -> Result<()> {
    if result.success {
        writeln!(writer, "{} {} {}", "✓".green(), args.target, args.path)?;
    } else {
        writeln!(writer, "{} {} {}", "✗".red(), args.target, args.path)?;
        if let Some(stage) = stage {
            writeln!(writer, "    [{stage}] {}", result.reason)?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(
    writer: &mut W,
    args: &CheckArgs,
    result: &CheckResult,
    stage: Option<Stage>,
) -> Result<()> {
    let output = JsonCheckOutput {
        target: &args.target,
        path: &args.path,
        result,
        stage: stage.map(|stage| stage.to_string()),
    };
    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)?;
    Ok(())
}
