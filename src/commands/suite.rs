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

use crate::check::FileCheck;
use crate::config::SuiteConfig;
use crate::context::signal_token;
use crate::error::Result;
use crate::ftp::{FtpConnector, SuppaFtpConnector};
use crate::suite::formatters::{format_human_readable, format_json};
use crate::suite::{SuiteRunner, SuiteSummary};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

pub struct SuiteCommand<C = SuppaFtpConnector> {
    config: SuiteConfig,
    connector: C,
}

impl SuiteCommand<SuppaFtpConnector> {
    pub fn new(path: &Path) -> Result<Self> {
        Ok(Self::with_connector(
            SuiteConfig::load(path)?,
            SuppaFtpConnector::new(),
        ))
    }
}

impl<C: FtpConnector + Clone> SuiteCommand<C> {
    pub fn with_connector(config: SuiteConfig, connector: C) -> Self {
        Self { config, connector }
    }

    pub fn execute(&self, json: bool, verbose: bool, timeout: Option<&str>) -> Result<i32> {
        self.execute_to(&mut std::io::stdout(), json, verbose, timeout)
    }

    pub fn execute_to<W: Write>(
        &self,
        writer: &mut W,
        json: bool,
        verbose: bool,
        timeout: Option<&str>,
    ) -> Result<i32> {
        let start = Instant::now();

        let runner = SuiteRunner::new(
            &self.config,
            FileCheck::with_connector(self.connector.clone()),
            signal_token(),
        );
        let outcomes = runner.run(timeout)?;

        let summary = SuiteSummary::from_outcomes(&outcomes, start.elapsed());

        if json {
            format_json(writer, &outcomes, &summary)?;
        } else {
            format_human_readable(writer, &outcomes, &summary, verbose)?;
        }

        Ok(summary.determine_exit_code())
    }
}
