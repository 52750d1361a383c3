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

use crate::suite::{SuiteOutcome, SuiteSummary};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

pub fn format_human_readable<W: Write>(
    writer: &mut W,
    outcomes: &[SuiteOutcome],
    summary: &SuiteSummary,
    verbose: bool,
) -> std::io::Result<()> {
    writeln!(writer, "\nFTP Check Report")?;
    writeln!(writer, "================")?;
    writeln!(writer)?;

    for outcome in outcomes {
        write_outcome_line(writer, outcome)?;

        if verbose {
            writeln!(writer, "    Target: {}", outcome.target)?;
            writeln!(writer, "    Duration: {:?}", outcome.duration)?;
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Summary")?;
    writeln!(writer, "-------")?;
    writeln!(
        writer,
        "Total checks: {} (✓ {} passed, ✗ {} failed)",
        summary.total_checks, summary.passed, summary.failed
    )?;
    writeln!(
        writer,
        "Total time: {:.2}s",
        summary.total_duration.as_secs_f64()
    )?;

    Ok(())
}

/// One line per check, plus the failure reason indented below it.
pub fn write_outcome_line<W: Write>(
    writer: &mut W,
    outcome: &SuiteOutcome,
) -> std::io::Result<()> {
    if outcome.result.success {
        writeln!(writer, "{} {} {}", "✓".green(), outcome.name, outcome.path)?;
    } else {
        writeln!(writer, "{} {} {}", "✗".red(), outcome.name, outcome.path)?;
        let stage = outcome
            .stage
            .map(|stage| format!("[{stage}] "))
            .unwrap_or_default();
        writeln!(writer, "    {stage}{}", outcome.result.reason)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonOutput {
    version: String,
    timestamp: DateTime<Utc>,
    summary: JsonSummary,
    checks: Vec<JsonCheck>,
}

#[derive(Serialize)]
struct JsonSummary {
    total_checks: usize,
    passed: usize,
    failed: usize,
    total_duration_ms: u128,
    exit_code: i32,
}

#[derive(Serialize)]
struct JsonCheck {
    name: String,
    target: String,
    path: String,
    success: bool,
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<String>,
    duration_ms: u128,
}

impl From<&SuiteOutcome> for JsonCheck {
    fn from(outcome: &SuiteOutcome) -> Self {
        Self {
            name: outcome.name.clone(),
            target: outcome.target.clone(),
            path: outcome.path.clone(),
            success: outcome.result.success,
            reason: outcome.result.reason.clone(),
            stage: outcome.stage.map(|stage| stage.to_string()),
            duration_ms: outcome.duration.as_millis(),
        }
    }
}

pub fn format_json<W: Write>(
    writer: &mut W,
    outcomes: &[SuiteOutcome],
    summary: &SuiteSummary,
) -> std::io::Result<()> {
    let output = JsonOutput {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        summary: JsonSummary {
            total_checks: summary.total_checks,
            passed: summary.passed,
            failed: summary.failed,
            total_duration_ms: summary.total_duration.as_millis(),
            exit_code: summary.determine_exit_code(),
        },
        checks: outcomes.iter().map(JsonCheck::from).collect(),
    };

    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckResult;
    use crate::error::Stage;
    use std::time::Duration;

    fn create_test_outcomes() -> Vec<SuiteOutcome> {
        vec![
            SuiteOutcome {
                name: "readme".to_string(),
                target: "ftp.example.com".to_string(),
                path: "/pub/readme.txt".to_string(),
                result: CheckResult::pass(),
                stage: None,
                duration: Duration::from_millis(120),
            },
            SuiteOutcome {
                name: "digest".to_string(),
                target: "ftp.example.com:2121".to_string(),
                path: "/pub/hello.txt".to_string(),
                result: CheckResult::fail("sha256 mismatch: expected \"aa\" got \"bb\""),
                stage: Some(Stage::Compare),
                duration: Duration::from_millis(80),
            },
        ]
    }

    #[test]
    fn test_human_readable_format() {
        colored::control::set_override(false);
        let outcomes = create_test_outcomes();
        let summary = SuiteSummary::from_outcomes(&outcomes, Duration::from_secs(1));

        let mut output = Vec::new();
        format_human_readable(&mut output, &outcomes, &summary, false).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("FTP Check Report"));
        assert!(output_str.contains("✓ readme /pub/readme.txt"));
        assert!(output_str.contains("✗ digest /pub/hello.txt"));
        assert!(output_str.contains("    [compare] sha256 mismatch"));
        assert!(output_str.contains("Total checks: 2 (✓ 1 passed, ✗ 1 failed)"));
        assert!(!output_str.contains("Duration:"));
    }

    #[test]
    fn test_verbose_human_format() {
        let outcomes = create_test_outcomes();
        let summary = SuiteSummary::from_outcomes(&outcomes, Duration::from_secs(1));

        let mut output = Vec::new();
        format_human_readable(&mut output, &outcomes, &summary, true).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("Duration:"));
        assert!(output_str.contains("Target: ftp.example.com:2121"));
    }

    #[test]
    fn test_json_format() {
        let outcomes = create_test_outcomes();
        let summary = SuiteSummary::from_outcomes(&outcomes, Duration::from_secs(1));

        let mut output = Vec::new();
        format_json(&mut output, &outcomes, &summary).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert!(json["version"].is_string());
        assert!(json["timestamp"].is_string());
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["summary"]["exit_code"], 1);
        assert!(json["checks"][0]["success"].as_bool().unwrap());
        assert_eq!(json["checks"][0]["reason"], "");
        assert!(json["checks"][0].get("stage").is_none());
        assert_eq!(json["checks"][1]["stage"], "compare");
    }
}
