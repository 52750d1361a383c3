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

use crate::error::CheckError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a CheckError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a CheckError) -> Self {
        let (suggestion, details) = match error {
            CheckError::Config(msg) => {
                let suggestion = Some(
                    "Criteria are 'key=value' pairs separated by ';' (e.g., \
                     'substring_match=hello;sha256=<hex>'). Supported keys: exists, \
                     substring_match, regex_match, match, sha256, sha1, md5."
                        .to_string(),
                );
                (suggestion, Some(format!("Rejected configuration: {msg}")))
            }
            CheckError::Connection(msg) => {
                let suggestion = if msg.contains("cancelled") {
                    None
                } else if msg.contains("timed out") || msg.contains("deadline") {
                    Some(
                        "Increase the timeout with --timeout or check that the host is reachable."
                            .to_string(),
                    )
                } else {
                    Some(
                        "Check the target host and port, and that an FTP server is listening \
                         there."
                            .to_string(),
                    )
                };
                (suggestion, None)
            }
            CheckError::Authentication(_) => (
                Some(
                    "Verify the username and password. Leave the username empty to log in \
                     anonymously."
                        .to_string(),
                ),
                None,
            ),
            CheckError::Retrieval(_) => (
                Some(
                    "Check that the remote path exists and is readable by the login user."
                        .to_string(),
                ),
                None,
            ),
            CheckError::Toml(e) => (
                Some("Check the suite file syntax.".to_string()),
                Some(format!("TOML parse error: {e}")),
            ),
            _ => (None, None),
        };

        Self {
            error,
            suggestion,
            details,
        }
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
