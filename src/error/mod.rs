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

mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::{format_error_chain, format_error_with_color};

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to connect to target: {0}")]
    Connection(String),

    #[error("failed to login to target: {0}")]
    Authentication(String),

    #[error("failed to retrieve file: {0}")]
    Retrieval(String),

    #[error("failed to read file: {0}")]
    Read(String),

    #[error("{0}")]
    Comparison(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Connect,
    Login,
    Retrieve,
    Read,
    Compare,
    Other,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Config => write!(f, "config"),
            Stage::Connect => write!(f, "connect"),
            Stage::Login => write!(f, "login"),
            Stage::Retrieve => write!(f, "retrieve"),
            Stage::Read => write!(f, "read"),
            Stage::Compare => write!(f, "compare"),
            Stage::Other => write!(f, "other"),
        }
    }
}

impl CheckError {
    pub fn stage(&self) -> Stage {
        match self {
            CheckError::Config(_) | CheckError::Toml(_) | CheckError::Json(_) => Stage::Config,
            CheckError::Connection(_) => Stage::Connect,
            CheckError::Authentication(_) => Stage::Login,
            CheckError::Retrieval(_) => Stage::Retrieve,
            CheckError::Read(_) => Stage::Read,
            CheckError::Comparison(_) => Stage::Compare,
            CheckError::Io(_) => Stage::Other,
        }
    }
}
