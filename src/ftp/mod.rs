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

//! FTP access for checks
//!
//! This module hides the FTP client behind a small set of traits:
//! - [`FtpConnector`] dials a target and yields a session
//! - [`FtpSession`] logs in and opens file transfers
//! - [`RemoteFile`] streams one file and is closed exactly once
//!
//! The production implementation is backed by `suppaftp`.

mod client;
mod guard;
mod target;
mod watchdog;

pub use client::{SuppaFtpConnector, SuppaFtpSession};
pub use guard::TransferGuard;
pub use target::{ANONYMOUS, DEFAULT_FTP_PORT, LoginPolicy, normalize_target};

use crate::context::CheckContext;
use crate::error::Result;
use std::io::Read;

pub trait FtpConnector: Send + Sync {
    /// Dials `address` (`host:port`). Failures are `CheckError::Connection`.
    fn connect(&self, address: &str, ctx: &CheckContext) -> Result<Box<dyn FtpSession>>;
}

pub trait FtpSession {
    /// Failures are `CheckError::Authentication`.
    fn login(&mut self, username: &str, password: &str) -> Result<()>;

    /// Opens a download of `path`. Failures are `CheckError::Retrieval`.
    fn retrieve<'a>(
        &'a mut self,
        path: &str,
        ctx: &CheckContext,
    ) -> Result<Box<dyn RemoteFile + 'a>>;

    /// Best-effort goodbye; errors are logged, never reported.
    fn quit(&mut self);
}

pub trait RemoteFile: Read {
    /// Ends the transfer and waits for the server to confirm it.
    fn close(self: Box<Self>) -> Result<()>;
}
