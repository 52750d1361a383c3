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

//! Cancellation and deadline handling shared by every network step of a check.

mod cancellation;
mod timeout;

pub use cancellation::{CancellationToken, signal_token};
pub use timeout::{DEFAULT_CHECK_TIMEOUT, TimeoutResolver, TimeoutValue, parse_timeout};

use std::fmt;
use std::time::{Duration, Instant};

/// Longest a blocking data read may wait before the token is polled again.
pub const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(250);

// Sockets reject a zero timeout.
const MIN_IO_TIMEOUT: Duration = Duration::from_millis(1);

/// Why a check stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Cancelled,
    DeadlineExceeded,
}

impl fmt::Display for Interruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interruption::Cancelled => write!(f, "check cancelled"),
            Interruption::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Deadline plus cancellation token bounding one check invocation.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl CheckContext {
    /// A context with no deadline that is only stopped through `token`.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            deadline: None,
            token,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(CancellationToken::new()).timeout(TimeoutValue::Finite(timeout))
    }

    /// Starts the clock for `timeout` from now.
    pub fn timeout(mut self, timeout: TimeoutValue) -> Self {
        self.deadline = timeout
            .as_duration()
            .and_then(|duration| Instant::now().checked_add(duration));
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Time left before the deadline; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn ensure_active(&self) -> Result<(), Interruption> {
        if self.token.is_cancelled() {
            return Err(Interruption::Cancelled);
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(Interruption::DeadlineExceeded);
        }
        Ok(())
    }

    /// Socket timeout for control-channel operations; the minimum once cancelled.
    pub fn io_timeout(&self) -> Option<Duration> {
        if self.is_cancelled() {
            return Some(MIN_IO_TIMEOUT);
        }
        self.remaining().map(|left| left.max(MIN_IO_TIMEOUT))
    }

    /// Socket timeout for data reads, short enough to notice cancellation.
    pub fn poll_timeout(&self) -> Duration {
        match self.remaining() {
            Some(left) => left.clamp(MIN_IO_TIMEOUT, CANCEL_POLL_INTERVAL),
            None => CANCEL_POLL_INTERVAL,
        }
    }
}
