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

//! Unblocks control-channel reads once a check is interrupted.
//!
//! `suppaftp` waits for replies with plain blocking reads. The watchdog owns a
//! clone of the control socket and shuts it down when the context is cancelled
//! or its deadline passes, so the pending read fails instead of hanging.

use crate::context::CheckContext;
use log::debug;
use std::io;
use std::net::{Shutdown, TcpStream};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};

pub(crate) struct ControlWatchdog {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ControlWatchdog {
    pub(crate) fn spawn(control: &TcpStream, ctx: &CheckContext) -> io::Result<Self> {
        let socket = control.try_clone()?;
        let ctx = ctx.clone();
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("ftp-control-watchdog".to_string())
            .spawn(move || {
                // Dropping the sender wakes this immediately with `Disconnected`.
                while let Err(RecvTimeoutError::Timeout) = stopped.recv_timeout(ctx.poll_timeout())
                {
                    if let Err(interruption) = ctx.ensure_active() {
                        debug!("Closing control connection: {interruption}");
                        if let Err(e) = socket.shutdown(Shutdown::Both) {
                            debug!("Control connection shutdown failed: {e}");
                        }
                        return;
                    }
                }
            })?;

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }
}

impl Drop for ControlWatchdog {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            debug!("Control watchdog panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CancellationToken;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    fn socket_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        (client, server)
    }

    #[test]
    fn test_cancel_unblocks_pending_read() {
        let (mut client, _server) = socket_pair();
        let token = CancellationToken::new();
        let _watchdog = ControlWatchdog::spawn(&client, &CheckContext::new(token.clone())).unwrap();

        let canceller = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            canceller.cancel();
        });

        let start = Instant::now();
        let mut buf = [0u8; 16];
        // A shut-down socket reads as EOF or fails; either way it returns.
        let _ = client.read(&mut buf);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_deadline_unblocks_pending_read() {
        let (mut client, _server) = socket_pair();
        let ctx = CheckContext::with_timeout(Duration::from_millis(100));
        let _watchdog = ControlWatchdog::spawn(&client, &ctx).unwrap();

        let start = Instant::now();
        let mut buf = [0u8; 16];
        let _ = client.read(&mut buf);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_drop_leaves_socket_open() {
        let (client, mut server) = socket_pair();
        let watchdog = ControlWatchdog::spawn(&client, &CheckContext::default()).unwrap();

        let start = Instant::now();
        drop(watchdog);
        assert!(start.elapsed() < Duration::from_secs(1));

        (&client).write_all(b"ok").unwrap();
        let mut buf = [0u8; 2];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ok");
    }
}
