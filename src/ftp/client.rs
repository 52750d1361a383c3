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

use crate::context::CheckContext;
use crate::error::{CheckError, Result};
use crate::ftp::watchdog::ControlWatchdog;
use crate::ftp::{FtpConnector, FtpSession, RemoteFile};
use log::{debug, info};
use std::fmt::Display;
use std::io::{self, Read};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use suppaftp::FtpStream;

/// Connector backed by the synchronous `suppaftp` client in passive mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppaFtpConnector;

impl SuppaFtpConnector {
    pub fn new() -> Self {
        Self
    }

    fn dial(addr: SocketAddr, ctx: &CheckContext) -> io::Result<TcpStream> {
        let stream = match ctx.io_timeout() {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        apply_timeouts(&stream, ctx)?;
        Ok(stream)
    }
}

impl FtpConnector for SuppaFtpConnector {
    fn connect(&self, address: &str, ctx: &CheckContext) -> Result<Box<dyn FtpSession>> {
        let addrs: Vec<SocketAddr> = address
            .to_socket_addrs()
            .map_err(|e| CheckError::Connection(format!("cannot resolve {address}: {e}")))?
            .collect();

        let mut last_error = format!("no addresses found for {address}");

        for addr in addrs {
            ctx.ensure_active()
                .map_err(|interruption| CheckError::Connection(interruption.to_string()))?;

            debug!("Dialing {addr}");
            let tcp = match Self::dial(addr, ctx) {
                Ok(tcp) => tcp,
                Err(e) => {
                    debug!("Dial to {addr} failed: {e}");
                    last_error = e.to_string();
                    continue;
                }
            };

            let watchdog = ControlWatchdog::spawn(&tcp, ctx)
                .map_err(|e| CheckError::Connection(e.to_string()))?;

            // Reads the server greeting under the socket timeouts set by `dial`.
            match FtpStream::connect_with_stream(tcp) {
                Ok(stream) => {
                    info!("Connected to {address} ({addr})");
                    return Ok(Box::new(SuppaFtpSession {
                        stream,
                        ctx: ctx.clone(),
                        _watchdog: watchdog,
                    }));
                }
                Err(e) => {
                    ctx.ensure_active()
                        .map_err(|interruption| CheckError::Connection(interruption.to_string()))?;
                    debug!("FTP handshake with {addr} failed: {e}");
                    last_error = e.to_string();
                }
            }
        }

        Err(CheckError::Connection(last_error))
    }
}

pub struct SuppaFtpSession {
    stream: FtpStream,
    ctx: CheckContext,
    _watchdog: ControlWatchdog,
}

impl FtpSession for SuppaFtpSession {
    fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.stream
            .login(username, password)
            .map_err(|e| CheckError::Authentication(interrupted_or(&self.ctx, e)))
    }

    fn retrieve<'a>(
        &'a mut self,
        path: &str,
        ctx: &CheckContext,
    ) -> Result<Box<dyn RemoteFile + 'a>> {
        ctx.ensure_active()
            .map_err(|interruption| CheckError::Retrieval(interruption.to_string()))?;
        apply_timeouts(self.stream.get_ref(), ctx)
            .map_err(|e| CheckError::Retrieval(e.to_string()))?;

        let data = self
            .stream
            .retr_as_stream(path)
            .map_err(|e| CheckError::Retrieval(interrupted_or(ctx, e)))?;
        data.get_ref()
            .set_read_timeout(Some(ctx.poll_timeout()))
            .map_err(|e| CheckError::Retrieval(e.to_string()))?;

        Ok(Box::new(SuppaRemoteFile {
            stream: &mut self.stream,
            data: Some(data),
            ctx: ctx.clone(),
        }))
    }

    fn quit(&mut self) {
        if let Err(e) = self.stream.quit() {
            debug!("QUIT failed: {e}");
        }
    }
}

struct SuppaRemoteFile<'a, R: Read> {
    stream: &'a mut FtpStream,
    data: Option<R>,
    ctx: CheckContext,
}

impl<R: Read> Read for SuppaRemoteFile<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.as_mut() {
            Some(data) => data.read(buf),
            None => Ok(0),
        }
    }
}

impl<R: Read> RemoteFile for SuppaRemoteFile<'_, R> {
    fn close(mut self: Box<Self>) -> Result<()> {
        let Some(data) = self.data.take() else {
            return Ok(());
        };

        // Cancellation or an expired deadline shrinks this to the minimum.
        apply_timeouts(self.stream.get_ref(), &self.ctx)
            .map_err(|e| CheckError::Read(e.to_string()))?;
        self.stream
            .finalize_retr_stream(data)
            .map_err(|e| {
                CheckError::Read(format!(
                    "transfer did not complete: {}",
                    interrupted_or(&self.ctx, e)
                ))
            })
    }
}

/// Reports the interruption instead of the I/O error it caused.
fn interrupted_or(ctx: &CheckContext, error: impl Display) -> String {
    match ctx.ensure_active() {
        Err(interruption) => interruption.to_string(),
        Ok(()) => error.to_string(),
    }
}

fn apply_timeouts(stream: &TcpStream, ctx: &CheckContext) -> io::Result<()> {
    let timeout = ctx.io_timeout();
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)
}
