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

//! Minimal passive-mode FTP server for end-to-end tests.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Point at which the server stops answering on the control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Silence {
    Greeting,
    AfterUser,
    AfterRetr,
}

#[derive(Default)]
struct ServerState {
    files: HashMap<String, Vec<u8>>,
    /// Paths that send a partial body, then go silent.
    stalled: HashMap<String, Vec<u8>>,
    /// Accepted (username, password) pairs; empty accepts everyone.
    accounts: Vec<(String, String)>,
    silence: Option<Silence>,
    logins: Mutex<Vec<(String, String)>>,
}

#[derive(Default)]
pub struct FakeFtpServerBuilder {
    state: ServerState,
}

impl FakeFtpServerBuilder {
    pub fn file(mut self, path: &str, body: &[u8]) -> Self {
        self.state.files.insert(path.to_string(), body.to_vec());
        self
    }

    pub fn stalled_file(mut self, path: &str, partial: &[u8]) -> Self {
        self.state.stalled.insert(path.to_string(), partial.to_vec());
        self
    }

    pub fn silent(mut self, silence: Silence) -> Self {
        self.state.silence = Some(silence);
        self
    }

    pub fn account(mut self, username: &str, password: &str) -> Self {
        self.state
            .accounts
            .push((username.to_string(), password.to_string()));
        self
    }

    pub fn start(self) -> FakeFtpServer {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(self.state);

        let shared = state.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = shared.clone();
                thread::spawn(move || {
                    let _ = serve(stream, &state);
                });
            }
        });

        FakeFtpServer { addr, state }
    }
}

pub struct FakeFtpServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
}

impl FakeFtpServer {
    pub fn builder() -> FakeFtpServerBuilder {
        FakeFtpServerBuilder::default()
    }

    /// `127.0.0.1:<port>` as accepted by the check target.
    pub fn target(&self) -> String {
        self.addr.to_string()
    }

    pub fn logins(&self) -> Vec<(String, String)> {
        self.state.logins.lock().unwrap().clone()
    }
}

const STALL: Duration = Duration::from_secs(5);

fn reply(writer: &mut TcpStream, line: &str) -> io::Result<()> {
    writer.write_all(format!("{line}\r\n").as_bytes())?;
    writer.flush()
}

/// Holds the connection open without replying.
fn go_silent() -> io::Result<()> {
    thread::sleep(STALL);
    Ok(())
}

fn serve(stream: TcpStream, state: &ServerState) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut username = String::new();
    let mut passive: Option<TcpListener> = None;

    if state.silence == Some(Silence::Greeting) {
        return go_silent();
    }
    reply(&mut writer, "220 fake ftp ready")?;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim_end();
        let (command, argument) = line.split_once(' ').unwrap_or((line, ""));

        match command.to_ascii_uppercase().as_str() {
            "USER" if state.silence == Some(Silence::AfterUser) => return go_silent(),
            "USER" => {
                username = argument.to_string();
                reply(&mut writer, "331 Password required")?;
            }
            "PASS" => {
                let password = argument.to_string();
                state
                    .logins
                    .lock()
                    .unwrap()
                    .push((username.clone(), password.clone()));

                let accepted = state.accounts.is_empty()
                    || state
                        .accounts
                        .iter()
                        .any(|(u, p)| *u == username && *p == password);
                if accepted {
                    reply(&mut writer, "230 Logged in")?;
                } else {
                    reply(&mut writer, "530 Login incorrect")?;
                }
            }
            "TYPE" => reply(&mut writer, "200 Type set")?,
            "PASV" => {
                let listener = TcpListener::bind("127.0.0.1:0")?;
                let port = listener.local_addr()?.port();
                reply(
                    &mut writer,
                    &format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})",
                        port / 256,
                        port % 256
                    ),
                )?;
                passive = Some(listener);
            }
            "RETR" if state.silence == Some(Silence::AfterRetr) => return go_silent(),
            "RETR" => {
                let Some(listener) = passive.take() else {
                    reply(&mut writer, "425 Use PASV first")?;
                    continue;
                };

                if let Some(body) = state.files.get(argument) {
                    reply(&mut writer, "150 Opening data connection")?;
                    let (mut data, _) = listener.accept()?;
                    data.write_all(body)?;
                    drop(data);
                    reply(&mut writer, "226 Transfer complete")?;
                } else if let Some(partial) = state.stalled.get(argument) {
                    reply(&mut writer, "150 Opening data connection")?;
                    let (mut data, _) = listener.accept()?;
                    data.write_all(partial)?;
                    data.flush()?;
                    thread::sleep(STALL);
                    return Ok(());
                } else {
                    reply(&mut writer, "550 Failed to open file")?;
                }
            }
            "QUIT" => {
                reply(&mut writer, "221 Goodbye")?;
                return Ok(());
            }
            _ => reply(&mut writer, "502 Command not implemented")?,
        }
    }
}
