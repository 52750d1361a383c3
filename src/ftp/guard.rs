use crate::context::CheckContext;
use crate::error::{CheckError, Result};
use crate::ftp::RemoteFile;
use log::{debug, warn};
use std::io::{ErrorKind, Read};

const READ_CHUNK_SIZE: usize = 8192;

/// Owns an open transfer and closes it on every exit path.
///
/// Call [`TransferGuard::release`] after a complete read to surface close
/// errors; otherwise the transfer is closed on drop and errors are logged.
pub struct TransferGuard<'a> {
    file: Option<Box<dyn RemoteFile + 'a>>,
    path: String,
}

impl<'a> TransferGuard<'a> {
    pub fn new(file: Box<dyn RemoteFile + 'a>, path: impl Into<String>) -> Self {
        Self {
            file: Some(file),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads the whole transfer, polling `ctx` between chunks and on socket timeouts.
    pub fn read_to_end(&mut self, ctx: &CheckContext) -> Result<Vec<u8>> {
        let Some(file) = self.file.as_mut() else {
            return Err(CheckError::Read(format!(
                "transfer of {} already released",
                self.path
            )));
        };

        let mut body = Vec::new();
        let mut buffer = vec![0u8; READ_CHUNK_SIZE];

        loop {
            ctx.ensure_active()
                .map_err(|interruption| CheckError::Read(interruption.to_string()))?;

            match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => body.extend_from_slice(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    continue;
                }
                Err(e) => return Err(CheckError::Read(e.to_string())),
            }
        }

        debug!("Read {} bytes from {}", body.len(), self.path);
        Ok(body)
    }

    pub fn release(mut self) -> Result<()> {
        match self.file.take() {
            Some(file) => file.close(),
            None => Ok(()),
        }
    }
}

impl Drop for TransferGuard<'_> {
    fn drop(&mut self) {
        if let Some(file) = self.file.take()
            && let Err(err) = file.close()
        {
            warn!("Failed to release transfer of {}: {err}", self.path);
        }
    }
}
