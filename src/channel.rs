use std::ffi::CString;
use std::io;
use std::os::fd::AsRawFd as _;
use std::os::fd::FromRawFd as _;
use std::os::fd::OwnedFd;
use std::os::unix::ffi::OsStrExt as _;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single channel operation.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The entry could not be opened for the requested mode.
    #[error("cannot open {} for {mode}: {source}", .path.display())]
    Access {
        mode: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The entry was opened but rejected the transfer itself.
    #[error("{op} on {} failed: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ChannelError {
    pub fn source_kind(&self) -> io::ErrorKind {
        match self {
            ChannelError::Access { source, .. } | ChannelError::Io { source, .. } => source.kind(),
        }
    }
}

/// One-shot reader/writer for a driver-backed pseudo-file.
///
/// Each operation opens the configured path, transfers the whole payload and
/// closes the descriptor before returning; nothing is held between calls.
/// What the driver does with the bytes is its own business: a read is not
/// guaranteed to return what the previous write stored.
pub struct ProcChannel {
    path: PathBuf,
}

impl ProcChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProcChannel { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the entry's contents with the whole payload.
    pub fn write_entry(&self, data: &str) -> Result<(), ChannelError> {
        let fd = self.open(libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC, "writing")?;

        let mut remaining = data.as_bytes();

        while !remaining.is_empty() {
            match unsafe {
                libc::write(fd.as_raw_fd(), remaining.as_ptr().cast(), remaining.len())
            } {
                len if len > 0 => remaining = &remaining[len as usize..],
                0 => {
                    return Err(self.io_error("write", io::ErrorKind::WriteZero.into()));
                }
                _ => {
                    let error = io::Error::last_os_error();
                    if error.kind() != io::ErrorKind::Interrupted {
                        return Err(self.io_error("write", error));
                    }
                }
            }
        }

        log::debug!("wrote {} bytes to {}", data.len(), self.path.display());
        Ok(())
    }

    /// Read the entire contents available from the entry.
    pub fn read_entry(&self) -> Result<String, ChannelError> {
        let fd = self.open(libc::O_RDONLY, "reading")?;

        let mut contents = Vec::new();
        let mut buffer = [0u8; 4096];

        loop {
            match unsafe { libc::read(fd.as_raw_fd(), buffer.as_mut_ptr().cast(), buffer.len()) } {
                0 => break,
                len if len > 0 => contents.extend_from_slice(&buffer[..len as usize]),
                _ => {
                    let error = io::Error::last_os_error();
                    if error.kind() != io::ErrorKind::Interrupted {
                        return Err(self.io_error("read", error));
                    }
                }
            }
        }

        log::debug!("read {} bytes from {}", contents.len(), self.path.display());

        String::from_utf8(contents)
            .map_err(|error| self.io_error("read", io::Error::new(io::ErrorKind::InvalidData, error)))
    }

    fn open(&self, flags: libc::c_int, mode: &'static str) -> Result<OwnedFd, ChannelError> {
        let access = |source| ChannelError::Access {
            mode,
            path: self.path.clone(),
            source,
        };

        let path = CString::new(self.path.as_os_str().as_bytes())
            .map_err(|_| access(io::ErrorKind::InvalidInput.into()))?;

        match unsafe { libc::open(path.as_ptr(), flags | libc::O_CLOEXEC, 0o644) } {
            fd if fd >= 0 => Ok(unsafe { OwnedFd::from_raw_fd(fd) }),
            _ => Err(access(io::Error::last_os_error())),
        }
    }

    fn io_error(&self, op: &'static str, source: io::Error) -> ChannelError {
        ChannelError::Io {
            op,
            path: self.path.clone(),
            source,
        }
    }
}
