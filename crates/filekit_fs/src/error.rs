use std::io;
use std::path::{Path, PathBuf};

use strum_macros::{Display, IntoStaticStr};

/// Classification of a failed filesystem operation.
///
/// Renders as the POSIX errno name, which is also what the safe surface
/// records as the last error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum ErrorCode {
    /// The path does not exist where it is required to.
    #[strum(serialize = "ENOENT")]
    NotFound,
    /// The destination exists and exclusive creation was required.
    #[strum(serialize = "EEXIST")]
    AlreadyExists,
    #[strum(serialize = "EACCES")]
    PermissionDenied,
    /// A component of the path prefix is not a directory.
    #[strum(serialize = "ENOTDIR")]
    NotADirectory,
    /// Single-file removal attempted on a directory.
    #[strum(serialize = "EISDIR")]
    IsADirectory,
    /// The handle is invalid or was not opened for the requested access.
    #[strum(serialize = "EBADF")]
    BadDescriptor,
    /// Anything else; the raw platform error stays in [`Error::io_error`].
    #[strum(serialize = "EOTHER")]
    Other,
}

impl ErrorCode {
    pub fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotADirectory => Self::NotADirectory,
            io::ErrorKind::IsADirectory => Self::IsADirectory,
            _ => err
                .raw_os_error()
                .and_then(classify_raw)
                .unwrap_or(Self::Other),
        }
    }
}

#[cfg(unix)]
fn classify_raw(code: i32) -> Option<ErrorCode> {
    match code {
        libc::EBADF => Some(ErrorCode::BadDescriptor),
        libc::ENOTDIR => Some(ErrorCode::NotADirectory),
        libc::EISDIR => Some(ErrorCode::IsADirectory),
        _ => None,
    }
}

#[cfg(windows)]
fn classify_raw(code: i32) -> Option<ErrorCode> {
    const ERROR_INVALID_HANDLE: i32 = 6;
    const ERROR_DIRECTORY: i32 = 267;
    match code {
        ERROR_INVALID_HANDLE => Some(ErrorCode::BadDescriptor),
        ERROR_DIRECTORY => Some(ErrorCode::NotADirectory),
        _ => None,
    }
}

#[cfg(not(any(unix, windows)))]
fn classify_raw(_code: i32) -> Option<ErrorCode> {
    None
}

/// A failed filesystem operation.
#[derive(Debug, thiserror::Error)]
#[error("Failed to {action}{}: {code}", describe(.path))]
pub struct Error {
    code: ErrorCode,
    action: &'static str,
    path: Option<PathBuf>,
    #[source]
    source: io::Error,
}

fn describe(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" {}", path.display()))
        .unwrap_or_default()
}

impl Error {
    /// Wraps `source`, classifying it from its kind and raw OS code.
    pub fn new(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::with_code(ErrorCode::classify(&source), action, path, source)
    }

    /// Wraps `source` under an explicit classification, for causes the
    /// platform reports inconsistently.
    pub fn with_code(
        code: ErrorCode,
        action: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self { code, action, path: Some(path.into()), source }
    }

    /// Failure on an open handle that has no path attached.
    pub fn descriptor(action: &'static str, source: io::Error) -> Self {
        Self { code: ErrorCode::classify(&source), action, path: None, source }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn io_error(&self) -> &io::Error {
        &self.source
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Attaches the failing action and path to an `io::Result`.
pub trait IoResultExt<T> {
    fn context_path(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn context_path(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|err| Error::new(action, path, err))
    }
}
