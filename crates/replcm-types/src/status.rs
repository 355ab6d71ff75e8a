use std::fmt;

use crate::status_code::{self, status_code_t, FsCode, StatusCode};

/// A status value carrying a code and optional message.
///
/// Recycle operations hand this to the metadata store instead of an error
/// type: `code() == 0` means success, anything else is a reason. The
/// `#[must_use]` attribute ensures callers do not silently drop a failure.
#[derive(Debug, Clone)]
#[must_use]
pub struct Status {
    code: status_code_t,
    message: Option<String>,
}

impl Status {
    /// Create a status with just a code.
    pub fn new(code: status_code_t) -> Self {
        Self {
            code,
            message: None,
        }
    }

    /// Create a status with a code and a descriptive message.
    pub fn with_message(code: status_code_t, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(msg.into()),
        }
    }

    /// The success status.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Return the numeric status code.
    pub fn code(&self) -> status_code_t {
        self.code
    }

    /// Return the optional message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether this status represents success (code == OK).
    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::OK
    }

    /// Produce a human-readable description like `"Fs::NotFound(1000) file missing"`.
    pub fn describe(&self) -> String {
        let name = status_code::to_string(self.code);
        match &self.message {
            Some(msg) => format!("{}({}) {}", name, self.code, msg),
            None => format!("{}({})", name, self.code),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl std::error::Error for Status {}

impl From<status_code_t> for Status {
    fn from(code: status_code_t) -> Self {
        Self::new(code)
    }
}

impl From<std::io::Error> for Status {
    fn from(e: std::io::Error) -> Self {
        Self::with_message(io_error_code(e.kind()), e.to_string())
    }
}

/// Map an `std::io::ErrorKind` to the closest status code.
pub fn io_error_code(kind: std::io::ErrorKind) -> status_code_t {
    use std::io::ErrorKind;
    match kind {
        ErrorKind::NotFound => FsCode::NOT_FOUND,
        ErrorKind::AlreadyExists => FsCode::EXISTS,
        ErrorKind::PermissionDenied => FsCode::NO_PERMISSION,
        ErrorKind::NotADirectory => FsCode::NOT_DIRECTORY,
        ErrorKind::IsADirectory => FsCode::IS_DIRECTORY,
        ErrorKind::DirectoryNotEmpty => FsCode::NOT_EMPTY,
        _ => StatusCode::IO_ERROR,
    }
}
