// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use nix::errno::Errno;
use thiserror::Error;

/// Raw system error code used as the process exit status.
///
/// Zero is success; every other value is an `errno` reported by the
/// pass-through facility or by the dispatcher itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    pub const SUCCESS: ErrorCode = ErrorCode(0);
    /// Returned for every malformed invocation.
    pub const INVALID_PARAMETER: ErrorCode = ErrorCode(Errno::EINVAL as i32);

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<Errno> for ErrorCode {
    fn from(e: Errno) -> Self {
        ErrorCode(e as i32)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            f.write_str("0 (success)")
        } else {
            write!(f, "{} ({})", self.0, Errno::from_raw(self.0).desc())
        }
    }
}

/// Every way a subcommand can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScsiToolError {
    /// Missing or unknown subcommand, or a wrong argument count.
    #[error("invalid command line")]
    Usage,
    #[error("cannot resolve device path for {name}: {errno}")]
    Resolve { name: String, errno: Errno },
    #[error("cannot open device {name}: {errno}")]
    Open { name: String, errno: Errno },
    #[error("SCSI pass-through to {name} failed: {errno}")]
    Transport { name: String, errno: Errno },
}

impl ScsiToolError {
    /// The exit code this failure surfaces as.
    pub fn code(&self) -> ErrorCode {
        match self {
            ScsiToolError::Usage => ErrorCode::INVALID_PARAMETER,
            ScsiToolError::Resolve { errno, .. }
            | ScsiToolError::Open { errno, .. }
            | ScsiToolError::Transport { errno, .. } => (*errno).into(),
        }
    }
}

/// Collapses a command outcome into its exit code.
pub fn exit_code(result: &Result<(), ScsiToolError>) -> ErrorCode {
    match result {
        Ok(()) => ErrorCode::SUCCESS,
        Err(e) => e.code(),
    }
}
