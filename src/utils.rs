// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Bounded line output for the user-facing streams.
//!
//! Everything the tool prints (the resolved path, the usage text, fatal
//! diagnostics) goes through [`printlog`]: the message is formatted into a
//! fixed [`LOG_LINE_CAPACITY`]-byte buffer, cut if it does not fit, and
//! written with a single `write_all` followed by a newline.

use std::{
    fmt::{self, Write as _},
    io::{self, Write},
};

use crate::error::ErrorCode;

/// Size of the line buffer, terminator bytes included.
pub const LOG_LINE_CAPACITY: usize = 1024;

/// Longest message that survives untruncated: one byte is kept for the
/// newline and one for the NUL terminator.
pub const LOG_MESSAGE_MAX: usize = LOG_LINE_CAPACITY - 2;

/// A formatted message held in a fixed buffer.
pub struct LogLine {
    buf: [u8; LOG_LINE_CAPACITY],
    len: usize,
    truncated: bool,
}

impl LogLine {
    /// Formats `args` into a fresh line. Never fails; oversized output is
    /// dropped at the last character boundary that fits.
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut line = LogLine {
            buf: [0u8; LOG_LINE_CAPACITY],
            len: 0,
            truncated: false,
        };
        // write_str below never reports an error, it only truncates
        let _ = line.write_fmt(args);
        line.buf[line.len] = b'\n';
        line.buf[line.len + 1] = 0;
        line
    }

    /// Message text without the newline.
    pub fn message(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Bytes that go to the stream: the message plus `'\n'`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len + 1]
    }

    /// Same as [`as_bytes`](Self::as_bytes) with the trailing NUL included.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..self.len + 2]
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Write for LogLine {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = LOG_MESSAGE_MAX - self.len;
        let take = if s.len() <= room {
            s.len()
        } else {
            self.truncated = true;
            let mut cut = room;
            while !s.is_char_boundary(cut) {
                cut -= 1;
            }
            cut
        };
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

impl fmt::Debug for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogLine")
            .field("message", &self.message())
            .field("len", &self.len)
            .field("truncated", &self.truncated)
            .finish()
    }
}

/// Formats one bounded line and writes it to `w` in a single call.
pub fn printlog<W: Write + ?Sized>(w: &mut W, args: fmt::Arguments<'_>) -> io::Result<()> {
    let line = LogLine::format(args);
    w.write_all(line.as_bytes())?;
    w.flush()
}

/// Informational line on stdout. Write errors are ignored.
pub fn info(args: fmt::Arguments<'_>) {
    let _ = printlog(&mut io::stdout().lock(), args);
}

/// Diagnostic line on stderr. Write errors are ignored.
pub fn warn(args: fmt::Arguments<'_>) {
    let _ = printlog(&mut io::stderr().lock(), args);
}

/// Writes the diagnostic to stderr and terminates the process with `code`
/// right away. Nothing is unwound and no destructor runs.
pub fn fatal(code: ErrorCode, args: fmt::Arguments<'_>) -> ! {
    warn(args);
    std::process::exit(code.raw())
}
