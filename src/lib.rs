//! This crate provides a small SCSI pass-through tool: device path
//! resolution and raw CDB submission over the Linux sg driver.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Handles configuration, command-line parsing, and logging.
pub mod cfg;
/// Device gateway seam and the Linux `SG_IO` implementation.
pub mod client;
/// Typed SCSI command descriptor blocks and data buffers.
pub mod control_block;
/// Error types and the process exit code.
pub mod error;
/// One handler per subcommand plus the dispatcher.
pub mod handlers;
/// Result and status types returned by a pass-through call.
pub mod models;
/// Bounded line output and `fatal`.
pub mod utils;
