//! This module contains one handler per subcommand and the dispatcher that
//! routes a command line to them.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{ffi::OsString, io::Write};

use clap::Subcommand;
use enum_dispatch::enum_dispatch;

use crate::{
    cfg::cli::Cli,
    client::gateway::DeviceGateway,
    error::{ErrorCode, ScsiToolError, exit_code},
};

/// Resolves a device name and prints its canonical path.
pub mod devpath;
/// Issues a standard INQUIRY.
pub mod inquiry;
/// Accepts a device name and reports success without touching it.
pub mod report_luns;

use devpath::DevPath;
use inquiry::Inquiry;
use report_luns::ReportLuns;

/// What a handler runs against: the gateway and the stream that stands in
/// for standard output.
pub struct ExecContext<'a> {
    pub gateway: &'a dyn DeviceGateway,
    pub out: &'a mut dyn Write,
}

impl<'a> ExecContext<'a> {
    pub fn new(gateway: &'a dyn DeviceGateway, out: &'a mut dyn Write) -> Self {
        Self { gateway, out }
    }
}

#[enum_dispatch]
pub trait CommandHandler {
    fn run(&self, ctx: &mut ExecContext<'_>) -> Result<(), ScsiToolError>;
}

#[enum_dispatch(CommandHandler)]
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the canonical path of a device
    #[command(name = "devpath")]
    DevPath(DevPath),
    /// Send a standard INQUIRY to a device
    #[command(name = "inquiry")]
    Inquiry(Inquiry),
    /// Validate a device name (no command is sent)
    #[command(name = "report-luns")]
    ReportLuns(ReportLuns),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::DevPath(_) => "devpath",
            Command::Inquiry(_) => "inquiry",
            Command::ReportLuns(_) => "report-luns",
        }
    }

    pub fn device(&self) -> &str {
        match self {
            Command::DevPath(c) => &c.device,
            Command::Inquiry(c) => &c.device,
            Command::ReportLuns(c) => &c.device,
        }
    }
}

/// Runs an already parsed command and returns its exit code.
pub fn execute(command: &Command, ctx: &mut ExecContext<'_>) -> ErrorCode {
    let span = tracing::info_span!("command", name = command.name(), device = command.device());
    let _enter = span.enter();

    let result = command.run(ctx);
    if let Err(e) = &result {
        tracing::debug!(error = %e, code = %e.code(), "command failed");
    }
    exit_code(&result)
}

/// Parses a full argument vector (program name first) and runs the command.
///
/// A malformed command line comes back as [`ScsiToolError::Usage`] before
/// the gateway is touched; the binary turns that into `fatal`.
pub fn dispatch<I, T>(
    args: I,
    gateway: &dyn DeviceGateway,
    out: &mut dyn Write,
) -> Result<(), ScsiToolError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_args(args)?;
    cli.command.run(&mut ExecContext::new(gateway, out))
}
