// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use clap::Args;
use tracing::debug;

use crate::{
    client::gateway::resolve_device_path,
    error::ScsiToolError,
    handlers::{CommandHandler, ExecContext},
    utils::printlog,
};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[command(disable_help_flag = true)]
pub struct DevPath {
    /// Device name (`sg0`) or path (`/dev/disk/by-id/...`)
    #[arg(value_name = "device-name", allow_hyphen_values = true)]
    pub device: String,
}

impl CommandHandler for DevPath {
    /// Prints the resolved path as one line. On failure nothing is written
    /// and the facility's code is returned.
    fn run(&self, ctx: &mut ExecContext<'_>) -> Result<(), ScsiToolError> {
        let path = resolve_device_path(ctx.gateway, &self.device)?;
        debug!(device = %self.device, path = %path, "device path resolved");

        // a closed stdout is not reported, same as any other info line
        let _ = printlog(ctx.out, format_args!("{path}"));
        Ok(())
    }
}
