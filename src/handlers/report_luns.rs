// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use clap::Args;
use tracing::debug;

use crate::{
    error::ScsiToolError,
    handlers::{CommandHandler, ExecContext},
};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[command(disable_help_flag = true)]
pub struct ReportLuns {
    /// Device name; accepted but never opened
    #[arg(value_name = "device-name", allow_hyphen_values = true)]
    pub device: String,
}

impl CommandHandler for ReportLuns {
    /// Always succeeds: no device is opened and no REPORT LUNS is issued.
    fn run(&self, _ctx: &mut ExecContext<'_>) -> Result<(), ScsiToolError> {
        debug!(device = %self.device, "report-luns does not access the device");
        Ok(())
    }
}
