// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use clap::Args;
use tracing::debug;

use crate::{
    client::gateway::scsi_control_by_name,
    control_block::{
        common::{AlignedBuffer, Cdb, DataDirection},
        inquiry::{Cdb6Inquiry, VPD_MAX_BUFFER_SIZE, parse_inquiry_standard},
    },
    error::ScsiToolError,
    handlers::{CommandHandler, ExecContext},
    models::status::ScsiStatus,
};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[command(disable_help_flag = true)]
pub struct Inquiry {
    /// Device name (`sg0`) or path (`/dev/disk/by-id/...`)
    #[arg(value_name = "device-name", allow_hyphen_values = true)]
    pub device: String,
}

/// CDB for the standard INQUIRY this command sends.
pub fn inquiry_cdb() -> Cdb {
    Cdb::from_struct(&Cdb6Inquiry::standard(VPD_MAX_BUFFER_SIZE as u16, 0))
}

impl CommandHandler for Inquiry {
    /// Sends a standard INQUIRY with a data-in phase of
    /// [`VPD_MAX_BUFFER_SIZE`] bytes.
    ///
    /// The returned data, status and sense are not printed; they only show
    /// up in debug logs. The exit code is the pass-through error code.
    fn run(&self, ctx: &mut ExecContext<'_>) -> Result<(), ScsiToolError> {
        let cdb = inquiry_cdb();
        let mut data = AlignedBuffer::<VPD_MAX_BUFFER_SIZE>::zeroed();

        let result = scsi_control_by_name(
            ctx.gateway,
            &self.device,
            0,
            &cdb,
            DataDirection::In,
            data.as_mut_slice(),
        )?;
        debug!(status = %result.status, data_len = result.data_len, "INQUIRY completed");

        match result.status {
            ScsiStatus::Good => {
                if let Ok(id) = parse_inquiry_standard(&data.as_slice()[..result.data_len]) {
                    debug!(
                        device_type = id.device_type_str(),
                        vendor = %id.vendor_id,
                        product = %id.product_id,
                        revision = %id.product_rev,
                        "standard INQUIRY data"
                    );
                }
            },
            ScsiStatus::CheckCondition => {
                debug!(sense = %hex::encode(result.sense_bytes()), "INQUIRY sense data");
            },
            _ => {},
        }

        Ok(())
    }
}
