// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use nix::errno::Errno;
use tracing::{debug, trace};

use crate::{
    control_block::common::{Cdb, DataDirection},
    error::ScsiToolError,
    models::{
        result::{SENSE_INFO_LEN, ScsiResult, SenseInfo, Transfer},
        status::ScsiStatus,
    },
};

/// Byte capacity of the buffer a device path is resolved into.
pub const DEVICE_PATH_CAPACITY: usize = 1024;

/// Resolves and opens devices by name.
///
/// This is the seam to the platform pass-through facility; everything above
/// it only sees raw error codes.
pub trait DeviceGateway {
    /// Opens `name` for control operations. The device is closed when the
    /// returned handle is dropped.
    fn open(&self, name: &str) -> Result<Box<dyn DeviceHandle + '_>, Errno>;

    /// Writes the canonical path of `name` into `buf` and returns how many
    /// bytes were written. Must not write past `buf.len()`.
    fn device_path(&self, name: &str, buf: &mut [u8]) -> Result<usize, Errno>;
}

/// An open device.
pub trait DeviceHandle {
    /// Submits one CDB and waits for completion.
    ///
    /// `ptl` packs path/target/LUN for transports that multiplex several
    /// units behind one handle. `data` is the data-phase buffer and `sense`
    /// receives autosense bytes. An `Err` is a transport failure; SCSI-level
    /// failures come back as the status in [`Transfer`].
    fn scsi_control(
        &mut self,
        ptl: u32,
        cdb: &Cdb,
        direction: DataDirection,
        data: &mut [u8],
        sense: &mut SenseInfo,
    ) -> Result<Transfer, Errno>;
}

/// Opens `name`, submits `cdb` and closes the device again.
///
/// The handle lives only inside this call, so it is released exactly once on
/// the success path and on every error path.
pub fn scsi_control_by_name(
    gateway: &dyn DeviceGateway,
    name: &str,
    ptl: u32,
    cdb: &Cdb,
    direction: DataDirection,
    data: &mut [u8],
) -> Result<ScsiResult, ScsiToolError> {
    let mut handle = gateway.open(name).map_err(|errno| ScsiToolError::Open {
        name: name.to_string(),
        errno,
    })?;
    trace!(device = name, ?cdb, ?direction, "device opened");

    let mut sense: SenseInfo = [0u8; SENSE_INFO_LEN];
    let transfer = handle
        .scsi_control(ptl, cdb, direction, data, &mut sense)
        .map_err(|errno| ScsiToolError::Transport {
            name: name.to_string(),
            errno,
        })?;

    if transfer.data_len > data.len() {
        debug!(
            device = name,
            reported = transfer.data_len,
            capacity = data.len(),
            "transfer length exceeds the data buffer"
        );
        return Err(ScsiToolError::Transport {
            name: name.to_string(),
            errno: Errno::EOVERFLOW,
        });
    }

    Ok(ScsiResult {
        status: ScsiStatus::from(transfer.status),
        sense,
        sense_len: transfer.sense_len.min(SENSE_INFO_LEN),
        data_len: transfer.data_len,
    })
}

/// Resolves `name` into a bounded buffer and returns the validated path.
///
/// The length reported by the gateway is checked against the buffer before
/// any byte is trusted; the path ends at the first NUL.
pub fn resolve_device_path(
    gateway: &dyn DeviceGateway,
    name: &str,
) -> Result<String, ScsiToolError> {
    let resolve_err = |errno| ScsiToolError::Resolve {
        name: name.to_string(),
        errno,
    };

    let mut buf = [0u8; DEVICE_PATH_CAPACITY];
    let written = gateway.device_path(name, &mut buf).map_err(resolve_err)?;
    if written > buf.len() {
        return Err(resolve_err(Errno::EOVERFLOW));
    }

    let raw = &buf[..written];
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
}
