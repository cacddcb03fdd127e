// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Linux SCSI generic (`sg`) pass-through.
//!
//! Commands go through the synchronous `SG_IO` ioctl with a version 3
//! `sg_io_hdr`. Block nodes (`/dev/sdX`) accept the same ioctl, so both
//! kinds of node can be named.

use std::{
    fs::{self, File, OpenOptions},
    io,
    os::{
        fd::AsRawFd,
        unix::{ffi::OsStrExt, fs::FileTypeExt, fs::OpenOptionsExt},
    },
    path::PathBuf,
    ptr,
};

use libc::{c_int, c_uchar, c_uint, c_ushort, c_void};
use nix::errno::Errno;
use tracing::debug;

use crate::{
    cfg::config::DeviceConfig,
    client::gateway::{DeviceGateway, DeviceHandle},
    control_block::common::{CDB_MAX_LEN, Cdb, DataDirection},
    models::result::{SenseInfo, Transfer},
};

const SG_IO: libc::c_ulong = 0x2285;
const SG_INTERFACE_ID_ORIG: c_int = b'S' as c_int;

const SG_DXFER_NONE: c_int = -1;
const SG_DXFER_TO_DEV: c_int = -2;
const SG_DXFER_FROM_DEV: c_int = -3;

/// Low nibble of `driver_status`; `DRIVER_SENSE` alone only says autosense
/// was collected.
const DRIVER_STATUS_MASK: c_ushort = 0x0f;
const DRIVER_SENSE: c_ushort = 0x08;

bitflags::bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    /// `sg_io_hdr.info` bits reported by the driver
    pub struct SgInfo: u32 {
        /// Something besides GOOD came back (status, host or driver)
        const CHECK     = 0x1;
        const DIRECT_IO = 0x2;
        const MIXED_IO  = 0x4;
    }
}

/// `struct sg_io_hdr` from `<scsi/sg.h>`.
#[repr(C)]
#[derive(Debug)]
pub struct SgIoHdr {
    pub interface_id: c_int,
    pub dxfer_direction: c_int,
    pub cmd_len: c_uchar,
    pub mx_sb_len: c_uchar,
    pub iovec_count: c_ushort,
    pub dxfer_len: c_uint,
    pub dxferp: *mut c_void,
    pub cmdp: *mut c_uchar,
    pub sbp: *mut c_uchar,
    pub timeout: c_uint,
    pub flags: c_uint,
    pub pack_id: c_int,
    pub usr_ptr: *mut c_void,
    pub status: c_uchar,
    pub masked_status: c_uchar,
    pub msg_status: c_uchar,
    pub sb_len_wr: c_uchar,
    pub host_status: c_ushort,
    pub driver_status: c_ushort,
    pub resid: c_int,
    pub duration: c_uint,
    pub info: c_uint,
}

impl SgIoHdr {
    /// An all-zero header with null buffer pointers.
    pub fn zeroed() -> Self {
        Self {
            interface_id: 0,
            dxfer_direction: 0,
            cmd_len: 0,
            mx_sb_len: 0,
            iovec_count: 0,
            dxfer_len: 0,
            dxferp: ptr::null_mut(),
            cmdp: ptr::null_mut(),
            sbp: ptr::null_mut(),
            timeout: 0,
            flags: 0,
            pack_id: 0,
            usr_ptr: ptr::null_mut(),
            status: 0,
            masked_status: 0,
            msg_status: 0,
            sb_len_wr: 0,
            host_status: 0,
            driver_status: 0,
            resid: 0,
            duration: 0,
            info: 0,
        }
    }

    pub fn info(&self) -> SgInfo {
        SgInfo::from_bits_truncate(self.info)
    }

    /// True when the host adapter or the driver failed the command, as
    /// opposed to the device answering with a non-GOOD status.
    pub fn transport_failed(&self) -> bool {
        let driver = self.driver_status & DRIVER_STATUS_MASK;
        self.host_status != 0 || (driver != 0 && driver != DRIVER_SENSE)
    }
}

nix::ioctl_readwrite_bad!(
    /// `ioctl(fd, SG_IO, &mut sg_io_hdr)`
    sg_io,
    SG_IO,
    SgIoHdr
);

fn sg_direction(direction: DataDirection) -> c_int {
    match direction {
        DataDirection::Out => SG_DXFER_TO_DEV,
        DataDirection::In => SG_DXFER_FROM_DEV,
        DataDirection::Unspecified => SG_DXFER_NONE,
    }
}

fn io_errno(err: &io::Error) -> Errno {
    err.raw_os_error().map(Errno::from_raw).unwrap_or(Errno::EIO)
}

/// Gateway over Linux device nodes.
#[derive(Debug, Clone)]
pub struct SgGateway {
    config: DeviceConfig,
}

impl SgGateway {
    pub fn new(config: DeviceConfig) -> Self {
        Self { config }
    }

    /// `sg0` → `<DeviceDir>/sg0`; anything containing `/` is a path already.
    pub fn node_path(&self, name: &str) -> Result<PathBuf, Errno> {
        if name.is_empty() || name.as_bytes().contains(&0) {
            return Err(Errno::ENOENT);
        }
        if name.contains('/') {
            Ok(PathBuf::from(name))
        } else {
            Ok(self.config.device_dir.join(name))
        }
    }
}

impl DeviceGateway for SgGateway {
    fn open(&self, name: &str) -> Result<Box<dyn DeviceHandle + '_>, Errno> {
        let path = self.node_path(name)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .map_err(|e| {
                debug!(path = %path.display(), error = %e, "open failed");
                io_errno(&e)
            })?;
        Ok(Box::new(SgHandle {
            file,
            timeout_ms: self.config.timeout_millis(),
        }))
    }

    fn device_path(&self, name: &str, buf: &mut [u8]) -> Result<usize, Errno> {
        let path = self.node_path(name)?;
        let canon = fs::canonicalize(&path).map_err(|e| io_errno(&e))?;
        let file_type = fs::metadata(&canon).map_err(|e| io_errno(&e))?.file_type();
        if !file_type.is_block_device() && !file_type.is_char_device() {
            debug!(path = %canon.display(), "not a device node");
            return Err(Errno::ENODEV);
        }

        let bytes = canon.as_os_str().as_bytes();
        if bytes.len() > buf.len() {
            return Err(Errno::ENAMETOOLONG);
        }
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }
}

/// An open sg or block node. Closing the `File` closes the device.
#[derive(Debug)]
pub struct SgHandle {
    file: File,
    timeout_ms: u32,
}

impl DeviceHandle for SgHandle {
    fn scsi_control(
        &mut self,
        ptl: u32,
        cdb: &Cdb,
        direction: DataDirection,
        data: &mut [u8],
        sense: &mut SenseInfo,
    ) -> Result<Transfer, Errno> {
        // one sg node addresses exactly one logical unit
        if ptl != 0 {
            return Err(Errno::EINVAL);
        }
        let dxfer_len = match direction {
            DataDirection::Unspecified => 0,
            _ => u32::try_from(data.len()).map_err(|_| Errno::EINVAL)?,
        };

        let mut cmd = [0u8; CDB_MAX_LEN];
        cmd[..cdb.len()].copy_from_slice(cdb.as_bytes());

        let mut hdr = SgIoHdr::zeroed();
        hdr.interface_id = SG_INTERFACE_ID_ORIG;
        hdr.dxfer_direction = sg_direction(direction);
        hdr.cmd_len = cdb.len() as c_uchar;
        hdr.mx_sb_len = sense.len() as c_uchar;
        hdr.dxfer_len = dxfer_len;
        hdr.dxferp = data.as_mut_ptr().cast();
        hdr.cmdp = cmd.as_mut_ptr();
        hdr.sbp = sense.as_mut_ptr();
        hdr.timeout = self.timeout_ms;

        // SAFETY: every pointer in `hdr` refers to a buffer that outlives the
        // call and whose length matches the corresponding length field.
        unsafe { sg_io(self.file.as_raw_fd(), &mut hdr) }?;

        debug!(
            status = hdr.status,
            host_status = hdr.host_status,
            driver_status = hdr.driver_status,
            info = ?hdr.info(),
            resid = hdr.resid,
            duration_ms = hdr.duration,
            "SG_IO completed"
        );

        if hdr.transport_failed() {
            return Err(Errno::EIO);
        }

        let resid = usize::try_from(hdr.resid).unwrap_or(0);
        Ok(Transfer {
            status: hdr.status,
            data_len: (dxfer_len as usize).saturating_sub(resid),
            sense_len: usize::from(hdr.sb_len_wr),
        })
    }
}
