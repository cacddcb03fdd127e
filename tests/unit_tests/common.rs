// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::cell::{Cell, RefCell};

use nix::errno::Errno;
use scsitool::{
    client::gateway::{DeviceGateway, DeviceHandle},
    control_block::common::{Cdb, DataDirection},
    error::{ErrorCode, ScsiToolError},
    handlers::dispatch,
    models::result::{SenseInfo, Transfer},
};

/// What the last `scsi_control` call was handed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub ptl: u32,
    pub cdb: Vec<u8>,
    pub direction: DataDirection,
    pub data_len: usize,
    pub data_align: usize,
}

/// In-memory gateway counting every call it receives.
#[derive(Debug, Default)]
pub struct MockGateway {
    pub opens: Cell<usize>,
    pub failed_opens: Cell<usize>,
    pub closes: Cell<usize>,
    pub path_calls: Cell<usize>,
    pub controls: Cell<usize>,
    pub last: RefCell<Option<Submitted>>,

    pub open_error: Option<Errno>,
    pub control_error: Option<Errno>,
    pub path_error: Option<Errno>,
    /// Bytes written into the caller's path buffer.
    pub path: Vec<u8>,
    /// Length reported back instead of `path.len()`.
    pub reported_path_len: Option<usize>,
    pub status: u8,
    pub reply: Vec<u8>,
    /// Data length reported back instead of the copied reply length.
    pub reported_data_len: Option<usize>,
    pub sense: Vec<u8>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.as_bytes().to_vec();
        self
    }

    pub fn with_path_error(mut self, errno: Errno) -> Self {
        self.path_error = Some(errno);
        self
    }

    pub fn with_open_error(mut self, errno: Errno) -> Self {
        self.open_error = Some(errno);
        self
    }

    pub fn with_control_error(mut self, errno: Errno) -> Self {
        self.control_error = Some(errno);
        self
    }

    pub fn with_reply(mut self, status: u8, reply: &[u8], sense: &[u8]) -> Self {
        self.status = status;
        self.reply = reply.to_vec();
        self.sense = sense.to_vec();
        self
    }

    /// Every handle that was opened has been dropped.
    pub fn balanced(&self) -> bool {
        self.opens.get() - self.failed_opens.get() == self.closes.get()
    }

    pub fn gateway_calls(&self) -> usize {
        self.opens.get() + self.path_calls.get()
    }
}

impl DeviceGateway for MockGateway {
    fn open(&self, _name: &str) -> Result<Box<dyn DeviceHandle + '_>, Errno> {
        // failed opens count too
        self.opens.set(self.opens.get() + 1);
        if let Some(e) = self.open_error {
            self.failed_opens.set(self.failed_opens.get() + 1);
            return Err(e);
        }
        Ok(Box::new(MockHandle { gw: self }))
    }

    fn device_path(&self, _name: &str, buf: &mut [u8]) -> Result<usize, Errno> {
        self.path_calls.set(self.path_calls.get() + 1);
        if let Some(e) = self.path_error {
            return Err(e);
        }
        let n = self.path.len().min(buf.len());
        buf[..n].copy_from_slice(&self.path[..n]);
        Ok(self.reported_path_len.unwrap_or(n))
    }
}

pub struct MockHandle<'a> {
    gw: &'a MockGateway,
}

impl DeviceHandle for MockHandle<'_> {
    fn scsi_control(
        &mut self,
        ptl: u32,
        cdb: &Cdb,
        direction: DataDirection,
        data: &mut [u8],
        sense: &mut SenseInfo,
    ) -> Result<Transfer, Errno> {
        let gw = self.gw;
        gw.controls.set(gw.controls.get() + 1);
        let addr = data.as_ptr() as usize;
        *gw.last.borrow_mut() = Some(Submitted {
            ptl,
            cdb: cdb.as_bytes().to_vec(),
            direction,
            data_len: data.len(),
            data_align: 1 << addr.trailing_zeros().min(12),
        });
        if let Some(e) = gw.control_error {
            return Err(e);
        }

        let n = gw.reply.len().min(data.len());
        data[..n].copy_from_slice(&gw.reply[..n]);
        let s = gw.sense.len().min(sense.len());
        sense[..s].copy_from_slice(&gw.sense[..s]);

        Ok(Transfer {
            status: gw.status,
            data_len: gw.reported_data_len.unwrap_or(n),
            sense_len: s,
        })
    }
}

impl Drop for MockHandle<'_> {
    fn drop(&mut self) {
        self.gw.closes.set(self.gw.closes.get() + 1);
    }
}

/// Runs a command line against `gw` and returns the exit code and stdout.
pub fn run(gw: &MockGateway, args: &[&str]) -> (ErrorCode, Vec<u8>) {
    let mut out = Vec::new();
    let argv = std::iter::once("scsitool").chain(args.iter().copied());
    let result: Result<(), ScsiToolError> = dispatch(argv, gw, &mut out);
    let code = match &result {
        Ok(()) => ErrorCode::SUCCESS,
        Err(e) => e.code(),
    };
    (code, out)
}

/// Standard INQUIRY data for a 36-byte identity.
pub fn standard_inquiry(vendor: &str, product: &str, rev: &str) -> Vec<u8> {
    let mut buf = vec![0u8; 36];
    buf[0] = 0x00; // direct-access block device
    buf[2] = 0x06; // SPC-4
    buf[3] = 0x02;
    buf[4] = 31;
    for (dst, src) in [(8..16, vendor), (16..32, product), (32..36, rev)] {
        let field = &mut buf[dst];
        field.fill(b' ');
        let n = src.len().min(field.len());
        field[..n].copy_from_slice(&src.as_bytes()[..n]);
    }
    buf
}
