// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use crate::models::status::ScsiStatus;

/// Sense-info buffer size handed to every pass-through call.
pub const SENSE_INFO_LEN: usize = 32;

pub type SenseInfo = [u8; SENSE_INFO_LEN];

/// What one pass-through submission reports back to the gateway caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub status: u8,
    /// Bytes actually moved in the data phase.
    pub data_len: usize,
    /// Bytes of sense data the device wrote.
    pub sense_len: usize,
}

/// Outcome of a SCSI command: status, sense and transferred length.
///
/// The data itself stays in the caller's buffer; `data_len` says how much of
/// it is valid.
#[derive(Clone, PartialEq, Eq)]
pub struct ScsiResult {
    pub status: ScsiStatus,
    pub sense: SenseInfo,
    pub sense_len: usize,
    pub data_len: usize,
}

impl ScsiResult {
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status == ScsiStatus::Good
    }

    /// Sense bytes the device actually returned.
    #[inline]
    pub fn sense_bytes(&self) -> &[u8] {
        &self.sense[..self.sense_len.min(SENSE_INFO_LEN)]
    }
}

impl fmt::Debug for ScsiResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScsiResult")
            .field("status", &self.status)
            .field("data_len", &self.data_len)
            .field("sense", &hex::encode(self.sense_bytes()))
            .finish()
    }
}
