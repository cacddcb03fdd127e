// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use zerocopy::{Immutable, IntoBytes};

/// Longest CDB the pass-through path carries.
pub const CDB_MAX_LEN: usize = 16;

/// A command descriptor block in a zero-filled 16-byte container.
///
/// Only the first `len` bytes are submitted; the rest stay zero so nothing
/// uninitialized ever reaches the transport.
#[derive(Clone, PartialEq, Eq)]
pub struct Cdb {
    bytes: [u8; CDB_MAX_LEN],
    len: u8,
}

impl Cdb {
    /// Copies a typed CDB (`Cdb6Inquiry`, ...) into the container.
    ///
    /// A `T` longer than [`CDB_MAX_LEN`] fails to compile.
    pub fn from_struct<T: IntoBytes + Immutable>(cdb: &T) -> Self {
        const { assert!(size_of::<T>() <= CDB_MAX_LEN, "CDB does not fit in 16 bytes") };
        let raw = cdb.as_bytes();
        let mut bytes = [0u8; CDB_MAX_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Self {
            bytes,
            len: raw.len() as u8,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }
}

impl fmt::Debug for Cdb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cdb")
            .field("opcode", &format_args!("{:#04x}", self.opcode()))
            .field("bytes", &hex::encode(self.as_bytes()))
            .finish()
    }
}

/// Direction of the data phase, numbered like `SCSI_IOCTL_DATA_*`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirection {
    Out = 0,
    In = 1,
    Unspecified = 2,
}

/// Data-phase buffer placed on a 16-byte boundary, as pass-through
/// transports require for direct I/O.
#[repr(C, align(16))]
pub struct AlignedBuffer<const N: usize>([u8; N]);

impl<const N: usize> AlignedBuffer<N> {
    pub const fn zeroed() -> Self {
        Self([0u8; N])
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl<const N: usize> Default for AlignedBuffer<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}
