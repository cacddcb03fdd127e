// SPDX-License-Identifier: AGPL-3.0-or-later GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! INQUIRY (6): typed CDB and standard-data parser.
//!
//! CDB layout (SPC):
//!   [0] = 0x12 (INQUIRY)
//!   [1] = EVPD (bit 0); other bits reserved (CMDDT obsolete → 0)
//!   [2] = Page Code (only when EVPD=1; else 0)
//!   [3..5] = Allocation Length (big-endian u16; SPC-2 devices read byte 4)
//!   [5] = Control

use anyhow::{Result, bail};
use zerocopy::{
    FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout,
    byteorder::{BigEndian, U16},
};

pub const INQUIRY_OPCODE: u8 = 0x12;

/// Largest allocation length a single-byte INQUIRY field can express.
pub const VPD_MAX_BUFFER_SIZE: usize = 0xff;

/// Standard INQUIRY data is at least this long.
pub const INQUIRY_STANDARD_MIN_LEN: usize = 36;

#[repr(C)]
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Debug, Clone, PartialEq, Eq)]
pub struct Cdb6Inquiry {
    pub operation_code: u8,
    /// EVPD in bit 0.
    pub flags: u8,
    pub page_code: u8,
    pub allocation_length: U16<BigEndian>,
    pub control: u8,
}

impl Cdb6Inquiry {
    /// Standard INQUIRY (EVPD=0, page code 0).
    ///
    /// Starts from an all-zero block and sets only the opcode, allocation
    /// length and control byte.
    pub fn standard(allocation_len: u16, control: u8) -> Self {
        let mut cdb = Self::new_zeroed();
        cdb.operation_code = INQUIRY_OPCODE;
        cdb.allocation_length.set(allocation_len);
        cdb.control = control;
        cdb
    }

    #[inline]
    pub fn evpd(&self) -> bool {
        self.flags & 0x01 != 0
    }
}

/// Fixed-position head of standard INQUIRY data.
#[repr(C)]
#[derive(FromBytes, KnownLayout, Immutable, Debug)]
struct InquiryRaw {
    peripheral: u8,
    rmb: u8,
    version: u8,
    response_format: u8,
    additional_length: u8,
    flags: [u8; 3],
    vendor_id: [u8; 8],
    product_id: [u8; 16],
    product_rev: [u8; 4],
}

/// Decoded standard INQUIRY (EVPD=0) identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryStandard {
    pub peripheral_qualifier: u8, // bits 7..5 of byte0
    pub device_type: u8,          // bits 4..0 of byte0
    pub rmb: bool,                // byte1 bit7
    pub version: u8,              // byte2
    pub response_data_format: u8, // byte3 low nibble
    pub additional_length: u8,    // byte4
    pub vendor_id: String,        // bytes 8..16
    pub product_id: String,       // bytes 16..32
    pub product_rev: String,      // bytes 32..36
}

impl InquiryStandard {
    pub fn device_type_str(&self) -> &'static str {
        match self.device_type {
            0x00 => "Direct-access block (disk)",
            0x01 => "Sequential-access (tape)",
            0x03 => "Processor",
            0x04 => "WORM",
            0x05 => "CD/DVD",
            0x07 => "Optical memory",
            0x08 => "Medium changer",
            0x0C => "Storage array controller",
            0x0D => "Enclosure services",
            0x0E => "RBC",
            0x0F => "Optical card",
            0x11 => "Object-based storage",
            0x12 => "Automation/Drive Interface",
            _ => "Unknown/Reserved",
        }
    }
}

/// Parse a Standard INQUIRY (EVPD=0) response (minimum 36 bytes).
pub fn parse_inquiry_standard(buf: &[u8]) -> Result<InquiryStandard> {
    let Ok((raw, _rest)) = InquiryRaw::ref_from_prefix(buf) else {
        bail!(
            "INQUIRY buffer too short: {} < {INQUIRY_STANDARD_MIN_LEN}",
            buf.len()
        );
    };

    Ok(InquiryStandard {
        peripheral_qualifier: (raw.peripheral >> 5) & 0x07,
        device_type: raw.peripheral & 0x1F,
        rmb: raw.rmb & 0x80 != 0,
        version: raw.version,
        response_data_format: raw.response_format & 0x0F,
        additional_length: raw.additional_length,
        vendor_id: trim_ascii(&raw.vendor_id),
        product_id: trim_ascii(&raw.product_id),
        product_rev: trim_ascii(&raw.product_rev),
    })
}

fn trim_ascii(bytes: &[u8]) -> String {
    let s: String = bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect();
    s.trim().to_string()
}
