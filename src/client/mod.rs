//! This module opens devices and submits SCSI commands to them.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// The device gateway seam and the open-submit-close helpers built on it.
pub mod gateway;
/// Linux SCSI generic (`SG_IO`) gateway.
pub mod sg;
