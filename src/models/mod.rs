//! This module defines the values SCSI commands produce.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Status, sense and transfer length of one submitted command.
pub mod result;
/// Defines the SCSI status byte enumeration.
pub mod status;
