// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// CDB container, data direction and aligned data buffers.
pub mod common;
pub mod inquiry;
