// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use proptest::prelude::*;
use scsitool::utils::{LOG_LINE_CAPACITY, LOG_MESSAGE_MAX, LogLine, printlog};

#[test]
fn test_printlog_writes_message_and_newline() -> std::io::Result<()> {
    let mut out = Vec::new();
    printlog(&mut out, format_args!("{}: {}", "sg0", 7))?;
    assert_eq!(out, b"sg0: 7\n");
    Ok(())
}

#[test]
fn test_oversized_message_is_cut_to_capacity() {
    let long = "x".repeat(4 * LOG_LINE_CAPACITY);
    let line = LogLine::format(format_args!("{long}"));

    assert!(line.is_truncated());
    assert_eq!(line.message().len(), LOG_MESSAGE_MAX);
    let with_nul = line.as_bytes_with_nul();
    assert_eq!(with_nul.len(), LOG_LINE_CAPACITY);
    assert_eq!(&with_nul[LOG_LINE_CAPACITY - 2..], b"\n\0");
}

#[test]
fn test_exact_fit_is_not_truncated() {
    let fit = "y".repeat(LOG_MESSAGE_MAX);
    let line = LogLine::format(format_args!("{fit}"));

    assert!(!line.is_truncated());
    assert_eq!(line.message(), fit);
}

#[test]
fn test_truncation_keeps_utf8_whole() {
    // 3-byte chars never line up with the 1022-byte limit
    let wide = "€".repeat(LOG_LINE_CAPACITY);
    let line = LogLine::format(format_args!("{wide}"));

    assert!(line.is_truncated());
    assert_eq!(line.message().len(), LOG_MESSAGE_MAX - LOG_MESSAGE_MAX % 3);
    assert!(line.message().chars().all(|c| c == '€'));
}

proptest! {
    #[test]
    fn prop_line_is_bounded_and_terminated(msg in ".{0,2048}") {
        let line = LogLine::format(format_args!("{msg}"));
        let bytes = line.as_bytes_with_nul();

        prop_assert!(bytes.len() <= LOG_LINE_CAPACITY);
        prop_assert_eq!(&bytes[bytes.len() - 2..], b"\n\0");
        prop_assert!(msg.starts_with(line.message()));
        prop_assert_eq!(line.is_truncated(), msg.len() > LOG_MESSAGE_MAX);
    }
}
