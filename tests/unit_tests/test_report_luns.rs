// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use nix::errno::Errno;
use scsitool::client::gateway::DeviceGateway;

use crate::unit_tests::common::{MockGateway, run};

#[test]
fn test_report_luns_never_touches_the_device() {
    let gw = MockGateway::new()
        .with_open_error(Errno::ENOENT)
        .with_path_error(Errno::ENOENT);

    let (code, out) = run(&gw, &["report-luns", "does-not-exist"]);

    assert!(code.is_success());
    assert!(out.is_empty());
    assert_eq!(gw.gateway_calls(), 0);

    // a failed open is still a gateway call
    assert!(gw.open("does-not-exist").is_err());
    assert_eq!(gw.gateway_calls(), 1);
}

#[test]
fn test_report_luns_still_checks_argument_count() {
    let gw = MockGateway::new();

    assert_eq!(run(&gw, &["report-luns"]).0.raw(), 22);
    assert_eq!(run(&gw, &["report-luns", "sg0", "sg1"]).0.raw(), 22);
    assert_eq!(gw.gateway_calls(), 0);
}
