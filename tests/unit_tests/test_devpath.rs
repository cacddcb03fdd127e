// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use nix::errno::Errno;
use scsitool::{
    client::gateway::{DEVICE_PATH_CAPACITY, resolve_device_path},
    error::ScsiToolError,
};

use crate::unit_tests::common::{MockGateway, run};

#[test]
fn test_devpath_prints_one_line() {
    let gw = MockGateway::new().with_path("/dev/sg3");

    let (code, out) = run(&gw, &["devpath", "sg3"]);

    assert!(code.is_success());
    assert_eq!(out, b"/dev/sg3\n");
    assert_eq!(gw.path_calls.get(), 1);
    assert_eq!(gw.opens.get(), 0);
}

#[test]
fn test_devpath_failure_prints_nothing() {
    let gw = MockGateway::new().with_path_error(Errno::ENOENT);

    let (code, out) = run(&gw, &["devpath", "nosuch"]);

    assert_eq!(code.raw(), Errno::ENOENT as i32);
    assert!(out.is_empty());
}

#[test]
fn test_devpath_stops_at_nul() {
    let gw = MockGateway::new().with_path("/dev/sda\0garbage");

    let (code, out) = run(&gw, &["devpath", "sda"]);

    assert!(code.is_success());
    assert_eq!(out, b"/dev/sda\n");
}

#[test]
fn test_devpath_rejects_length_beyond_buffer() {
    let mut gw = MockGateway::new().with_path("/dev/sg0");
    gw.reported_path_len = Some(DEVICE_PATH_CAPACITY + 1);

    let err = resolve_device_path(&gw, "sg0");

    assert_eq!(
        err,
        Err(ScsiToolError::Resolve {
            name: "sg0".into(),
            errno: Errno::EOVERFLOW,
        })
    );
}

#[test]
fn test_devpath_accepts_full_buffer() -> anyhow::Result<()> {
    let long = format!("/{}", "d".repeat(DEVICE_PATH_CAPACITY - 1));
    let gw = MockGateway::new().with_path(&long);

    let path = resolve_device_path(&gw, "x")?;

    assert_eq!(path.len(), DEVICE_PATH_CAPACITY);
    Ok(())
}
