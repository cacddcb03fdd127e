// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{io::Write, path::PathBuf, time::Duration};

use anyhow::Result;
use scsitool::{
    cfg::{
        config::{Config, MAX_PASS_THROUGH_TIMEOUT},
        enums::{LogOutput, RotationFrequency},
    },
    client::sg::SgGateway,
};

#[test]
fn test_empty_document_gives_defaults() -> Result<()> {
    let cfg = Config::from_yaml("")?;

    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.device.device_dir, PathBuf::from("/dev"));
    assert_eq!(cfg.device.timeout, Duration::from_secs(20));
    assert_eq!(cfg.device.timeout_millis(), 20_000);
    assert_eq!(cfg.logger.level, "warn");
    assert_eq!(cfg.logger.output, LogOutput::Stderr);
    Ok(())
}

#[test]
fn test_full_document_from_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(
        file,
        r#"
device:
  DeviceDir: /tmp/devs
  PassThroughTimeout: 5
logger:
  level: debug
  output: file
  is_show_line: true
  file:
    path: /tmp/scsitool/run.log
    rotation_frequency: daily
"#
    )?;

    let cfg = Config::load_from_file(file.path())?;

    assert_eq!(cfg.device.device_dir, PathBuf::from("/tmp/devs"));
    assert_eq!(cfg.device.timeout_millis(), 5_000);
    assert_eq!(cfg.logger.level, "debug");
    assert_eq!(cfg.logger.output, LogOutput::File);
    assert!(cfg.logger.is_show_line);
    assert!(!cfg.logger.is_show_target);
    let log_file = cfg.logger.file.as_ref().map(|f| (f.path.as_str(), f.rotation_frequency));
    assert_eq!(log_file, Some(("/tmp/scsitool/run.log", RotationFrequency::Daily)));

    let gw = SgGateway::new(cfg.device);
    assert_eq!(gw.node_path("sg1"), Ok(PathBuf::from("/tmp/devs/sg1")));
    Ok(())
}

#[test]
fn test_partial_sections_keep_defaults() -> Result<()> {
    let cfg = Config::from_yaml("device:\n  PassThroughTimeout: 60\n")?;

    assert_eq!(cfg.device.device_dir, PathBuf::from("/dev"));
    assert_eq!(cfg.device.timeout, Duration::from_secs(60));
    assert_eq!(cfg.logger, Config::default().logger);
    Ok(())
}

#[test]
fn test_invalid_documents_are_rejected() {
    let bad = [
        "device:\n  DeviceDir: dev\n",
        "device:\n  PassThroughTimeout: 0\n",
        "logger:\n  level: ''\n",
        "logger:\n  output: file\n",
        "logger:\n  output: file\n  file:\n    path: ''\n",
        "logger:\n  output: syslog\n",
        "device: [1, 2]\n",
    ];
    for doc in bad {
        assert!(Config::from_yaml(doc).is_err(), "accepted {doc:?}");
    }
}

#[test]
fn test_timeout_upper_bound() {
    let max = MAX_PASS_THROUGH_TIMEOUT.as_secs();
    assert!(Config::from_yaml(&format!("device:\n  PassThroughTimeout: {max}\n")).is_ok());
    assert!(Config::from_yaml(&format!("device:\n  PassThroughTimeout: {}\n", max + 1)).is_err());
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::load_from_file("/nonexistent/scsitool.yaml").is_err());
}
