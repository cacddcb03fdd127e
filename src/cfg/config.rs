// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::cfg::{cli::resolve_config_path, enums::LogOutput, logger::LogConfig};

/// Environment variable naming the optional YAML configuration file.
pub const CONFIG_ENV: &str = "SCSITOOL_CONFIG";

/// Upper bound for the pass-through timeout: `sg_io_hdr.timeout` is a u32 of
/// milliseconds.
pub const MAX_PASS_THROUGH_TIMEOUT: Duration = Duration::from_secs(u32::MAX as u64 / 1000);

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// How device names are resolved and commands submitted.
    #[serde(default)]
    pub device: DeviceConfig,
    /// Structured log output.
    #[serde(default)]
    pub logger: LogConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    #[serde(rename = "DeviceDir", default = "default_device_dir")]
    /// Directory bare device names (`sg0`, `sda`) are looked up in.
    pub device_dir: PathBuf,

    #[serde(
        rename = "PassThroughTimeout",
        with = "serde_secs",
        default = "default_timeout"
    )]
    /// Time the kernel may spend on one SCSI command.
    pub timeout: Duration,
}

fn default_device_dir() -> PathBuf {
    PathBuf::from("/dev")
}

fn default_timeout() -> Duration {
    Duration::from_secs(20)
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_dir: default_device_dir(),
            timeout: default_timeout(),
        }
    }
}

impl DeviceConfig {
    /// Timeout as the millisecond count the sg driver expects.
    pub fn timeout_millis(&self) -> u32 {
        u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX)
    }
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;
        Self::from_yaml(&s)
    }

    /// Parses and validates a YAML document. An empty document yields the
    /// defaults.
    pub fn from_yaml(s: &str) -> Result<Self> {
        let mut cfg: Config = if s.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(s).context("failed to parse config YAML")?
        };
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Reads the file named by [`CONFIG_ENV`], or returns the defaults when
    /// the variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) if !p.is_empty() => resolve_config_path(&p)
                .and_then(Config::load_from_file)
                .with_context(|| format!("{CONFIG_ENV}={}", p.to_string_lossy())),
            _ => Ok(Config::default()),
        }
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            self.device.device_dir.is_absolute(),
            "DeviceDir must be an absolute path, got {:?}",
            self.device.device_dir
        );
        ensure!(
            !self.device.timeout.is_zero(),
            "PassThroughTimeout must be >= 1 second"
        );
        ensure!(
            self.device.timeout <= MAX_PASS_THROUGH_TIMEOUT,
            "PassThroughTimeout must be <= {} seconds",
            MAX_PASS_THROUGH_TIMEOUT.as_secs()
        );

        ensure!(!self.logger.level.trim().is_empty(), "logger.level must not be empty");
        if self.logger.output == LogOutput::File {
            let file = self
                .logger
                .file
                .as_ref()
                .context("logger.file is required when logger.output is `file`")?;
            ensure!(!file.path.is_empty(), "logger.file.path must not be empty");
        }

        Ok(())
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
