// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use core::fmt;

use serde::{Deserialize, Serialize};

/// Where log records are written.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    #[serde(rename = "stdout", alias = "Stdout", alias = "STDOUT")]
    Stdout,
    #[default]
    #[serde(rename = "stderr", alias = "Stderr", alias = "STDERR")]
    Stderr,
    #[serde(rename = "file", alias = "File", alias = "FILE")]
    File,
}
impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
        })
    }
}

/// Rotation policy for file output.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationFrequency {
    #[serde(rename = "minutely", alias = "Minutely")]
    Minutely,
    #[serde(rename = "hourly", alias = "Hourly")]
    Hourly,
    #[serde(rename = "daily", alias = "Daily")]
    Daily,
    #[default]
    #[serde(rename = "never", alias = "Never")]
    Never,
}
impl fmt::Display for RotationFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RotationFrequency::Minutely => "minutely",
            RotationFrequency::Hourly => "hourly",
            RotationFrequency::Daily => "daily",
            RotationFrequency::Never => "never",
        })
    }
}
