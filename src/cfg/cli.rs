// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::{error::ScsiToolError, handlers::Command};

pub const PROGNAME: &str = "scsitool";

/// Text printed (through `fatal`) for every rejected command line.
pub const USAGE: &str = concat!(
    "usage: scsitool COMMAND ARGS\n",
    "\n",
    "commands:\n",
    "    devpath device-name\n",
    "    inquiry device-name\n",
    "    report-luns device-name\n",
);

/// Issue raw SCSI commands to a device and report the result
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = PROGNAME,
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true,
    override_usage = "scsitool COMMAND ARGS"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parses a full argument vector, program name first.
    ///
    /// Subcommand names match exactly and each takes exactly one device name.
    /// Any rejection (unknown name, missing or extra arguments, non UTF-8
    /// input) becomes [`ScsiToolError::Usage`].
    ///
    /// The count is checked on the raw vector, so `--` counts as an argument
    /// like any other and may itself be a device name.
    pub fn parse_args<I, T>(args: I) -> Result<Self, ScsiToolError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let argc = argv.len();
        let Ok([prog, name, device]) = <[OsString; 3]>::try_from(argv) else {
            debug!(argc, "command line rejected: expected COMMAND device-name");
            return Err(ScsiToolError::Usage);
        };

        // the device goes after an explicit end-of-options marker
        let argv = [prog, name, OsString::from("--"), device];
        Cli::try_parse_from(argv).map_err(|e| {
            debug!(kind = ?e.kind(), "command line rejected");
            ScsiToolError::Usage
        })
    }
}

pub fn resolve_config_path<P: AsRef<Path>>(rel: P) -> Result<PathBuf> {
    let p = rel.as_ref();

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}
