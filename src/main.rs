// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io::{self, Write};

use scsitool::{
    cfg::{
        cli::{Cli, USAGE},
        config::Config,
        logger::init_logger,
    },
    client::sg::SgGateway,
    error::ErrorCode,
    handlers::{ExecContext, execute},
    utils::fatal,
};
use tracing::debug;

fn main() {
    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(_) => fatal(ErrorCode::INVALID_PARAMETER, format_args!("{USAGE}")),
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => fatal(ErrorCode::INVALID_PARAMETER, format_args!("scsitool: {e:#}")),
    };

    let guard = match init_logger(&config.logger) {
        Ok(guard) => guard,
        Err(e) => fatal(ErrorCode::INVALID_PARAMETER, format_args!("scsitool: {e:#}")),
    };
    debug!(command = cli.command.name(), device = cli.command.device(), "starting");

    let gateway = SgGateway::new(config.device);
    let code = {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let code = execute(&cli.command, &mut ExecContext::new(&gateway, &mut out));
        let _ = out.flush();
        code
    };
    debug!(code = code.raw(), "finished");

    // process::exit skips destructors; flush the log writer first
    drop(guard);
    std::process::exit(code.raw())
}
