/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use slog::{Drain, slog_o};
use slog_scope::GlobalLoggerGuard;

use tg_stdlog::AsyncLogConfig;

use crate::opts::ProcArgs;

const PROCESS_LOG_THREAD_NAME: &str = "log-process";

pub fn setup(args: &ProcArgs) -> Result<GlobalLoggerGuard, log::SetLoggerError> {
    let async_conf = AsyncLogConfig::with_name(PROCESS_LOG_THREAD_NAME);
    let drain = tg_stdlog::new_async_logger(&async_conf, args.verbose_level > 2);
    let logger = slog::Logger::root(drain.fuse(), slog_o!());

    let scope_guard = slog_scope::set_global_logger(logger);

    let log_level = match args.verbose_level {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };

    slog_stdlog::init_with_level(log_level)?;
    Ok(scope_guard)
}
