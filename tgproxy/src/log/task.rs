/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use slog::{Logger, slog_info, slog_o};

use tg_types::net::UpstreamAddr;

use super::{LtDuration, LtSocketAddr, LtUpstreamAddr};
use crate::serve::{ServerTaskError, ServerTaskNotes};

pub(crate) fn get_logger(server_type: &'static str) -> Logger {
    slog_scope::logger().new(slog_o!(
        "log_type" => super::LOG_TYPE_TASK,
        "server_type" => server_type,
    ))
}

#[derive(Clone, Copy)]
pub(crate) enum TaskType {
    HttpForward,
    HttpConnect,
    SocksConnect,
}

impl TaskType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            TaskType::HttpForward => "HttpForward",
            TaskType::HttpConnect => "HttpConnect",
            TaskType::SocksConnect => "SocksConnect",
        }
    }
}

pub(crate) enum TaskEvent {
    Finished,
}

impl TaskEvent {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            TaskEvent::Finished => "Finished",
        }
    }
}

pub(crate) struct TaskLog<'a> {
    pub(crate) logger: &'a Logger,
    pub(crate) task_type: TaskType,
    pub(crate) task_notes: &'a ServerTaskNotes,
    pub(crate) upstream: Option<&'a UpstreamAddr>,
    pub(crate) client_rd_bytes: u64,
    pub(crate) client_wr_bytes: u64,
    pub(crate) remote_rd_bytes: u64,
    pub(crate) remote_wr_bytes: u64,
}

impl TaskLog<'_> {
    pub(crate) fn log(&self, e: &ServerTaskError) {
        slog_info!(self.logger, "{}", e;
            "task_type" => self.task_type.as_str(),
            "task_event" => TaskEvent::Finished.as_str(),
            "server_addr" => LtSocketAddr(self.task_notes.server_addr),
            "client_addr" => LtSocketAddr(self.task_notes.client_addr),
            "upstream" => self.upstream.map(LtUpstreamAddr),
            "user" => self.task_notes.user(),
            "reason" => e.brief(),
            "total_time" => LtDuration(self.task_notes.time_elapsed()),
            "c_rd_bytes" => self.client_rd_bytes,
            "c_wr_bytes" => self.client_wr_bytes,
            "r_rd_bytes" => self.remote_rd_bytes,
            "r_wr_bytes" => self.remote_wr_bytes,
        )
    }
}
