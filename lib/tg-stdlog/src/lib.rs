/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use anstyle::{AnsiColor, Style};
use chrono::Local;
use flume::{Receiver, Sender};
use slog::{Drain, Level, OwnedKVList, Record};

#[macro_use]
mod macros;

mod format;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const MAX_BATCH_SIZE: usize = 64 * 1024;

struct LogEntry {
    level: Level,
    message: String,
    fields: Vec<(String, String)>,
    location: Option<String>,
}

impl LogEntry {
    fn message(&self) -> &str {
        if self.message.is_empty() {
            "()"
        } else {
            &self.message
        }
    }

    fn write_plain<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, " {}", self.level)?;
        for (k, v) in &self.fields {
            write!(w, " {k}: {v},")?;
        }
        write!(w, " {}", self.message())?;
        self.write_location(w)
    }

    fn write_styled<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let level = level_style(self.level);
        let bold = Style::new().bold();
        write!(w, " {level}{}{level:#}", self.level)?;
        for (k, v) in &self.fields {
            write!(w, " {bold}{k}{bold:#}={v},")?;
        }
        write!(w, " {bold}{}{bold:#}", self.message())?;
        self.write_location(w)
    }

    fn write_location<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match &self.location {
            Some(location) => writeln!(w, " <{location}>"),
            None => writeln!(w),
        }
    }
}

fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Critical => AnsiColor::Magenta,
        Level::Error => AnsiColor::Red,
        Level::Warning => AnsiColor::Yellow,
        Level::Info => AnsiColor::Green,
        Level::Debug => AnsiColor::Cyan,
        Level::Trace => AnsiColor::Blue,
    };
    Style::new().fg_color(Some(color.into()))
}

#[derive(Clone, Debug)]
pub struct AsyncLogConfig {
    pub channel_capacity: usize,
    pub thread_name: String,
}

impl AsyncLogConfig {
    pub fn with_name(thread_name: &str) -> Self {
        AsyncLogConfig {
            channel_capacity: 1024,
            thread_name: thread_name.to_string(),
        }
    }
}

impl Default for AsyncLogConfig {
    fn default() -> Self {
        AsyncLogConfig::with_name("log-async")
    }
}

/// A slog drain that never blocks, records are written to stderr by a dedicated thread
pub struct AsyncLogger {
    sender: Sender<LogEntry>,
    with_location: bool,
    dropped: AtomicU64,
}

impl AsyncLogger {
    /// Count of records dropped because the channel was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Drain for AsyncLogger {
    type Ok = ();
    type Err = slog::Error;

    fn log(&self, record: &Record, logger_values: &OwnedKVList) -> Result<(), slog::Error> {
        let entry = format::capture(record, logger_values, self.with_location)?;
        if self.sender.try_send(entry).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

pub fn new_async_logger(async_conf: &AsyncLogConfig, append_code_position: bool) -> AsyncLogger {
    let (sender, receiver) = flume::bounded(async_conf.channel_capacity);

    let stderr = io::stderr();
    let writer = LogWriter {
        receiver,
        styled: stderr.is_terminal(),
    };
    let _detached_thread = std::thread::Builder::new()
        .name(async_conf.thread_name.clone())
        .spawn(move || writer.run(stderr));

    AsyncLogger {
        sender,
        with_location: append_code_position,
        dropped: AtomicU64::new(0),
    }
}

struct LogWriter {
    receiver: Receiver<LogEntry>,
    styled: bool,
}

impl LogWriter {
    /// Write out records in batches until all senders are gone
    fn run<W: Write>(self, mut out: W) {
        let mut buf = Vec::with_capacity(4096);
        while let Ok(entry) = self.receiver.recv() {
            buf.clear();
            self.render(&mut buf, &entry);
            for entry in self.receiver.try_iter() {
                self.render(&mut buf, &entry);
                if buf.len() >= MAX_BATCH_SIZE {
                    break;
                }
            }
            let _ = out.write_all(&buf);
            let _ = out.flush();
        }
    }

    fn render(&self, buf: &mut Vec<u8>, entry: &LogEntry) {
        let _ = write!(buf, "{}", Local::now().format(TIME_FORMAT));
        let _ = if self.styled {
            entry.write_styled(buf)
        } else {
            entry.write_plain(buf)
        };
    }
}
