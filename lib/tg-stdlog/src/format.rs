/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 G3-OSS developers.
 */

use std::cell::RefCell;
use std::fmt::{self, Write};

use slog::{KV, OwnedKVList, Record, Serializer};

use super::LogEntry;

thread_local! {
    static ARGS_BUF: RefCell<String> = RefCell::new(String::with_capacity(128));
}

/// Take an owned copy of a record, so it can be sent to the writer thread
pub(super) fn capture(
    record: &Record,
    logger_values: &OwnedKVList,
    with_location: bool,
) -> Result<LogEntry, slog::Error> {
    let mut fields = KvCollector(Vec::new());
    logger_values.serialize(record, &mut fields)?;
    record.kv().serialize(record, &mut fields)?;

    let location = with_location.then(|| {
        let module = record.module();
        match record.file().rsplit('/').next() {
            Some(file) if !file.is_empty() => format!("{module}({file}:{})", record.line()),
            _ => module.to_string(),
        }
    });

    Ok(LogEntry {
        level: record.level(),
        message: record.msg().to_string(),
        fields: fields.0,
        location,
    })
}

struct KvCollector(Vec<(String, String)>);

impl Serializer for KvCollector {
    emit_by_buffer!(itoa:
        usize => emit_usize,
        isize => emit_isize,
        u8 => emit_u8,
        i8 => emit_i8,
        u16 => emit_u16,
        i16 => emit_i16,
        u32 => emit_u32,
        i32 => emit_i32,
        u64 => emit_u64,
        i64 => emit_i64,
    );
    emit_by_buffer!(ryu:
        f32 => emit_f32,
        f64 => emit_f64,
    );

    fn emit_bool(&mut self, key: slog::Key, val: bool) -> slog::Result {
        self.emit_str(key, if val { "true" } else { "false" })
    }

    fn emit_none(&mut self, _key: slog::Key) -> slog::Result {
        Ok(())
    }

    fn emit_str(&mut self, key: slog::Key, val: &str) -> slog::Result {
        self.0.push((key.to_string(), val.to_string()));
        Ok(())
    }

    fn emit_arguments(&mut self, key: slog::Key, val: &fmt::Arguments) -> slog::Result {
        if let Some(s) = val.as_str() {
            return self.emit_str(key, s);
        }
        ARGS_BUF.with_borrow_mut(|buf| {
            buf.clear();
            buf.write_fmt(*val)?;
            self.emit_str(key, buf.as_str())
        })
    }
}
