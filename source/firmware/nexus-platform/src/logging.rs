// Copyright 2026 Open Nexus OS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CONTEXT: `log` facade backend writing one line per record to the platform console
//! OWNERS: @firmware-team
//! PUBLIC API: ConsoleSink, PlatformConsole, ConsoleLogger, emit(), init()
//! DEPENDS_ON: log, spin
//! INVARIANTS: Debug/Trace only in debug builds; single-line emission; `\n` sent as `\r\n`

use core::fmt::{self, Arguments, Write};

use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::{Mutex, Once};

use crate::error::{Device, PlatformError, Result};
use crate::platform::Platform;

/// Most verbose level emitted by this build.
pub const MAX_LEVEL: LevelFilter =
    if cfg!(debug_assertions) { LevelFilter::Trace } else { LevelFilter::Info };

/// Byte sink the logger writes to.
pub trait ConsoleSink: Sync {
    fn put_byte(&self, byte: u8);
}

/// Routes log output to a platform's console operations.
pub struct PlatformConsole<P: 'static>(pub &'static P);

impl<P: Platform> ConsoleSink for PlatformConsole<P> {
    fn put_byte(&self, byte: u8) {
        self.0.console_put(byte);
    }
}

struct SinkWriter<'a>(&'a dyn ConsoleSink);

impl Write for SinkWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for &byte in s.as_bytes() {
            if byte == b'\n' {
                self.0.put_byte(b'\r');
            }
            self.0.put_byte(byte);
        }
        Ok(())
    }
}

/// Writes `[LEVEL target] message` followed by a line break.
pub fn emit(sink: &dyn ConsoleSink, level: Level, target: &str, args: Arguments<'_>) {
    let mut writer = SinkWriter(sink);
    let _ = write!(writer, "[{} {}] ", level.as_str(), target);
    let _ = writer.write_fmt(args);
    let _ = writer.write_char('\n');
}

/// Logger that stays silent until a sink is attached.
pub struct ConsoleLogger {
    sink: Once<&'static dyn ConsoleSink>,
    line: Mutex<()>,
}

impl ConsoleLogger {
    pub const fn new() -> Self {
        Self { sink: Once::new(), line: Mutex::new(()) }
    }

    pub fn attach(&self, sink: &'static dyn ConsoleSink) {
        self.sink.call_once(|| sink);
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= MAX_LEVEL
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(sink) = self.sink.get() {
            // Keep lines from different cores from interleaving.
            let _line = self.line.lock();
            emit(*sink, record.level(), record.target(), *record.args());
        }
    }

    fn flush(&self) {}
}

/// Installs `logger` as the global `log` backend writing to `sink`.
pub fn init(logger: &'static ConsoleLogger, sink: &'static dyn ConsoleSink) -> Result<()> {
    logger.attach(sink);
    log::set_logger(logger).map_err(|_| PlatformError::ColdReentry { device: Device::Console })?;
    log::set_max_level(MAX_LEVEL);
    Ok(())
}
