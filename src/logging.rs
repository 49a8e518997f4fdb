//! Browser-console logging for `tracing` events.
//!
//! The core only emits `tracing` events. `init` installs a fmt subscriber (no
//! timestamps, no ANSI colours) whose writer forwards each formatted event to
//! `console.{debug,info,warn,error}`. Without a subscriber (native tests) events are dropped.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Parse a level name, falling back to `INFO` for anything unrecognised.
pub fn parse_level(name: &str) -> Level {
    name.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Install the console subscriber. Safe to call more than once; later calls are ignored.
pub fn init(level: Level) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(ConsoleMakeWriter)
        .try_init();
    if installed.is_err() {
        tracing::debug!("console subscriber already installed");
    }
}

// =============================================================================
// Console writer
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ConsoleMakeWriter;

/// Buffers one formatted event and emits it on drop.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self { level, buffer: Vec::new() }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buffer);
        let message = format!("[rules-highlighter] {}", text.trim_end());
        let value = wasm_bindgen::JsValue::from_str(&message);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::info_1(&value),
            _ => web_sys::console::debug_1(&value),
        }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}
