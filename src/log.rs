use std::io::{self, Write};

use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, MakeWriter},
    prelude::*,
    EnvFilter,
};
use wasm_bindgen::JsValue;

/// Buffers one formatted event and hands it to the matching `console` method on drop.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(text.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { level: Level::INFO, buf: Vec::new() }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter { level: *meta.level(), buf: Vec::new() }
    }
}

/// Install the global subscriber. Call once at startup; later calls are ignored.
pub fn init(level: Level) {
    // No system clock on wasm32-unknown-unknown, so no timestamps.
    let console = fmt::layer()
        .with_writer(Console)
        .without_time()
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // Keep the HTTP and timer crates quiet below warn.
    let filter = EnvFilter::new(format!(
        "{},gloo_net=warn,gloo_timers=warn",
        LevelFilter::from_level(level)
    ));

    if tracing_subscriber::registry()
        .with(console.with_filter(filter))
        .try_init()
        .is_err()
    {
        web_sys::console::warn_1(&"tracing subscriber already installed".into());
    }
}
