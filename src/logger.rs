//! Custom logging module.
//!
//! Log records are formatted and forwarded over a channel; the render loop
//! drains them into application state so the log panel can display them.

use log::{Level, Log, Metadata, Record};
use std::sync::mpsc::Sender;
use std::sync::Mutex;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger that forwards formatted entries to the UI over a channel.
///
pub struct StateLogger {
    sender: Mutex<Sender<String>>,
}

impl StateLogger {
    pub fn new(sender: Sender<String>) -> Self {
        StateLogger {
            sender: Mutex::new(sender),
        }
    }
}

impl Log for StateLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Skip dependency chatter; our own modules log at debug and above.
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(sender) = self.sender.lock() {
                // A full or disconnected channel only costs us the entry.
                let _ = sender.send(format_log(record));
            }
        }
    }

    fn flush(&self) {}
}
