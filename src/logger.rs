use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Appends timestamped lines to a file. The terminal UI owns stdout, so
/// nothing is ever printed to the screen from here.
pub struct Logger {
    sink: Mutex<File>,
}

impl Logger {
    fn new(sink: File) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "[{}] {}", timestamp, message);
        }
    }
}

pub fn init_logger(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    LOGGER.get_or_init(|| Logger::new(file));
    Ok(())
}

pub fn log(message: &str) {
    // Uninitialised (tests, --scores) means the message is dropped.
    if let Some(logger) = LOGGER.get() {
        logger.log(message);
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
