//! Logger capability passed explicitly to plugins, the runner and the writer.

use std::sync::{Arc, Mutex};

/// Two-level logger handed to every component that reports progress or problems.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Shared handle to a logger.
pub type SharedLogger = Arc<dyn Logger>;

/// Forwards messages to `tracing` events under the `sheetloc` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "sheetloc", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "sheetloc", "{}", message);
    }
}

/// Level of a message captured by [`MemoryLogger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,
    Warn,
}

/// Keeps every message in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    messages: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(LogLevel, String)> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(level, _)| *level == LogLevel::Warn)
            .map(|(_, message)| message)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((level, message.to_string()));
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.push(LogLevel::Log, message);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_logger_keeps_order_and_levels() {
        let logger = MemoryLogger::new();
        logger.log("reading sheet");
        logger.warn("column missing");
        logger.log("done");

        assert_eq!(logger.messages().len(), 3);
        assert_eq!(logger.messages()[1], (LogLevel::Warn, "column missing".to_string()));
        assert_eq!(logger.warnings(), vec!["column missing".to_string()]);
    }
}
