use crate::domains::logger::{DomainLogger, DynLogger, FileLogger};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Forwards to the process-wide `tracing` subscriber. This is the default
/// logger the binary injects.
pub struct TracingLogger;

impl DomainLogger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!("{}", msg);
    }
}

pub fn init_tracing_logger() -> DynLogger {
    Arc::new(TracingLogger)
}

struct NoopLogger;

impl DomainLogger for NoopLogger {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoopLogger)
}

/// Initialise `fast_log` writing to `path` and hand back a logger that feeds it.
pub fn init_file_logger(path: &str, level: log::LevelFilter) -> Result<DynLogger, String> {
    FileLogger::init(path, level).map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FileLogger))
}

/// Sends every message to each of its targets in order.
pub struct MultiLogger {
    targets: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(targets: Vec<DynLogger>) -> Self {
        Self { targets }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.targets.iter().for_each(|t| t.error(msg));
    }
}

/// Tracing logger, plus a log file when `file` is set and can be opened.
pub fn init_combined_logger(file: Option<&str>, level: log::LevelFilter) -> DynLogger {
    let tracing_logger = init_tracing_logger();
    let Some(path) = file else {
        return tracing_logger;
    };
    match init_file_logger(path, level) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![tracing_logger, file_logger])),
        Err(e) => {
            tracing_logger.warn(&format!("File logging disabled: {}", e));
            tracing_logger
        }
    }
}

enum Level {
    Info,
    Warn,
    Error,
}

struct BufferedLogger {
    sender: mpsc::Sender<(Level, String)>,
}

impl DomainLogger for BufferedLogger {
    // try_send: a full buffer drops the message rather than stalling the link task.
    fn info(&self, msg: &str) {
        let _ = self.sender.try_send((Level::Info, msg.to_string()));
    }

    fn warn(&self, msg: &str) {
        let _ = self.sender.try_send((Level::Warn, msg.to_string()));
    }

    fn error(&self, msg: &str) {
        let _ = self.sender.try_send((Level::Error, msg.to_string()));
    }
}

/// Decouples callers from a slow `target` through a channel of `capacity`
/// messages drained by a background task. Must be called inside a runtime.
pub fn init_buffered_logger(target: DynLogger, capacity: usize) -> DynLogger {
    let (sender, mut receiver) = mpsc::channel::<(Level, String)>(capacity.max(1));
    tokio::spawn(async move {
        while let Some((level, msg)) = receiver.recv().await {
            match level {
                Level::Info => target.info(&msg),
                Level::Warn => target.warn(&msg),
                Level::Error => target.error(&msg),
            }
        }
    });
    Arc::new(BufferedLogger { sender })
}
