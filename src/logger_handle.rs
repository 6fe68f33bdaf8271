use crate::{util::ErrorCode, writers::LogWriter, ErrorChannel};
use std::sync::Arc;

/// Allows flushing the writers of a started [`Logger`](crate::Logger), and
/// **shuts the writers down when it is dropped**.
///
/// Keep it alive until the very end of your program,
/// in particular if some writer uses buffering.
pub struct LoggerHandle {
    writers: Arc<[Box<dyn LogWriter>]>,
}

impl LoggerHandle {
    pub(crate) fn new(writers: Arc<[Box<dyn LogWriter>]>) -> Self {
        Self { writers }
    }

    /// Flushes all writers.
    pub fn flush(&self) {
        for writer in &*self.writers {
            writer.flush().unwrap_or_else(|e| {
                ErrorChannel::default().report_err(ErrorCode::Flush, "flushing failed", &e);
            });
        }
    }

    /// Shuts down all writers; buffered log lines are written out.
    pub fn shutdown(&self) {
        for writer in &*self.writers {
            writer.shutdown();
        }
    }

    /// The number of writers the logger passes records to.
    #[must_use]
    pub fn writer_count(&self) -> usize {
        self.writers.len()
    }
}

impl Drop for LoggerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
