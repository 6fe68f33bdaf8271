use crate::{
    logger_handle::LoggerHandle,
    util::ErrorCode,
    writers::LogWriter,
    DeferredNow, ErrorChannel, RollingError,
};
use std::sync::Arc;

/// The entry point for installing one or more writers as the logger of the
/// [`log`](https://docs.rs/log) facade.
///
/// ```rust,ignore
/// use rolling_logger::{writers::RollingFileWriter, Logger, LevelFilter, Rotation};
///
/// let handle = Logger::with_level(LevelFilter::Info)
///     .add_writer(Box::new(
///         RollingFileWriter::builder()
///             .rotate(Rotation::default_size())
///             .try_build()?,
///     ))
///     .start()?;
/// // ...
/// handle.shutdown();
/// ```
pub struct Logger {
    max_level: log::LevelFilter,
    writers: Vec<Box<dyn LogWriter>>,
}

impl Logger {
    /// Creates a `Logger` that passes records up to the given level to its writers.
    ///
    /// Each writer additionally applies its own [`LogWriter::max_log_level`].
    #[must_use]
    pub fn with_level(max_level: log::LevelFilter) -> Self {
        Self {
            max_level,
            writers: Vec::new(),
        }
    }

    /// Adds a writer; every record is passed to all writers.
    #[must_use]
    pub fn add_writer(mut self, writer: Box<dyn LogWriter>) -> Self {
        self.writers.push(writer);
        self
    }

    /// Consumes the `Logger` and installs it as the logger of the `log` facade.
    ///
    /// Keep the returned handle alive; use it to flush and shut down the writers
    /// at the end of your program.
    ///
    /// # Errors
    ///
    /// [`RollingError::Log`] if a logger was installed already.
    pub fn start(self) -> Result<LoggerHandle, RollingError> {
        let max_level = self.effective_max_level();
        let (dispatcher, handle) = self.build();
        log::set_boxed_logger(Box::new(dispatcher))?;
        log::set_max_level(max_level);
        Ok(handle)
    }

    /// Consumes the `Logger` and returns the `log::Log` implementation and its handle,
    /// without installing anything.
    ///
    /// This is useful if the logger is to be combined with other code that implements
    /// `log::Log`, and in tests.
    #[must_use]
    pub fn build(self) -> (Dispatcher, LoggerHandle) {
        let writers: Arc<[Box<dyn LogWriter>]> = self.writers.into();
        (
            Dispatcher {
                max_level: self.max_level,
                writers: Arc::clone(&writers),
            },
            LoggerHandle::new(writers),
        )
    }

    fn effective_max_level(&self) -> log::LevelFilter {
        self.writers
            .iter()
            .map(|w| w.max_log_level())
            .max()
            .unwrap_or(log::LevelFilter::Off)
            .min(self.max_level)
    }
}

/// Implements `log::Log` by passing the records to a set of [`LogWriter`]s.
///
/// Is produced by [`Logger::build`].
pub struct Dispatcher {
    max_level: log::LevelFilter,
    writers: Arc<[Box<dyn LogWriter>]>,
}

impl log::Log for Dispatcher {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.max_level
            && self
                .writers
                .iter()
                .any(|w| metadata.level() <= w.max_log_level())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // all writers see the same timestamp
        let mut now = DeferredNow::new();
        for writer in self
            .writers
            .iter()
            .filter(|w| record.level() <= w.max_log_level())
        {
            writer.write(&mut now, record).unwrap_or_else(|e| {
                ErrorChannel::default().report_err(ErrorCode::Write, "writing failed", &e);
            });
        }
    }

    fn flush(&self) {
        for writer in &*self.writers {
            writer.flush().unwrap_or_else(|e| {
                ErrorChannel::default().report_err(ErrorCode::Flush, "flushing failed", &e);
            });
        }
    }
}
