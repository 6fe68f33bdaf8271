use crate::DeferredNow;
use log::Record;

/// Writes to a single log output stream.
///
/// Boxed instances of `LogWriter` are added to a [`Logger`](crate::Logger)
/// with [`Logger::add_writer`](crate::Logger::add_writer).
pub trait LogWriter: Sync + Send {
    /// Writes out a log line.
    ///
    /// # Errors
    ///
    /// [`std::io::Error`]
    fn write(&self, now: &mut DeferredNow, record: &Record) -> std::io::Result<()>;

    /// Flushes any buffered records.
    ///
    /// # Errors
    ///
    /// [`std::io::Error`]
    fn flush(&self) -> std::io::Result<()>;

    /// Provides the maximum log level that is to be written.
    fn max_log_level(&self) -> log::LevelFilter;

    /// Cleanup open resources, if necessary.
    fn shutdown(&self) {}
}
