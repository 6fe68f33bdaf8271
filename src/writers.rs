//! Contains the trait [`LogWriter`] for writers that can be added to a
//! [`Logger`](crate::Logger),
//! and the concrete implementation [`RollingFileWriter`] that writes to a series of files.
//!
//! A [`RollingFileWriter`] is configured with a [`RollingFileWriterBuilder`]:
//!
//! ```rust,ignore
//! use rolling_logger::{writers::RollingFileWriter, Retention, Rotation};
//!
//! let writer = RollingFileWriter::builder()
//!     .rotate(Rotation::Schedule {
//!         file: "logs/app.log".into(),
//!         date_pattern: ".%Y-%m-%d".to_string(),
//!         retention: Retention::from_seconds(3 * 24 * 3600),
//!     })
//!     .print_message()
//!     .try_build()?;
//! ```
//!
//! The function [`sweep_outdated_log_files`] is what scheduled rotation uses to delete
//! outdated files; it is public so that applications can also run it on their own,
//! e.g. at program start.

mod log_writer;
mod rolling_file_writer;

pub use self::log_writer::LogWriter;
pub use self::rolling_file_writer::{
    sweep_outdated_log_files, RollingFileWriter, RollingFileWriterBuilder,
};
