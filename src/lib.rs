// only enables the `doc_cfg` feature when the `docsrs` configuration attribute is defined
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::unused_self)]
#![allow(clippy::module_name_repetitions)]
//! Rotating file sinks for the [`log`](https://docs.rs/log) facade.
//!
//! A [`RollingFileWriter`](crate::writers::RollingFileWriter) writes log lines into a series
//! of files and decides, for every record, which file the record belongs to.
//! Three rotation policies are available (see [`Rotation`]):
//!
//! * `Rotation::Size` rolls over to a new file when the active file would grow beyond
//!   a byte limit,
//! * `Rotation::Date` switches files as soon as a record's timestamp belongs to a different
//!   calendar day than the active file,
//! * `Rotation::Schedule` writes to a fixed file, renames it at the boundaries of a period
//!   that is detected from a date pattern, and removes renamed files once they have become
//!   older than a retention window.
//!
//! File name patterns for the first two policies contain the placeholders `%d` (the date)
//! and `%u` (a number that avoids collisions with existing files), see [`FilePattern`].
//!
//! Writers never fail a log call. Problems with the file system are reported through an
//! [`ErrorChannel`] and logging continues; see module [`error_info`] for the error codes.
//!
//! ```rust,ignore
//! use rolling_logger::{writers::RollingFileWriter, Logger, Rotation};
//!
//! let writer = RollingFileWriter::builder()
//!     .rotate(Rotation::Size {
//!         pattern: "logs/app_%d_%u.log".to_string(),
//!         bound: 10 * 1024 * 1024,
//!     })
//!     .try_build()?;
//! let _handle = Logger::with_level(log::LevelFilter::Info)
//!     .add_writer(Box::new(writer))
//!     .start()?;
//! log::info!("Hello");
//! ```

mod deferred_now;
mod formats;
mod logger;
mod logger_handle;
mod parameters;
mod rolling_error;
#[cfg(feature = "config")]
mod sink_config;
mod util;

pub mod error_info;
pub mod writers;

pub use crate::deferred_now::DeferredNow;
pub use crate::formats::*;
pub use crate::logger::{Dispatcher, Logger};
pub use crate::logger_handle::LoggerHandle;
pub use crate::parameters::{
    parse_size_bound, DatePattern, FilePattern, Periodicity, Retention, Rotation,
};
pub use crate::rolling_error::RollingError;
#[cfg(feature = "config")]
pub use crate::sink_config::{SinkConfig, SizeValue};
pub use crate::util::{ErrorChannel, ErrorCode, ErrorHandler};

/// Default file name pattern, used if a configuration does not specify one.
pub const DEFAULT_FILE_PATTERN: &str = "log_%d_%u";

/// Default size bound (10 MiB) for size-bound rotation.
pub const DEFAULT_SIZE_BOUND: u64 = 10 * 1024 * 1024;

/// Smallest accepted size bound; smaller values are raised to this value.
pub const MINIMUM_SIZE_BOUND: u64 = 64;

/// Default date pattern for scheduled rotation; produces suffixes like `.2024-03-17`
/// and thus daily rotation.
pub const DEFAULT_DATE_PATTERN: &str = ".%Y-%m-%d";

/// Default retention for files that were renamed by scheduled rotation (7 days).
pub const DEFAULT_RETENTION: std::time::Duration =
    std::time::Duration::from_secs(7 * 24 * 60 * 60);

/// Default buffer capacity (8k), when buffering is used.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Re-exports from log crate
pub use log::{Level, LevelFilter, Record};
