use super::Retention;
use std::path::PathBuf;

/// Defines how a [`RollingFileWriter`](crate::writers::RollingFileWriter)
/// distributes the log lines over files.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Rotation {
    /// Rotate when the active file would grow beyond `bound` bytes.
    ///
    /// The files are named according to `pattern` (see [`FilePattern`](crate::FilePattern)),
    /// the date placeholder is filled with the date of the first log line.
    /// When the bound is hit, the active file is renamed to a name with a
    /// `_retired_<timestamp>` appendix, and logging continues in a new file.
    ///
    /// Bounds below [`MINIMUM_SIZE_BOUND`](crate::MINIMUM_SIZE_BOUND) are raised to it.
    Size {
        /// File name pattern.
        pattern: String,
        /// Maximum size of a file, in bytes.
        bound: u64,
    },

    /// Write each log line to the file of the day of its timestamp.
    ///
    /// The files are named according to `pattern` (see [`FilePattern`](crate::FilePattern)).
    Date {
        /// File name pattern.
        pattern: String,
    },

    /// Write to a fixed file and rename it periodically.
    ///
    /// The period is detected from `date_pattern` (see [`Periodicity`](crate::Periodicity)).
    /// At the first log line after a period boundary, `file` is renamed to its name
    /// with the formatted date pattern appended, and a new `file` is started.
    /// Renamed files whose modification is longer ago than `retention` are then deleted.
    Schedule {
        /// Path of the active log file.
        file: PathBuf,
        /// Date pattern for the names of renamed files; defines the period.
        date_pattern: String,
        /// How long renamed files are kept.
        retention: Retention,
    },
}

impl Rotation {
    /// Size-bound rotation with the default pattern and the default bound.
    #[must_use]
    pub fn default_size() -> Self {
        Self::Size {
            pattern: crate::DEFAULT_FILE_PATTERN.to_string(),
            bound: crate::DEFAULT_SIZE_BOUND,
        }
    }

    /// Scheduled rotation of the given file, with the default date pattern
    /// and the default retention.
    #[must_use]
    pub fn default_schedule<P: Into<PathBuf>>(file: P) -> Self {
        Self::Schedule {
            file: file.into(),
            date_pattern: crate::DEFAULT_DATE_PATTERN.to_string(),
            retention: Retention::default(),
        }
    }
}
