use super::{
    config::{Config, RotationConfig},
    RollingFileWriter, State, StateHandle,
};
use crate::{
    formats::default_format, parameters::clamp_size_bound, DatePattern, ErrorChannel,
    FilePattern, FormatFunction, HeadFunction, Periodicity, RollingError, Rotation,
    DEFAULT_BUFFER_CAPACITY,
};
use chrono::Weekday;
use std::path::Path;

/// Builder for [`RollingFileWriter`].
///
/// Methods with a name starting with `o_` take an `Option` or a `bool`, to make it easy to
/// forward values that come from command line arguments or configuration files.
#[allow(clippy::module_name_repetitions)]
pub struct RollingFileWriterBuilder {
    o_rotation: Option<Rotation>,
    config: Config,
    format: FormatFunction,
    max_log_level: log::LevelFilter,
    rename_retired_files: bool,
    first_day_of_week: Weekday,
}

/// Simple methods for influencing the behavior of the `RollingFileWriter`.
impl RollingFileWriterBuilder {
    pub(crate) fn new() -> Self {
        Self {
            o_rotation: None,
            config: Config::default(),
            format: default_format,
            max_log_level: log::LevelFilter::Trace,
            rename_retired_files: true,
            first_day_of_week: Weekday::Mon,
        }
    }

    /// Defines the rotation policy; this is the only mandatory setting.
    #[must_use]
    pub fn rotate(mut self, rotation: Rotation) -> Self {
        self.o_rotation = Some(rotation);
        self
    }

    /// Makes the `RollingFileWriter` print an info message to stdout
    /// when a new file is used for log output.
    #[must_use]
    pub fn print_message(mut self) -> Self {
        self.config.print_message = true;
        self
    }

    /// Makes the `RollingFileWriter` use the provided format function for the log entries,
    /// rather than the default ([`formats::default_format`](crate::default_format)).
    #[must_use]
    pub fn format(mut self, format: FormatFunction) -> Self {
        self.format = format;
        self
    }

    /// Registers a function that writes a preamble into every new, empty log file.
    #[must_use]
    pub fn head(mut self, head: HeadFunction) -> Self {
        self.config.o_head = Some(head);
        self
    }

    /// Makes all calendar decisions (buckets, date placeholders, rollover boundaries)
    /// use UTC rather than local time.
    #[must_use]
    pub fn use_utc(mut self) -> Self {
        self.config.use_utc = true;
        self
    }

    /// Define if buffering should be used.
    ///
    /// By default, every log line is directly written to the output file, without buffering.
    /// This allows seeing new log lines in real time.
    ///
    /// **Note** that with buffering you should call [`LogWriter::shutdown`](crate::writers::LogWriter::shutdown)
    /// or [`LoggerHandle::shutdown`](crate::LoggerHandle::shutdown)
    /// at the very end of your program
    /// to ensure that all buffered log lines are flushed before the program terminates.
    #[must_use]
    pub fn use_buffering(mut self, buffer: bool) -> Self {
        self.config.o_buffer_capacity = if buffer {
            Some(DEFAULT_BUFFER_CAPACITY)
        } else {
            None
        };
        self
    }

    /// Use Windows line endings, rather than just `\n`.
    #[must_use]
    pub fn use_windows_line_ending(mut self) -> Self {
        self.config.line_ending = super::WINDOWS_LINE_ENDING;
        self
    }

    /// Defines where the writer reports problems with the file system.
    ///
    /// By default, problems are printed to stderr.
    #[must_use]
    pub fn error_channel(mut self, error_channel: ErrorChannel) -> Self {
        self.config.error_channel = error_channel;
        self
    }

    /// Records with a level above the given one are ignored by this writer.
    #[must_use]
    pub fn max_level(mut self, max_log_level: log::LevelFilter) -> Self {
        self.max_log_level = max_log_level;
        self
    }

    /// Only relevant for [`Rotation::Size`].
    ///
    /// With `true` (the default), a full file is renamed to a name with a
    /// `_retired_<timestamp>` appendix before logging continues in a new file.
    /// With `false`, full files keep their names.
    #[must_use]
    pub fn rename_retired_files(mut self, rename: bool) -> Self {
        self.rename_retired_files = rename;
        self
    }

    /// Only relevant for [`Rotation::Schedule`].
    ///
    /// With `true` (the default), an existing log file is continued.
    /// With `false`, it is truncated when the writer opens it the first time.
    #[must_use]
    pub fn append(mut self, append: bool) -> Self {
        self.config.append = append;
        self
    }

    /// Only relevant for [`Rotation::Schedule`] with a weekly period.
    ///
    /// Defines the day on which a week starts; the default is Monday.
    #[must_use]
    pub fn first_day_of_week(mut self, weekday: Weekday) -> Self {
        self.first_day_of_week = weekday;
        self
    }

    /// Produces the `RollingFileWriter`.
    ///
    /// All settings are validated, and the folder for the log files is created
    /// if it does not depend on the date placeholder. No file is opened yet.
    ///
    /// # Errors
    ///
    /// - [`RollingError::NoRotation`] if no rotation policy was set,
    /// - [`RollingError::InvalidPattern`], [`RollingError::InvalidDatePattern`],
    ///   [`RollingError::UnschedulableDatePattern`] for invalid patterns,
    /// - [`RollingError::OutputBadDirectory`] if the folder for the log files exists as a
    ///   file,
    /// - [`RollingError::Io`] if the folder cannot be created.
    pub fn try_build(self) -> Result<RollingFileWriter, RollingError> {
        let rotation_config = self.try_build_rotation_config()?;
        let state_handle = StateHandle::new(
            State::new(self.config, rotation_config),
            self.format,
        );
        Ok(RollingFileWriter::new(state_handle, self.max_log_level))
    }

    fn try_build_rotation_config(&self) -> Result<RotationConfig, RollingError> {
        match self.o_rotation {
            None => Err(RollingError::NoRotation),
            Some(Rotation::Size { ref pattern, bound }) => {
                let pattern = FilePattern::try_new(pattern.as_str())?;
                if let Some(directory) = pattern.fixed_directory() {
                    ensure_directory(&directory)?;
                }
                Ok(RotationConfig::Size {
                    pattern,
                    bound: clamp_size_bound(bound),
                    rename_retired_files: self.rename_retired_files,
                })
            }
            Some(Rotation::Date { ref pattern }) => {
                let pattern = FilePattern::try_new(pattern.as_str())?;
                if let Some(directory) = pattern.fixed_directory() {
                    ensure_directory(&directory)?;
                }
                Ok(RotationConfig::Date { pattern })
            }
            Some(Rotation::Schedule {
                ref file,
                ref date_pattern,
                retention,
            }) => {
                if file.file_name().is_none() {
                    return Err(RollingError::InvalidPattern(format!(
                        "{} does not denote a file",
                        file.display()
                    )));
                }
                let date_pattern = DatePattern::try_new(date_pattern.as_str())?;
                let periodicity = Periodicity::detect(&date_pattern, self.first_day_of_week);
                if periodicity == Periodicity::Invalid {
                    return Err(RollingError::UnschedulableDatePattern(
                        date_pattern.to_string(),
                    ));
                }
                if let Some(directory) = file.parent() {
                    if !directory.as_os_str().is_empty() {
                        ensure_directory(directory)?;
                    }
                }
                Ok(RotationConfig::Schedule {
                    file: file.clone(),
                    date_pattern,
                    periodicity,
                    first_day_of_week: self.first_day_of_week,
                    retention,
                })
            }
        }
    }
}

/// Alternative set of methods to control the behavior of the `RollingFileWriterBuilder`.
/// Use these methods when you want to control the settings flexibly,
/// e.g. with commandline arguments via `clap`.
impl RollingFileWriterBuilder {
    /// Sets or resets the rotation policy.
    #[must_use]
    pub fn o_rotate(mut self, rotation: Option<Rotation>) -> Self {
        self.o_rotation = rotation;
        self
    }

    /// With true, makes the `RollingFileWriter` print an info message to stdout, each time
    /// when a new file is used for log output.
    #[must_use]
    pub fn o_print_message(mut self, print_message: bool) -> Self {
        self.config.print_message = print_message;
        self
    }

    /// Sets or resets the head function.
    #[must_use]
    pub fn o_head(mut self, o_head: Option<HeadFunction>) -> Self {
        self.config.o_head = o_head;
        self
    }

    /// With true, makes the `RollingFileWriter` use UTC for all calendar decisions.
    #[must_use]
    pub fn o_use_utc(mut self, use_utc: bool) -> Self {
        self.config.use_utc = use_utc;
        self
    }

    /// Buffering with the given capacity, or no buffering with `None`.
    #[must_use]
    pub fn o_buffer_capacity(mut self, o_capacity: Option<usize>) -> Self {
        self.config.o_buffer_capacity = o_capacity;
        self
    }
}

fn ensure_directory(directory: &Path) -> Result<(), RollingError> {
    if directory.exists() && !directory.is_dir() {
        return Err(RollingError::OutputBadDirectory);
    }
    std::fs::create_dir_all(directory)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::{Retention, RollingError, Rotation};
    use std::{fs::File, path::PathBuf};

    fn builder() -> super::RollingFileWriterBuilder {
        crate::writers::RollingFileWriter::builder()
    }

    #[test]
    fn test_rotation_is_mandatory() {
        assert!(matches!(
            builder().try_build(),
            Err(RollingError::NoRotation)
        ));
    }

    #[test]
    fn test_invalid_patterns_are_rejected() {
        assert!(matches!(
            builder()
                .rotate(Rotation::Size {
                    pattern: "a_%u_%u".to_string(),
                    bound: 1000
                })
                .try_build(),
            Err(RollingError::InvalidPattern(_))
        ));
        assert!(matches!(
            builder()
                .rotate(Rotation::Date {
                    pattern: String::new()
                })
                .try_build(),
            Err(RollingError::InvalidPattern(_))
        ));
        assert!(matches!(
            builder()
                .rotate(Rotation::Schedule {
                    file: PathBuf::from("app.log"),
                    date_pattern: ".static".to_string(),
                    retention: Retention::Forever,
                })
                .try_build(),
            Err(RollingError::UnschedulableDatePattern(_))
        ));
        assert!(matches!(
            builder()
                .rotate(Rotation::Schedule {
                    file: PathBuf::from("app.log"),
                    date_pattern: ".%Y%z".to_string(),
                    retention: Retention::Forever,
                })
                .try_build(),
            Err(RollingError::InvalidDatePattern(_))
        ));
    }

    #[test]
    fn test_directory_is_created() {
        let dir = temp_dir::TempDir::new().unwrap();
        let folder = dir.path().join("a").join("b");
        builder()
            .rotate(Rotation::Size {
                pattern: folder.join("app_%d_%u").to_string_lossy().to_string(),
                bound: 1000,
            })
            .try_build()
            .unwrap();
        assert!(folder.is_dir());
        // no file is created before the first log line
        assert_eq!(std::fs::read_dir(&folder).unwrap().count(), 0);
    }

    #[test]
    fn test_bad_directory() {
        let dir = temp_dir::TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        File::create(&blocker).unwrap();
        assert!(matches!(
            builder()
                .rotate(Rotation::default_schedule(blocker.join("app.log")))
                .try_build(),
            Err(RollingError::OutputBadDirectory)
        ));
    }
}
