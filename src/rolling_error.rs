use thiserror::Error;

/// Describes errors in the configuration and initialization of `rolling_logger`.
///
/// Configuration errors are returned when a writer is built and prevent its activation.
/// Errors that occur later, while records are written, never reach the log call site;
/// they are reported through the writer's [`ErrorChannel`](crate::ErrorChannel).
#[derive(Error, Debug)]
pub enum RollingError {
    /// The file name pattern is empty or contains a placeholder more than once.
    #[error("Invalid file name pattern: {0}")]
    InvalidPattern(String),

    /// The date pattern contains items that chrono cannot format.
    #[error("Invalid date pattern: {0:?}")]
    InvalidDatePattern(String),

    /// The date pattern produces the same text for all points in time,
    /// so no rollover period can be derived from it.
    #[error("No rollover periodicity can be derived from date pattern {0:?}")]
    UnschedulableDatePattern(String),

    /// A textual size bound could not be parsed.
    #[error("Invalid size bound: {0:?}")]
    InvalidSizeBound(String),

    /// A level filter could not be parsed.
    #[error("Invalid level: {0:?}")]
    InvalidLevel(String),

    /// The writer was built without a rotation policy.
    #[error("No rotation policy was configured")]
    NoRotation,

    /// Log file cannot be written because the specified path is not a directory.
    #[error("Log file cannot be written because the specified path is not a directory")]
    OutputBadDirectory,

    /// All probed values of the uniqueness placeholder led to existing files.
    #[error("No free file name found for pattern {0}")]
    NoFreeFileName(String),

    /// Log cannot be written, e.g. because the configured output directory is not accessible.
    #[error("Log cannot be written, e.g. because the configured output directory is not accessible")]
    Io(#[from] std::io::Error),

    /// The sink configuration cannot be parsed.
    #[cfg_attr(docsrs, doc(cfg(feature = "config")))]
    #[cfg(feature = "config")]
    #[error("Sink configuration cannot be parsed")]
    Toml(#[from] toml::de::Error),

    /// Some synchronization object is poisoned.
    #[error("Some synchronization object is poisoned")]
    Poison,

    /// Logger initialization failed.
    #[error("Logger initialization failed")]
    Log(#[from] log::SetLoggerError),
}
impl RollingError {
    /// Returns true for errors that describe an invalid configuration,
    /// rather than a problem with the file system.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::InvalidPattern(_)
            | Self::InvalidDatePattern(_)
            | Self::UnschedulableDatePattern(_)
            | Self::InvalidSizeBound(_)
            | Self::InvalidLevel(_)
            | Self::NoRotation
            | Self::OutputBadDirectory => true,
            #[cfg(feature = "config")]
            Self::Toml(_) => true,
            Self::NoFreeFileName(_) | Self::Io(_) | Self::Poison | Self::Log(_) => false,
        }
    }
}
