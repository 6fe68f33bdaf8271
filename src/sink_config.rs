use crate::{
    parse_size_bound,
    writers::{RollingFileWriter, RollingFileWriterBuilder},
    Retention, RollingError, Rotation, DEFAULT_DATE_PATTERN, DEFAULT_FILE_PATTERN,
    DEFAULT_SIZE_BOUND,
};
use serde_derive::Deserialize;
use std::{path::PathBuf, str::FromStr};

/// Describes one rolling file sink in TOML.
///
/// The variant is selected with the key `kind`:
///
/// ```toml
/// kind = "size"
/// pattern = "logs/app_%d_%u.log"   # default: "log_%d_%u"
/// max_log_size = "10M"             # bytes, or text with suffix K, M, G, or T; default: 10M
/// level = "info"                   # default: "trace"
/// ```
///
/// ```toml
/// kind = "date"
/// pattern = "logs/app_%d_%u.log"
/// ```
///
/// ```toml
/// kind = "scheduled"
/// file = "logs/app.log"
/// date_pattern = ".%Y-%m-%d"       # default; defines the rollover period
/// keep_old_logs_seconds = 604800   # default; 0 or less keeps the files forever
/// append = true                    # default
/// ```
///
/// All kinds also accept `print_message = true`.
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SinkConfig {
    /// Size-bound rotation, see [`Rotation::Size`].
    Size {
        /// File name pattern.
        pattern: Option<String>,
        /// Size bound.
        max_log_size: Option<SizeValue>,
        /// Maximum level of the written records.
        level: Option<String>,
        /// Print a message when a file is opened.
        print_message: Option<bool>,
    },
    /// Date-bound rotation, see [`Rotation::Date`].
    Date {
        /// File name pattern.
        pattern: Option<String>,
        /// Maximum level of the written records.
        level: Option<String>,
        /// Print a message when a file is opened.
        print_message: Option<bool>,
    },
    /// Scheduled rotation, see [`Rotation::Schedule`].
    Scheduled {
        /// Path of the active log file.
        file: PathBuf,
        /// Date pattern for renamed files.
        date_pattern: Option<String>,
        /// Retention of renamed files, in seconds.
        keep_old_logs_seconds: Option<i64>,
        /// Continue an existing file.
        append: Option<bool>,
        /// Maximum level of the written records.
        level: Option<String>,
        /// Print a message when a file is opened.
        print_message: Option<bool>,
    },
}

/// A size bound in a [`SinkConfig`], either as number of bytes or as text like `"10M"`.
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SizeValue {
    /// Number of bytes.
    Bytes(u64),
    /// Text that is parsed with [`parse_size_bound`].
    Text(String),
}

impl SinkConfig {
    /// Parses a sink configuration from TOML.
    ///
    /// # Errors
    ///
    /// [`RollingError::Toml`] if the text is not a valid sink configuration.
    pub fn from_toml(toml_text: &str) -> Result<Self, RollingError> {
        Ok(toml::from_str(toml_text)?)
    }

    /// Translates the configuration into a builder, which allows adding
    /// settings that cannot be expressed in TOML, like the format function.
    ///
    /// # Errors
    ///
    /// [`RollingError::InvalidSizeBound`] or [`RollingError::InvalidLevel`]
    /// for invalid values.
    pub fn to_builder(&self) -> Result<RollingFileWriterBuilder, RollingError> {
        let (rotation, level, print_message, append) = match self {
            Self::Size {
                pattern,
                max_log_size,
                level,
                print_message,
            } => {
                let bound = match max_log_size {
                    None => DEFAULT_SIZE_BOUND,
                    Some(SizeValue::Bytes(bytes)) => *bytes,
                    Some(SizeValue::Text(text)) => parse_size_bound(text)?,
                };
                (
                    Rotation::Size {
                        pattern: pattern_or_default(pattern.as_ref()),
                        bound,
                    },
                    level,
                    print_message,
                    None,
                )
            }
            Self::Date {
                pattern,
                level,
                print_message,
            } => (
                Rotation::Date {
                    pattern: pattern_or_default(pattern.as_ref()),
                },
                level,
                print_message,
                None,
            ),
            Self::Scheduled {
                file,
                date_pattern,
                keep_old_logs_seconds,
                append,
                level,
                print_message,
            } => (
                Rotation::Schedule {
                    file: file.clone(),
                    date_pattern: date_pattern
                        .clone()
                        .unwrap_or_else(|| DEFAULT_DATE_PATTERN.to_string()),
                    retention: keep_old_logs_seconds
                        .map_or_else(Retention::default, Retention::from_seconds),
                },
                level,
                print_message,
                *append,
            ),
        };

        let mut builder = RollingFileWriter::builder()
            .rotate(rotation)
            .o_print_message(print_message.unwrap_or(false));
        if let Some(level) = level {
            builder = builder.max_level(
                log::LevelFilter::from_str(level)
                    .map_err(|_| RollingError::InvalidLevel(level.clone()))?,
            );
        }
        if let Some(append) = append {
            builder = builder.append(append);
        }
        Ok(builder)
    }

    /// Produces the configured writer.
    ///
    /// # Errors
    ///
    /// See [`SinkConfig::to_builder`] and [`RollingFileWriterBuilder::try_build`].
    pub fn try_build(&self) -> Result<RollingFileWriter, RollingError> {
        self.to_builder()?.try_build()
    }
}

fn pattern_or_default(o_pattern: Option<&String>) -> String {
    o_pattern.map_or_else(|| DEFAULT_FILE_PATTERN.to_string(), Clone::clone)
}
