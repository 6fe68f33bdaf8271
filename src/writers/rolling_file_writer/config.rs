use crate::{DatePattern, ErrorChannel, FilePattern, HeadFunction, Periodicity, Retention};
use chrono::Weekday;
use std::path::PathBuf;

// The validated rotation policy of a RollingFileWriter.
#[derive(Clone, Debug)]
pub(crate) enum RotationConfig {
    Size {
        pattern: FilePattern,
        bound: u64,
        rename_retired_files: bool,
    },
    Date {
        pattern: FilePattern,
    },
    Schedule {
        file: PathBuf,
        date_pattern: DatePattern,
        periodicity: Periodicity,
        first_day_of_week: Weekday,
        retention: Retention,
    },
}

// The immutable configuration of a RollingFileWriter.
#[derive(Debug)]
pub(crate) struct Config {
    pub(crate) print_message: bool,
    pub(crate) append: bool,
    pub(crate) use_utc: bool,
    pub(crate) o_buffer_capacity: Option<usize>,
    pub(crate) line_ending: &'static [u8],
    pub(crate) o_head: Option<HeadFunction>,
    pub(crate) error_channel: ErrorChannel,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            print_message: false,
            append: true,
            use_utc: false,
            o_buffer_capacity: None,
            line_ending: super::UNIX_LINE_ENDING,
            o_head: None,
            error_channel: ErrorChannel::default(),
        }
    }
}
