use crate::DeferredNow;
use log::Record;
use std::{path::Path, thread};

/// Time stamp format that is used by the provided format functions.
pub const TS_DASHES_BLANK_COLONS_DOT_BLANK: &str = "%Y-%m-%d %H:%M:%S%.6f %:z";

/// Function type for format functions.
///
/// If you want to write the log lines in your own format,
/// implement a function with this signature and provide it to
/// [`RollingFileWriterBuilder::format`](crate::writers::RollingFileWriterBuilder::format).
///
/// Checkout the code of the provided format functions if you want to start with a template.
///
/// ## Parameters
///
/// - `write`: the output stream
///
/// - `now`: the timestamp that you should use if you want a timestamp to appear in the log line
///
/// - `record`: the log line's content and metadata, as provided by the log crate's macros.
pub type FormatFunction = fn(
    write: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error>;

/// Function type for head functions.
///
/// A head function writes a preamble into each log file, once, right after the file was
/// created. Register it with
/// [`RollingFileWriterBuilder::head`](crate::writers::RollingFileWriterBuilder::head).
///
/// ## Parameters
///
/// - `write`: the output stream
///
/// - `path`: the path of the newly created file
///
/// - `now`: the timestamp of the record that caused the file to be created
pub type HeadFunction = fn(
    write: &mut dyn std::io::Write,
    path: &Path,
    now: &mut DeferredNow,
) -> Result<(), std::io::Error>;

/// A logline-formatter that produces log lines like <br>
/// ```INFO [my_prog::some_submodule] Task successfully read from conf.json```
///
/// # Errors
///
/// See `std::write`
pub fn default_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} [{}] {}",
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        record.args()
    )
}

/// A logline-formatter that produces log lines like
/// <br>
/// ```INFO	main 2016-01-13 15:25:01.640870 +01:00: foo::bar:26: Task successfully read```
/// <br>
/// i.e. with level, thread name, timestamp, module path and line.
///
/// Continuation lines of multi-line messages are prefixed with the level, so that every
/// line of the file can be attributed to its level with simple text tools.
///
/// # Errors
///
/// See `std::write`
pub fn detailed_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let prefix = format!("{}\t", record.level());
    let text = format!(
        "{prefix}{} {}: {}:{}: {}",
        thread::current().name().unwrap_or("<unnamed>"),
        now.format(TS_DASHES_BLANK_COLONS_DOT_BLANK),
        record.module_path().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
        record.args()
    );
    w.write_all(text.replace('\n', &format!("\n{prefix}")).as_bytes())
}

/// A head function that writes a line like <br>
/// ```# Log file logs/app_2024-03-17_0.log, created 2024-03-17 10:25:01.640870 +01:00```
///
/// # Errors
///
/// See `std::write`
pub fn default_head(
    w: &mut dyn std::io::Write,
    path: &Path,
    now: &mut DeferredNow,
) -> Result<(), std::io::Error> {
    writeln!(
        w,
        "# Log file {}, created {}",
        path.display(),
        now.format(TS_DASHES_BLANK_COLONS_DOT_BLANK)
    )
}
