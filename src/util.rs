use std::{
    cell::RefCell,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Classifies the problems that a writer reports through its [`ErrorChannel`].
///
/// See module [`error_info`](crate::error_info) for details.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Writing the log line to the output failed.
    Write,
    /// Flushing buffered log lines to the output failed.
    Flush,
    /// The format function produced an error.
    Format,
    /// Some lock was poisoned.
    Poison,
    /// A log file could not be created or opened.
    Open,
    /// A log file could not be renamed during rotation.
    Rename,
    /// An outdated or replaced log file could not be deleted.
    Delete,
    /// A directory could not be listed for the retention sweep.
    ListDir,
}
impl ErrorCode {
    fn as_index(self) -> &'static str {
        match self {
            Self::Write => "write",
            Self::Flush => "flush",
            Self::Format => "format",
            Self::Poison => "poison",
            Self::Open => "open",
            Self::Rename => "rename",
            Self::Delete => "delete",
            Self::ListDir => "listdir",
        }
    }
}

/// Receives the problems a writer runs into while writing.
///
/// Implement this trait to route such problems to your own monitoring,
/// and register the implementation with [`ErrorChannel::Handler`].
pub trait ErrorHandler: Send + Sync {
    /// Is called once per problem.
    fn report(&self, code: ErrorCode, msg: &str, cause: Option<&dyn std::error::Error>);
}

/// Describes where a writer reports the problems it runs into.
///
/// Writers never propagate problems with the file system to the log call site;
/// instead they report them here and continue.
#[derive(Clone, Default)]
pub enum ErrorChannel {
    /// Write reports to stderr.
    #[default]
    StdErr,
    /// Write reports to stdout.
    StdOut,
    /// Append reports to the given file.
    File(PathBuf),
    /// Don't write reports at all.
    DevNull,
    /// Hand reports to the given handler.
    Handler(Arc<dyn ErrorHandler>),
}
impl std::fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::StdErr => f.write_str("StdErr"),
            Self::StdOut => f.write_str("StdOut"),
            Self::File(path) => f.write_fmt(format_args!("File({})", path.display())),
            Self::DevNull => f.write_str("DevNull"),
            Self::Handler(_) => f.write_str("Handler(<..>)"),
        }
    }
}
impl ErrorChannel {
    pub(crate) fn report_err(&self, code: ErrorCode, msg: &str, err: &dyn std::error::Error) {
        self.report(code, msg, Some(err));
    }

    pub(crate) fn report_msg(&self, code: ErrorCode, msg: &str) {
        self.report(code, msg, None);
    }

    fn report(&self, code: ErrorCode, msg: &str, o_err: Option<&dyn std::error::Error>) {
        if let Self::Handler(handler) = self {
            handler.report(code, msg, o_err);
            return;
        }
        let s = match o_err {
            Some(err) => format!(
                "[rolling_logger][ERRCODE::{code:?}] {msg}, caused by {err:?}\n    \
                 See https://docs.rs/rolling_logger/latest/rolling_logger/error_info/index.html#{}",
                code.as_index()
            ),
            None => format!(
                "[rolling_logger][ERRCODE::{code:?}] {msg}\n    \
                 See https://docs.rs/rolling_logger/latest/rolling_logger/error_info/index.html#{}",
                code.as_index()
            ),
        };
        match self {
            Self::StdErr => eprintln!("{s}"),
            Self::StdOut => println!("{s}"),
            Self::File(path) => try_to_write_to_file(&s, path).unwrap_or_else(|e| {
                eprintln!("{s}");
                eprintln!("Can't open error output file, caused by {e}");
            }),
            Self::DevNull | Self::Handler(_) => {}
        }
    }
}

fn try_to_write_to_file(s: &str, path: &Path) -> Result<(), std::io::Error> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{s}")?;
    file.flush()
}

// Thread-local buffer
pub(crate) fn buffer_with<F>(f: F)
where
    F: FnOnce(&RefCell<Vec<u8>>),
{
    thread_local! {
        static BUFFER: RefCell<Vec<u8>> = RefCell::new(Vec::with_capacity(200));
    }
    BUFFER.with(f);
}
