//! Error codes of `rolling_logger`.
//!
//! Writers of `rolling_logger` never let a problem with the file system abort a log call.
//! They report the problem instead through their
//! [`ErrorChannel`](crate::ErrorChannel), and continue with the file handle they still have.
//! Each report carries one of the following [`ErrorCode`](crate::ErrorCode)s.
//!
//! ## `Write`
//!
//! Writing the log line to the output failed.
//!
//! Example:
//!
//! ```text
//! [rolling_logger][ERRCODE::Write] writing failed, caused by Os { code: 28, kind: StorageFull, .. }
//! ```
//!
//! The log line is lost; the next log line is tried again.
//!
//! ## `Flush`
//!
//! Flushing buffered log lines to the output failed, either after a log line was written,
//! or when a file was closed during rotation.
//!
//! ## `Format`
//!
//! The chosen format function, or the head function, had produced an error.
//!
//! ## `Poison`
//!
//! Log entries can be written by all threads of your program. Writers thus must be
//! thread-safe, by keeping their mutable parts in `Mutex`es. In case that a thread panics
//! while owning one of these locks, the lock is subsequently considered "poisoned".
//!
//! Most likely the root cause for this is some panic! in a `Debug` or `Display`
//! implementation of a logged object.
//!
//! ## `Open`
//!
//! A log file could not be created or opened, e.g. because the directory was removed
//! or is not writable.
//!
//! With size-bound and date-bound rotation, the writer continues to write to the previously
//! active file. With scheduled rotation, the writer tries to reopen the file with the next
//! log line.
//!
//! ```text
//! [rolling_logger][ERRCODE::Open] cannot open log file "logs/app_2024-03-17_1.log", caused by ...
//! ```
//!
//! ## `Rename`
//!
//! During rotation, the active log file could not be renamed.
//!
//! ## `Delete`
//!
//! A file could not be deleted, either an outdated file during the retention sweep,
//! or a file that occupied the target name of a scheduled rollover.
//!
//! ## `ListDir`
//!
//! The directory of a rotation family could not be listed, so the retention sweep
//! could not be done.
//!
