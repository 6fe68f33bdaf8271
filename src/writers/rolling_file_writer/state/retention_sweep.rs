use crate::{util::ErrorCode, DatePattern, ErrorChannel, Retention};
use std::{path::Path, time::SystemTime};

/// Deletes the outdated files of a family of scheduled-rotation log files.
///
/// A file in `directory` belongs to the family if its name starts with `prefix`,
/// and the rest of the name can be parsed completely with `date_pattern`.
/// The file that is named exactly `prefix` is the live file and is never deleted;
/// all other files are ignored.
///
/// Members of the family whose last modification is longer ago than `retention` are
/// deleted. With [`Retention::Forever`], nothing is deleted.
///
/// Problems are reported to `error_channel`; the sweep continues with the next file.
///
/// Returns the number of deleted files.
pub fn sweep_outdated_log_files(
    directory: &Path,
    prefix: &str,
    date_pattern: &DatePattern,
    retention: Retention,
    error_channel: &ErrorChannel,
) -> usize {
    sweep(
        directory,
        prefix,
        date_pattern,
        retention,
        SystemTime::now(),
        error_channel,
    )
}

fn sweep(
    directory: &Path,
    prefix: &str,
    date_pattern: &DatePattern,
    retention: Retention,
    now: SystemTime,
    error_channel: &ErrorChannel,
) -> usize {
    let Some(cutoff) = retention.cutoff(now) else {
        return 0;
    };
    let read_dir = match std::fs::read_dir(directory) {
        Ok(read_dir) => read_dir,
        Err(e) => {
            error_channel.report_err(
                ErrorCode::ListDir,
                &format!("cannot list {}", directory.display()),
                &e,
            );
            return 0;
        }
    };

    let mut deleted = 0;
    for entry in read_dir.filter_map(Result::ok) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        if suffix.is_empty() || !date_pattern.matches(suffix) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        if metadata.modified().is_ok_and(|modified| modified < cutoff) {
            let path = entry.path();
            match std::fs::remove_file(&path) {
                Ok(()) => deleted += 1,
                Err(e) => error_channel.report_err(
                    ErrorCode::Delete,
                    &format!("cannot delete outdated log file {}", path.display()),
                    &e,
                ),
            }
        }
    }
    deleted
}

#[cfg(test)]
mod test {
    use super::sweep;
    use crate::{DatePattern, ErrorChannel, Retention};
    use std::{
        path::Path,
        time::{Duration, SystemTime},
    };

    fn touch(dir: &Path, name: &str, age: Duration, now: SystemTime) {
        let path = dir.join(name);
        std::fs::write(&path, name).unwrap();
        filetime::set_file_mtime(&path, filetime::FileTime::from_system_time(now - age)).unwrap();
    }

    #[test]
    fn test_only_outdated_family_members_are_deleted() {
        let dir = temp_dir::TempDir::new().unwrap();
        let now = SystemTime::now();
        let day = Duration::from_secs(24 * 3600);
        touch(dir.path(), "app.log", 10 * day, now);
        touch(dir.path(), "app.log.2021-06-01", 10 * day, now);
        touch(dir.path(), "app.log.2021-06-09", 2 * day, now);
        touch(dir.path(), "app.log.2021-06-10", day / 2, now);
        touch(dir.path(), "app.log.backup", 10 * day, now);
        touch(dir.path(), "other.log.2021-06-01", 10 * day, now);
        std::fs::create_dir(dir.path().join("app.log.2021-05-01")).unwrap();

        let deleted = sweep(
            dir.path(),
            "app.log",
            &DatePattern::try_new(".%Y-%m-%d").unwrap(),
            Retention::KeepFor(day),
            now,
            &ErrorChannel::DevNull,
        );
        assert_eq!(deleted, 2);

        let mut remaining: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        remaining.sort();
        assert_eq!(
            remaining,
            vec![
                "app.log",
                "app.log.2021-05-01",
                "app.log.2021-06-10",
                "app.log.backup",
                "other.log.2021-06-01"
            ]
        );
    }

    #[test]
    fn test_missing_directory_is_reported() {
        use crate::{ErrorCode, ErrorHandler};
        use std::sync::{Arc, Mutex};

        #[derive(Default)]
        struct Codes(Mutex<Vec<ErrorCode>>);
        impl ErrorHandler for Codes {
            fn report(&self, code: ErrorCode, _msg: &str, _: Option<&dyn std::error::Error>) {
                self.0.lock().unwrap().push(code);
            }
        }

        let codes = Arc::new(Codes::default());
        let dir = temp_dir::TempDir::new().unwrap();
        let deleted = sweep(
            &dir.path().join("missing"),
            "app.log",
            &DatePattern::try_new(".%Y-%m-%d").unwrap(),
            Retention::KeepFor(Duration::from_secs(1)),
            SystemTime::now(),
            &ErrorChannel::Handler(codes.clone()),
        );
        assert_eq!(deleted, 0);
        assert_eq!(*codes.0.lock().unwrap(), vec![ErrorCode::ListDir]);
    }
}
