use std::time::{Duration, SystemTime};

/// Defines how long files that were renamed by scheduled rotation are kept.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Retention {
    /// Files are never deleted.
    Forever,
    /// Files whose last modification is longer ago than the given duration are deleted.
    KeepFor(Duration),
}

impl Default for Retention {
    fn default() -> Self {
        Self::KeepFor(crate::DEFAULT_RETENTION)
    }
}

impl Retention {
    /// Converts a number of seconds; zero and negative values mean [`Retention::Forever`].
    #[must_use]
    pub fn from_seconds(seconds: i64) -> Self {
        match u64::try_from(seconds) {
            Ok(0) | Err(_) => Self::Forever,
            Ok(secs) => Self::KeepFor(Duration::from_secs(secs)),
        }
    }

    // Files with a modification time before the returned point in time are outdated.
    pub(crate) fn cutoff(self, now: SystemTime) -> Option<SystemTime> {
        match self {
            Self::Forever | Self::KeepFor(Duration::ZERO) => None,
            Self::KeepFor(duration) => {
                Some(now.checked_sub(duration).unwrap_or(SystemTime::UNIX_EPOCH))
            }
        }
    }
}
