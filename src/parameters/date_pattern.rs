use crate::RollingError;
use chrono::{
    format::{parse, Parsed, StrftimeItems},
    DateTime, NaiveDateTime, Utc,
};
use std::fmt::Write;

/// A date pattern in the syntax of chrono's
/// [`strftime`](https://docs.rs/chrono/latest/chrono/format/strftime/index.html) module.
///
/// Scheduled rotation appends the formatted date to the name of the log file
/// when it renames it, e.g. `.%Y-%m-%d` turns `app.log` into `app.log.2024-03-17`.
/// The pattern also determines the rotation period, see [`Periodicity`](crate::Periodicity),
/// and which files of a directory belong to the rotation family.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DatePattern(String);

impl DatePattern {
    /// Validates the given pattern.
    ///
    /// # Errors
    ///
    /// [`RollingError::InvalidDatePattern`] if the pattern contains items that cannot be
    /// used to format a date without time zone information.
    pub fn try_new<S: Into<String>>(pattern: S) -> Result<Self, RollingError> {
        let pattern = pattern.into();
        let mut rendered = String::new();
        let epoch = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
        if write!(rendered, "{}", epoch.format(&pattern)).is_err() {
            return Err(RollingError::InvalidDatePattern(pattern));
        }
        Ok(Self(pattern))
    }

    /// The pattern as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats the given wall-clock time.
    #[must_use]
    pub fn format(&self, timestamp: &NaiveDateTime) -> String {
        let mut s = String::new();
        // validated in try_new
        write!(s, "{}", timestamp.format(&self.0)).ok();
        s
    }

    /// Returns true if the complete text can be parsed with this pattern.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(&self.0)).is_ok()
    }
}

impl std::fmt::Display for DatePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
