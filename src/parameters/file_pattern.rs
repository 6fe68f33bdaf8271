use crate::RollingError;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

const DATE_TOKEN: &str = "%d";
const UNIQUE_TOKEN: &str = "%u";
const DAY_FORMAT: &str = "%Y-%m-%d";

// Upper limit for probing values of the uniqueness placeholder.
pub(crate) const MAX_UNIQUE_PROBES: u32 = 10_000;

/// Template for the names of the log files of size-bound and date-bound rotation.
///
/// The pattern describes the path of a log file and contains two placeholders:
///
/// - `%d` is replaced with the date (formatted as `YYYY-MM-DD`),
/// - `%u` is replaced with a number that is chosen such that the resulting file
///   does not yet exist.
///
/// If a placeholder is missing, it is appended at the end of the pattern;
/// `"logs/app"` thus becomes `"logs/app%d%u"`.
///
/// ```rust
/// # use rolling_logger::FilePattern;
/// assert_eq!(FilePattern::try_new("app_%d").unwrap().as_str(), "app_%d%u");
/// assert_eq!(FilePattern::try_new("%u_app_%d.log").unwrap().as_str(), "%u_app_%d.log");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilePattern(String);

impl FilePattern {
    /// Validates the given pattern and appends missing placeholders.
    ///
    /// # Errors
    ///
    /// [`RollingError::InvalidPattern`] if the pattern is empty or contains
    /// a placeholder more than once.
    pub fn try_new<S: Into<String>>(pattern: S) -> Result<Self, RollingError> {
        let mut pattern = pattern.into();
        if pattern.is_empty() {
            return Err(RollingError::InvalidPattern("pattern is empty".to_string()));
        }
        for token in [DATE_TOKEN, UNIQUE_TOKEN] {
            match pattern.matches(token).count() {
                0 => pattern.push_str(token),
                1 => {}
                _ => {
                    return Err(RollingError::InvalidPattern(format!(
                        "{pattern:?} contains {token} more than once"
                    )))
                }
            }
        }
        Ok(Self(pattern))
    }

    /// The normalized pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the pattern for the given timestamp into the path of a file
    /// that does not yet exist.
    ///
    /// The uniqueness placeholder is first replaced with `start_unique`;
    /// as long as the resulting file exists, the value is incremented.
    ///
    /// Returns the path and the value that produced it;
    /// the caller continues from this value with its next resolution.
    ///
    /// The file is neither created nor opened.
    ///
    /// # Errors
    ///
    /// [`RollingError::NoFreeFileName`] if no free name was found within a reasonable
    /// number of attempts.
    pub fn resolve(
        &self,
        timestamp: &NaiveDateTime,
        start_unique: u32,
    ) -> Result<(PathBuf, u32), RollingError> {
        self.resolve_collision_free(&Self::date_text(timestamp), start_unique, None)
    }

    // Like resolve(), but a generated path that is equal to o_reusable is accepted
    // even if it exists.
    pub(crate) fn resolve_collision_free(
        &self,
        date_text: &str,
        start_unique: u32,
        o_reusable: Option<&Path>,
    ) -> Result<(PathBuf, u32), RollingError> {
        let mut unique = start_unique;
        for _ in 0..MAX_UNIQUE_PROBES {
            let candidate = self.fill(date_text, unique);
            if o_reusable == Some(candidate.as_path()) || !candidate.exists() {
                return Ok((candidate, unique));
            }
            match unique.checked_add(1) {
                Some(next) => unique = next,
                None => break,
            }
        }
        Err(RollingError::NoFreeFileName(self.0.clone()))
    }

    pub(crate) fn date_text(timestamp: &NaiveDateTime) -> String {
        timestamp.format(DAY_FORMAT).to_string()
    }

    pub(crate) fn fill(&self, date_text: &str, unique: u32) -> PathBuf {
        PathBuf::from(
            self.0
                .replace(DATE_TOKEN, date_text)
                .replace(UNIQUE_TOKEN, &unique.to_string()),
        )
    }

    // A pattern for the same files, with some text appended to the file name.
    pub(crate) fn with_appendix(&self, appendix: &str) -> Self {
        let mut s = self.0.clone();
        s.push_str(appendix);
        Self(s)
    }

    // The folder of the files, if it does not depend on a placeholder.
    pub(crate) fn fixed_directory(&self) -> Option<PathBuf> {
        let parent = Path::new(&self.0).parent()?;
        let s = parent.to_string_lossy();
        if s.is_empty() || s.contains(DATE_TOKEN) || s.contains(UNIQUE_TOKEN) {
            None
        } else {
            Some(parent.to_path_buf())
        }
    }
}

impl std::fmt::Display for FilePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
