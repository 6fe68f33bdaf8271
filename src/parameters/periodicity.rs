use super::DatePattern;
use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday,
};

/// The rollover period of scheduled rotation.
///
/// The period is derived from the date pattern with [`Periodicity::detect`]:
/// it is the shortest period for which the pattern produces different texts
/// at the start and at the end of the period.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Periodicity {
    /// Rotate at the top of every minute.
    Minute,
    /// Rotate at the top of every hour.
    Hour,
    /// Rotate at noon and at midnight.
    HalfDay,
    /// Rotate at midnight.
    Day,
    /// Rotate at midnight before the first day of the week.
    Week,
    /// Rotate at midnight before the first day of the month.
    Month,
    /// The pattern produces the same text for all points in time.
    Invalid,
}

const CANDIDATES: [Periodicity; 6] = [
    Periodicity::Minute,
    Periodicity::Hour,
    Periodicity::HalfDay,
    Periodicity::Day,
    Periodicity::Week,
    Periodicity::Month,
];

impl Periodicity {
    /// Detects the rollover period of the given date pattern.
    ///
    /// The pattern is evaluated at the epoch (in UTC) and at the first boundary
    /// of each candidate period after the epoch, in ascending order of the period length;
    /// the first candidate for which the two texts differ wins.
    ///
    /// ```rust
    /// # use rolling_logger::{DatePattern, Periodicity};
    /// # use chrono::Weekday;
    /// let pattern = DatePattern::try_new(".%Y-%m-%d").unwrap();
    /// assert_eq!(Periodicity::detect(&pattern, Weekday::Mon), Periodicity::Day);
    /// ```
    #[must_use]
    pub fn detect(date_pattern: &DatePattern, first_day_of_week: Weekday) -> Self {
        let epoch = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
        let reference = date_pattern.format(&epoch);
        for candidate in CANDIDATES {
            if let Some(next) = candidate.next_boundary(&epoch, first_day_of_week) {
                if date_pattern.format(&next) != reference {
                    return candidate;
                }
            }
        }
        Periodicity::Invalid
    }

    /// The first boundary of this period that lies strictly after `now`,
    /// with all fields below the period's granularity set to zero.
    ///
    /// Returns `None` for [`Periodicity::Invalid`], and if the boundary cannot be
    /// represented.
    #[must_use]
    pub fn next_boundary(
        self,
        now: &NaiveDateTime,
        first_day_of_week: Weekday,
    ) -> Option<NaiveDateTime> {
        let date = now.date();
        match self {
            Self::Minute => {
                let start = date.and_hms_opt(now.hour(), now.minute(), 0)?;
                start.checked_add_signed(Duration::minutes(1))
            }
            Self::Hour => {
                let start = date.and_hms_opt(now.hour(), 0, 0)?;
                start.checked_add_signed(Duration::hours(1))
            }
            Self::HalfDay => {
                if now.hour() < 12 {
                    date.and_hms_opt(12, 0, 0)
                } else {
                    Some(date.succ_opt()?.and_time(NaiveTime::MIN))
                }
            }
            Self::Day => Some(date.succ_opt()?.and_time(NaiveTime::MIN)),
            Self::Week => {
                let days_since_start = (7 + now.weekday().num_days_from_monday()
                    - first_day_of_week.num_days_from_monday())
                    % 7;
                let start_of_week =
                    date.checked_sub_signed(Duration::days(i64::from(days_since_start)))?;
                Some(
                    start_of_week
                        .checked_add_signed(Duration::days(7))?
                        .and_time(NaiveTime::MIN),
                )
            }
            Self::Month => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                Some(NaiveDate::from_ymd_opt(year, month, 1)?.and_time(NaiveTime::MIN))
            }
            Self::Invalid => None,
        }
    }
}
