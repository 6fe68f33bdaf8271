use chrono::{
    format::{DelayedFormat, StrftimeItems},
    DateTime, Local, NaiveDateTime, Utc,
};

/// Deferred timestamp creation.
///
/// Is used to ensure that a log record that is sent to multiple outputs
/// (in maybe different formats) always uses the same timestamp.
///
/// The timestamp is also what the rolling writers use to decide about rotation:
/// the date-bound rotation puts a record into the file of the record's own day,
/// so a record that is created with [`DeferredNow::new_from_datetime`] and an older timestamp
/// still lands in the file for that older day.
#[derive(Debug)]
pub struct DeferredNow(Option<DateTime<Local>>);
impl Default for DeferredNow {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DeferredNow {
    /// Constructs a new instance, but does not generate the timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(None)
    }

    /// Constructs a new instance with the given timestamp.
    #[must_use]
    pub fn new_from_datetime(dt: DateTime<Local>) -> Self {
        Self(Some(dt))
    }

    /// Retrieve the timestamp.
    ///
    /// Requires mutability because the first caller will generate the timestamp.
    pub fn now(&'a mut self) -> &'a DateTime<Local> {
        self.0.get_or_insert_with(Local::now)
    }

    /// Retrieve the UTC timestamp.
    ///
    /// Requires mutability because the first caller will generate the timestamp.
    pub fn now_utc_owned(&'a mut self) -> DateTime<Utc> {
        (*self.now()).into()
    }

    /// Produces a preformatted object suitable for printing.
    ///
    /// # Panics
    ///
    /// Panics if `fmt` has an inappropriate value.
    pub fn format<'b>(&'a mut self, fmt: &'b str) -> DelayedFormat<StrftimeItems<'b>> {
        self.now().format(fmt)
    }

    // The wall-clock time on which all calendar decisions of the rotation are based.
    pub(crate) fn wall_clock(&mut self, use_utc: bool) -> NaiveDateTime {
        if use_utc {
            self.now_utc_owned().naive_utc()
        } else {
            self.now().naive_local()
        }
    }
}

#[cfg(test)]
mod test {
    use chrono::{Local, TimeZone, Timelike};

    #[test]
    fn test_deferred_now() {
        let mut deferred_now = super::DeferredNow::new();
        let now = deferred_now.now().to_string();
        println!("This should be the current timestamp: {now}");
        std::thread::sleep(std::time::Duration::from_millis(300));
        let again = deferred_now.now().to_string();
        println!("This must be the same timestamp:      {again}");
        assert_eq!(now, again);
    }

    #[test]
    fn test_wall_clock_of_given_timestamp() {
        let ts = Local.with_ymd_and_hms(2021, 6, 14, 22, 15, 0).unwrap();
        let mut deferred_now = super::DeferredNow::new_from_datetime(ts);
        let wall = deferred_now.wall_clock(false);
        assert_eq!(wall.hour(), 22);
        assert_eq!(wall.minute(), 15);
        assert_eq!(deferred_now.wall_clock(true), ts.naive_utc());
    }
}
