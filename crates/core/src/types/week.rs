//! Weekly list windows.
//!
//! A family's lists cover consecutive seven-day windows that begin on the
//! rollover day. The window for "this week" is found from a calendar date;
//! the window after an archived list is derived from that list's own start so
//! the sequence never gaps or overlaps, however late archival runs.

use core::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Days between a window's start and its last day.
const LAST_DAY_OFFSET: u64 = 6;

/// Days between the starts of two consecutive windows.
const WEEK: u64 = 7;

/// Error returned when a weekday name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid weekday: {0}")]
pub struct RolloverDayError(String);

/// The weekday on which the active list is archived and replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RolloverDay(Weekday);

impl RolloverDay {
    /// Create a rollover day from a weekday.
    #[must_use]
    pub const fn new(day: Weekday) -> Self {
        Self(day)
    }

    /// The underlying weekday.
    #[must_use]
    pub const fn weekday(self) -> Weekday {
        self.0
    }

    /// Returns true if `day` is the rollover day.
    #[must_use]
    pub fn is(self, day: Weekday) -> bool {
        self.0 == day
    }

    /// Lower-case English name, e.g. `saturday`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        weekday_name(self.0)
    }
}

impl Default for RolloverDay {
    fn default() -> Self {
        Self(Weekday::Sat)
    }
}

impl fmt::Display for RolloverDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RolloverDay {
    type Err = RolloverDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_weekday(s).map(Self)
    }
}

/// Parse an English weekday name, full or abbreviated, in any case.
///
/// # Errors
///
/// Returns [`RolloverDayError`] if the name is not a weekday.
pub fn parse_weekday(s: &str) -> Result<Weekday, RolloverDayError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| RolloverDayError(s.to_owned()))
}

/// Lower-case English name of a weekday.
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// A seven-day window: `end` is always `start + 6 days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeekWindow {
    /// Window starting on `start`.
    #[must_use]
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Days::new(LAST_DAY_OFFSET),
        }
    }

    /// Window that contains `today`: it starts on the most recent rollover
    /// day on or before `today`.
    ///
    /// ```
    /// use chrono::{NaiveDate, Weekday};
    /// use shopping_planner_core::{RolloverDay, WeekWindow};
    ///
    /// // 2024-01-09 is a Tuesday.
    /// let today = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
    /// let window = WeekWindow::containing(today, RolloverDay::new(Weekday::Sat));
    /// assert_eq!(window.start(), NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
    /// assert_eq!(window.end(), NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
    /// ```
    #[must_use]
    pub fn containing(today: NaiveDate, rollover: RolloverDay) -> Self {
        let today_idx = today.weekday().num_days_from_monday();
        let rollover_idx = rollover.weekday().num_days_from_monday();
        let back = (today_idx + 7 - rollover_idx) % 7;
        Self::starting(today - Days::new(u64::from(back)))
    }

    /// The window right after this one.
    #[must_use]
    pub fn following(self) -> Self {
        Self::starting(self.start + Days::new(WEEK))
    }

    /// First day of the window.
    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    /// Last day of the window (inclusive).
    #[must_use]
    pub const fn end(self) -> NaiveDate {
        self.end
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const SATURDAY: RolloverDay = RolloverDay::new(Weekday::Sat);

    #[test]
    fn test_containing_on_rollover_day_is_inclusive() {
        let window = WeekWindow::containing(date(2024, 1, 6), SATURDAY);
        assert_eq!(window.start(), date(2024, 1, 6));
        assert_eq!(window.end(), date(2024, 1, 12));
    }

    #[test]
    fn test_containing_day_before_rollover() {
        // Friday belongs to the window that began the previous Saturday.
        let window = WeekWindow::containing(date(2024, 1, 12), SATURDAY);
        assert_eq!(window.start(), date(2024, 1, 6));
    }

    #[test]
    fn test_containing_every_day_of_week() {
        for offset in 0..7 {
            let today = date(2024, 1, 6) + Days::new(offset);
            let window = WeekWindow::containing(today, SATURDAY);
            assert_eq!(window.start(), date(2024, 1, 6));
            assert!(window.start() <= today && today <= window.end());
        }
    }

    #[test]
    fn test_containing_other_rollover_day() {
        // 2024-03-01 is a Friday; Monday rollover puts it in the 02-26 window.
        let window = WeekWindow::containing(date(2024, 3, 1), RolloverDay::new(Weekday::Mon));
        assert_eq!(window.start(), date(2024, 2, 26));
        assert_eq!(window.end(), date(2024, 3, 3));
    }

    #[test]
    fn test_following_is_contiguous() {
        let window = WeekWindow::starting(date(2024, 1, 6)).following();
        assert_eq!(window.start(), date(2024, 1, 13));
        assert_eq!(window.end(), date(2024, 1, 19));
    }

    #[test]
    fn test_following_ignores_today() {
        // Archiving three weeks late still yields the next window in sequence.
        let old = WeekWindow::starting(date(2024, 1, 6));
        let late_today = date(2024, 1, 27);
        assert_ne!(WeekWindow::containing(late_today, SATURDAY), old.following());
        assert_eq!(old.following().start(), date(2024, 1, 13));
    }

    #[test]
    fn test_following_crosses_year_boundary() {
        let window = WeekWindow::starting(date(2023, 12, 30)).following();
        assert_eq!(window.start(), date(2024, 1, 6));
    }

    #[test]
    fn test_rollover_day_parse() {
        assert_eq!("Saturday".parse::<RolloverDay>().unwrap(), SATURDAY);
        assert_eq!(" sat ".parse::<RolloverDay>().unwrap(), SATURDAY);
        assert_eq!(
            "TUESDAY".parse::<RolloverDay>().unwrap().weekday(),
            Weekday::Tue
        );
        assert!("someday".parse::<RolloverDay>().is_err());
    }

    #[test]
    fn test_rollover_day_default_is_saturday() {
        assert_eq!(RolloverDay::default().to_string(), "saturday");
    }
}
