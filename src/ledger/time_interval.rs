use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::BudgetError;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Repetition step of a recurring transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    pub const ALL: [Cadence; 4] = [
        Cadence::Daily,
        Cadence::Weekly,
        Cadence::Monthly,
        Cadence::Yearly,
    ];

    /// Returns the occurrence `steps` cadence units after `anchor`.
    ///
    /// Month and year steps are calendar steps computed from the anchor itself, so a
    /// day-of-month that does not exist in the target month is clamped to that month's
    /// last day without drifting later occurrences (Jan 31, Feb 29, Mar 31, ...).
    /// The anchor's time of day is preserved. `None` once chrono's range is exceeded.
    pub fn advance(self, anchor: NaiveDateTime, steps: u64) -> Option<NaiveDateTime> {
        let steps = i64::try_from(steps).ok()?;
        match self {
            Cadence::Daily => anchor.checked_add_signed(Duration::try_days(steps)?),
            Cadence::Weekly => anchor.checked_add_signed(Duration::try_weeks(steps)?),
            Cadence::Monthly => shift_month(anchor.date(), i32::try_from(steps).ok()?)
                .map(|date| date.and_time(anchor.time())),
            Cadence::Yearly => shift_year(anchor.date(), i32::try_from(steps).ok()?)
                .map(|date| date.and_time(anchor.time())),
        }
    }

    /// Whole cadence units from `anchor` to `target`, estimated from calendar fields.
    ///
    /// The estimate is at most one step away from the exact index of the first
    /// occurrence at or after `target`; callers adjust from there.
    pub(crate) fn steps_between(self, anchor: NaiveDateTime, target: NaiveDateTime) -> i64 {
        match self {
            Cadence::Daily => (target - anchor).num_days(),
            Cadence::Weekly => (target - anchor).num_weeks(),
            Cadence::Monthly => month_index(target.date()) - month_index(anchor.date()),
            Cadence::Yearly => i64::from(target.year() - anchor.year()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
            Cadence::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Cadence::ALL
            .into_iter()
            .find(|cadence| cadence.as_str() == normalized)
            .ok_or_else(|| BudgetError::InvalidCadence(s.to_string()))
    }
}

/// 00:00:00.000 of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::milliseconds(MILLIS_PER_DAY - 1)
}

/// Monday of the ISO week containing `date`; Sunday closes its week.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    days_in_month(first.year(), first.month())
        .map(|days| first + Duration::days(i64::from(days) - 1))
        .unwrap_or(date)
}

pub fn first_day_of_year(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.ordinal0()))
}

pub fn last_day_of_year(date: NaiveDate) -> NaiveDate {
    shift_year(first_day_of_year(date), 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

pub(crate) fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = date.year().checked_mul(12)?.checked_add(date.month0() as i32)?;
    let total = total.checked_add(months)?;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub(crate) fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(days_in_month(year, date.month())?);
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => first_next.pred_opt().map(|last| last.day()),
        // December of chrono's last representable year.
        None if month == 12 => Some(31),
        None => None,
    }
}
