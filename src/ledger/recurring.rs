//! Projection of recurring incomes and expenses into reporting windows.
//!
//! Recurring records are stored once; their occurrences are derived on demand. Occurrence
//! `k` of a series is its anchor advanced by `k` cadence steps (see [`Cadence::advance`]),
//! so the anchor itself is occurrence zero.

use chrono::NaiveDateTime;

use super::{
    common::{Amounted, Scheduled},
    time_interval::Cadence,
};

/// Number of occurrences of `item` inside `[range_start, range_end]`, both ends inclusive.
///
/// Occurrences are compared as exact instants, time of day included. Windows ended with
/// [`crate::core::dates::parse_window_end`] run to 23:59:59.999, so every day they span
/// counts once whatever the series' time of day.
pub fn count_occurrences<T>(
    item: &T,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> u64
where
    T: Scheduled + ?Sized,
{
    let anchor = item.anchor();
    let Some(cadence) = item.cadence() else {
        return u64::from(anchor >= range_start && anchor <= range_end);
    };
    let effective_start = anchor.max(range_start);
    if effective_start > range_end {
        return 0;
    }
    let first_inside = first_index(cadence, anchor, effective_start, |occ| {
        occ >= effective_start
    });
    let first_after = first_index(cadence, anchor, range_end, |occ| occ > range_end);
    first_after.saturating_sub(first_inside)
}

/// Total contributed by `item` inside `[range_start, range_end]`.
pub fn project_recurring_total<T>(
    item: &T,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> f64
where
    T: Amounted + Scheduled + ?Sized,
{
    let occurrences = count_occurrences(item, range_start, range_end);
    if occurrences == 0 {
        return 0.0;
    }
    occurrences as f64 * item.amount()
}

/// Sum of [`project_recurring_total`] over every item.
pub fn project_totals<'a, T, I>(
    items: I,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> f64
where
    T: Amounted + Scheduled + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| project_recurring_total(item, range_start, range_end))
        .sum()
}

/// First occurrence at or after `after`, if any.
pub fn next_occurrence<T>(item: &T, after: NaiveDateTime) -> Option<NaiveDateTime>
where
    T: Scheduled + ?Sized,
{
    let anchor = item.anchor();
    match item.cadence() {
        None => (anchor >= after).then_some(anchor),
        Some(cadence) => {
            let index = first_index(cadence, anchor, after, |occ| occ >= after);
            cadence.advance(anchor, index)
        }
    }
}

/// Concrete occurrence instants of `item` inside `[range_start, range_end]`, ascending.
///
/// Yields exactly [`count_occurrences`] items for the same range.
pub fn occurrences_between<T>(
    item: &T,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
) -> Occurrences
where
    T: Scheduled + ?Sized,
{
    let anchor = item.anchor();
    let cadence = item.cadence();
    let index = match cadence {
        Some(cadence) => {
            let start = anchor.max(range_start);
            first_index(cadence, anchor, start, |occ| occ >= start)
        }
        None => 0,
    };
    Occurrences {
        anchor,
        cadence,
        range_start,
        range_end,
        index,
        finished: false,
    }
}

/// Iterator returned by [`occurrences_between`].
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: NaiveDateTime,
    cadence: Option<Cadence>,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    index: u64,
    finished: bool,
}

impl Iterator for Occurrences {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let candidate = match self.cadence {
            Some(cadence) => cadence.advance(self.anchor, self.index)?,
            None if self.index == 0 => self.anchor,
            None => return None,
        };
        if candidate < self.range_start || candidate > self.range_end {
            self.finished = true;
            return None;
        }
        self.index += 1;
        Some(candidate)
    }
}

/// Smallest occurrence index whose instant satisfies `reached`.
///
/// `reached` must be monotone over the (ascending) occurrence sequence. The search starts
/// from the calendar estimate for `target` and walks at most a couple of steps. An index
/// beyond chrono's representable range counts as reached.
fn first_index<F>(
    cadence: Cadence,
    anchor: NaiveDateTime,
    target: NaiveDateTime,
    reached: F,
) -> u64
where
    F: Fn(NaiveDateTime) -> bool,
{
    let is_reached = |index: u64| cadence.advance(anchor, index).map_or(true, &reached);
    let mut index = u64::try_from(cadence.steps_between(anchor, target).max(0)).unwrap_or(0);
    while index > 0 && is_reached(index - 1) {
        index -= 1;
    }
    while !is_reached(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{BudgetId, Expense, Income, UserId};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn at_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn expense(amount: f64, date: NaiveDateTime, cadence: Option<Cadence>) -> Expense {
        let expense = Expense::new(UserId::new(), BudgetId::new(), amount, date);
        match cadence {
            Some(cadence) => expense.with_recurrence(cadence),
            None => expense,
        }
    }

    #[test]
    fn one_off_counts_only_inside_window() {
        let item = expense(40.0, at(2024, 1, 10), None);
        let total = |start, end| project_recurring_total(&item, start, end);
        assert_eq!(total(at(2024, 1, 1), at(2024, 1, 31)), 40.0);
        assert_eq!(total(at(2024, 1, 10), at(2024, 1, 10)), 40.0);
        assert_eq!(total(at(2024, 1, 11), at(2024, 1, 31)), 0.0);
    }

    #[test]
    fn monthly_income_over_quarter() {
        let salary = Income::new(UserId::new(), "Salary", 1000.0, at(2024, 1, 15))
            .with_recurrence(Cadence::Monthly);
        assert_eq!(
            project_recurring_total(&salary, at(2024, 1, 1), at(2024, 3, 31)),
            3000.0
        );
    }

    #[test]
    fn daily_expense_counts_each_day() {
        let coffee = expense(5.0, at(2024, 3, 1), Some(Cadence::Daily));
        assert_eq!(count_occurrences(&coffee, at(2024, 3, 5), at(2024, 3, 10)), 6);
        assert_eq!(
            project_recurring_total(&coffee, at(2024, 3, 5), at(2024, 3, 10)),
            30.0
        );
    }

    #[test]
    fn weekly_occurrences_keep_anchor_phase() {
        // Anchored on a Wednesday.
        let gym = expense(10.0, at(2024, 1, 3), Some(Cadence::Weekly));
        // Jan 10, 17, 24, 31.
        assert_eq!(count_occurrences(&gym, at(2024, 1, 4), at(2024, 1, 31)), 4);
        assert_eq!(count_occurrences(&gym, at(2024, 1, 4), at(2024, 1, 9)), 0);
    }

    #[test]
    fn yearly_counts_anniversaries() {
        let insurance = expense(600.0, at(2020, 2, 29), Some(Cadence::Yearly));
        // 2021-02-28, 2022-02-28, 2023-02-28, 2024-02-29.
        assert_eq!(
            count_occurrences(&insurance, at(2021, 1, 1), at(2024, 12, 31)),
            4
        );
    }

    #[test]
    fn monthly_end_of_month_anchor_clamps() {
        let rent = expense(900.0, at(2024, 1, 31), Some(Cadence::Monthly));
        let dates: Vec<_> =
            occurrences_between(&rent, at(2024, 1, 1), at(2024, 5, 31)).collect();
        assert_eq!(
            dates,
            vec![
                at(2024, 1, 31),
                at(2024, 2, 29),
                at(2024, 3, 31),
                at(2024, 4, 30),
                at(2024, 5, 31),
            ]
        );
        assert_eq!(count_occurrences(&rent, at(2024, 2, 1), at(2024, 2, 29)), 1);
    }

    #[test]
    fn series_starting_after_window_contributes_nothing() {
        let item = expense(12.0, at(2024, 6, 1), Some(Cadence::Daily));
        assert_eq!(
            project_recurring_total(&item, at(2024, 1, 1), at(2024, 5, 31)),
            0.0
        );
    }

    #[test]
    fn anchor_on_range_start_counts_once() {
        for cadence in Cadence::ALL {
            let item = expense(7.0, at(2024, 4, 1), Some(cadence));
            assert_eq!(
                count_occurrences(&item, at(2024, 4, 1), at(2024, 4, 1)),
                1,
                "{cadence}"
            );
        }
    }

    #[test]
    fn adjacent_windows_add_up() {
        let end_of_first = NaiveDate::from_ymd_opt(2024, 2, 14)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        let start_of_second = end_of_first + chrono::Duration::milliseconds(1);
        for cadence in Cadence::ALL {
            let item = expense(3.0, at_hm(2023, 11, 30, 9, 15), Some(cadence));
            let left = count_occurrences(&item, at(2024, 1, 1), end_of_first);
            let right = count_occurrences(&item, start_of_second, at(2024, 12, 31));
            let whole = count_occurrences(&item, at(2024, 1, 1), at(2024, 12, 31));
            assert_eq!(left + right, whole, "{cadence}");
        }
    }

    #[test]
    fn time_of_day_is_respected_at_window_edges() {
        let item = expense(1.0, at_hm(2024, 1, 1, 12, 0), Some(Cadence::Daily));
        // The Jan 3 occurrence at noon is after the window's end at midnight.
        assert_eq!(count_occurrences(&item, at(2024, 1, 2), at(2024, 1, 3)), 1);
        let end_of_day = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap();
        assert_eq!(count_occurrences(&item, at(2024, 3, 5), end_of_day), 6);
    }

    #[test]
    fn listing_matches_count_over_long_windows() {
        let item = expense(2.0, at(2024, 1, 1), Some(Cadence::Daily));
        let end = at_hm(2026, 12, 31, 23, 0);
        let listed = occurrences_between(&item, at(2024, 1, 1), end).count() as u64;
        assert_eq!(listed, count_occurrences(&item, at(2024, 1, 1), end));
        assert_eq!(listed, 1096);
    }

    #[test]
    fn long_windows_do_not_walk_every_step() {
        let item = expense(1.0, at(1990, 1, 1), Some(Cadence::Daily));
        let count = count_occurrences(&item, at(2000, 1, 1), at(2099, 12, 31));
        // 100 years starting 2000-01-01 hold 36525 days.
        assert_eq!(count, 36_525);
    }

    #[test]
    fn next_occurrence_follows_cadence() {
        let item = expense(1.0, at(2024, 1, 31), Some(Cadence::Monthly));
        assert_eq!(next_occurrence(&item, at(2024, 2, 1)), Some(at(2024, 2, 29)));
        assert_eq!(next_occurrence(&item, at(2023, 1, 1)), Some(at(2024, 1, 31)));

        let once = expense(1.0, at(2024, 1, 31), None);
        assert_eq!(next_occurrence(&once, at(2024, 2, 1)), None);
    }

    #[test]
    fn project_totals_sums_mixed_items() {
        let items = vec![
            expense(10.0, at(2024, 1, 5), None),
            expense(2.0, at(2024, 1, 1), Some(Cadence::Weekly)),
            expense(99.0, at(2023, 12, 31), None),
        ];
        // 10 + 2 * (Jan 1, 8, 15, 22, 29).
        assert_eq!(project_totals(&items, at(2024, 1, 1), at(2024, 1, 31)), 20.0);
    }
}
