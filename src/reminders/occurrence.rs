//! Occurrence engine: next-occurrence calculation, the upcoming filter and
//! range projection.
//!
//! All dates are naive calendar dates. Occurrences are found by stepping a
//! cursor from the anchor one recurrence unit at a time. Month and year steps
//! clamp to the end of a short target month and the clamped day carries
//! forward: Jan 31 gives Feb 29, Mar 29, Apr 29, ... and a Feb 29 yearly
//! anchor stays on Feb 28 once it has passed a common year.

use chrono::{Datelike, Days, Months, NaiveDate};

use super::reminder::{Recurrence, Reminder};

impl Recurrence {
    /// The occurrence following `date`. `None` for one-time reminders and at
    /// the end of the calendar.
    pub fn step(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => date.checked_add_days(Days::new(1)),
            Recurrence::Weekly => date.checked_add_days(Days::new(7)),
            Recurrence::Monthly => date.checked_add_months(Months::new(1)),
            Recurrence::Yearly => date.checked_add_months(Months::new(12)),
        }
    }

    // No later step from `date` can clamp the day, so `k` steps equal one
    // jump of `k` units.
    fn is_steady(self, date: NaiveDate) -> bool {
        match self {
            Recurrence::Monthly => date.day() <= 28,
            Recurrence::Yearly => !(date.month() == 2 && date.day() == 29),
            Recurrence::None | Recurrence::Daily | Recurrence::Weekly => true,
        }
    }

    fn jump(self, date: NaiveDate, k: u32) -> Option<NaiveDate> {
        match self {
            Recurrence::None => (k == 0).then_some(date),
            Recurrence::Daily => date.checked_add_days(Days::new(u64::from(k))),
            Recurrence::Weekly => date.checked_add_days(Days::new(u64::from(k) * 7)),
            Recurrence::Monthly => date.checked_add_months(Months::new(k)),
            Recurrence::Yearly => date.checked_add_months(Months::new(k.checked_mul(12)?)),
        }
    }

    /// Steps needed from a steady `from` before `reference` to land on or
    /// after it.
    fn steps_to_reach(self, from: NaiveDate, reference: NaiveDate) -> Option<u32> {
        match self {
            Recurrence::None => None,
            Recurrence::Daily => days_steps(from, reference, 1),
            Recurrence::Weekly => days_steps(from, reference, 7),
            Recurrence::Monthly => {
                let months = (reference.year() - from.year()) * 12 + reference.month() as i32
                    - from.month() as i32;
                self.settle(from, reference, u32::try_from(months).ok()?)
            }
            Recurrence::Yearly => {
                let years = reference.year() - from.year();
                self.settle(from, reference, u32::try_from(years).ok()?)
            }
        }
    }

    // `k` lands in the reference's own month (or year); if that occurrence is
    // still before the reference, the next one is after it.
    fn settle(self, from: NaiveDate, reference: NaiveDate, k: u32) -> Option<u32> {
        if self.jump(from, k)? < reference {
            k.checked_add(1)
        } else {
            Some(k)
        }
    }
}

fn days_steps(from: NaiveDate, reference: NaiveDate, step: i64) -> Option<u32> {
    let gap = (reference - from).num_days();
    u32::try_from((gap + step - 1) / step).ok()
}

/// First occurrence of a reminder on or after `reference`.
///
/// One-time reminders yield their anchor if it is not in the past. Recurring
/// ones never return `None` except at the end of the representable calendar.
pub fn next_occurrence(
    anchor: NaiveDate,
    recurrence: Recurrence,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    let mut cursor = anchor;
    // A month-end cursor settles on day 28 or 29 within two years.
    while cursor < reference && !recurrence.is_steady(cursor) {
        cursor = recurrence.step(cursor)?;
    }
    if cursor >= reference {
        return Some(cursor);
    }
    let k = recurrence.steps_to_reach(cursor, reference)?;
    recurrence.jump(cursor, k)
}

/// Occurrences of a reminder on or after `from`, in order.
pub fn occurrences_from(
    anchor: NaiveDate,
    recurrence: Recurrence,
    from: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(next_occurrence(anchor, recurrence, from), move |d| {
        recurrence.step(*d)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceWindow {
    pub reference_date: NaiveDate,
    pub horizon_weeks: u32,
}

impl OccurrenceWindow {
    pub fn new(reference_date: NaiveDate, horizon_weeks: u32) -> Self {
        Self {
            reference_date,
            horizon_weeks,
        }
    }

    /// Last day of the window, inclusive.
    pub fn end_date(&self) -> NaiveDate {
        self.reference_date
            .checked_add_days(Days::new(u64::from(self.horizon_weeks) * 7))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.reference_date <= date && date <= self.end_date()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEntry {
    pub reminder: Reminder,
    pub next_occurrence_date: NaiveDate,
}

/// Reminders whose next occurrence falls inside `window`, soonest first.
///
/// Reminders sharing a date keep their input order.
pub fn filter_upcoming(reminders: &[Reminder], window: &OccurrenceWindow) -> Vec<UpcomingEntry> {
    let mut upcoming: Vec<UpcomingEntry> = reminders
        .iter()
        .filter_map(|r| {
            let date = next_occurrence(r.anchor_date, r.recurrence, window.reference_date)?;
            window.contains(date).then(|| UpcomingEntry {
                reminder: r.clone(),
                next_occurrence_date: date,
            })
        })
        .collect();
    upcoming.sort_by_key(|e| e.next_occurrence_date);
    upcoming
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub reminder: Reminder,
    pub date: NaiveDate,
}

/// Every occurrence of every reminder between `start` and `end` inclusive,
/// sorted by date.
pub fn project_occurrences(
    reminders: &[Reminder],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Occurrence> {
    if end < start {
        return Vec::new();
    }
    let mut projected: Vec<Occurrence> = reminders
        .iter()
        .flat_map(|r| {
            occurrences_from(r.anchor_date, r.recurrence, start)
                .take_while(move |d| *d <= end)
                .map(move |date| Occurrence {
                    reminder: r.clone(),
                    date,
                })
        })
        .collect();
    projected.sort_by_key(|o| o.date);
    projected
}
