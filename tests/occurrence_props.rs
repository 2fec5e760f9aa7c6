//! Property tests for the occurrence engine.

use chrono::{Days, Months, NaiveDate};
use proptest::prelude::*;

use reminder_tui::reminders::{
    filter_upcoming, next_occurrence, project_occurrences, OccurrenceWindow, Recurrence, Reminder,
    UpcomingEntry,
};

// =============================================================================
// Strategies
// =============================================================================

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 plus up to ~40 years.
    (0u64..14_600).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    })
}

fn arb_recurrence() -> impl Strategy<Value = Recurrence> {
    prop_oneof![
        Just(Recurrence::None),
        Just(Recurrence::Daily),
        Just(Recurrence::Weekly),
        Just(Recurrence::Monthly),
        Just(Recurrence::Yearly),
    ]
}

fn arb_reminders() -> impl Strategy<Value = Vec<Reminder>> {
    prop::collection::vec((arb_date(), arb_recurrence()), 0..24).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (anchor, recurrence))| Reminder {
                id: format!("r{i}"),
                title: format!("reminder {i}"),
                description: String::new(),
                anchor_date: anchor,
                recurrence,
                created_at: None,
                comments: Vec::new(),
            })
            .collect()
    })
}

/// Walks a cursor from the anchor one unit at a time, clamping as it goes.
fn stepped(anchor: NaiveDate, recurrence: Recurrence, reference: NaiveDate) -> Option<NaiveDate> {
    let mut cursor = anchor;
    while cursor < reference {
        cursor = match recurrence {
            Recurrence::None => return None,
            Recurrence::Daily => cursor.checked_add_days(Days::new(1))?,
            Recurrence::Weekly => cursor.checked_add_days(Days::new(7))?,
            Recurrence::Monthly => cursor.checked_add_months(Months::new(1))?,
            Recurrence::Yearly => cursor.checked_add_months(Months::new(12))?,
        };
    }
    Some(cursor)
}

fn id_dates(entries: Vec<UpcomingEntry>) -> Vec<(String, NaiveDate)> {
    let mut pairs: Vec<(String, NaiveDate)> = entries
        .into_iter()
        .map(|e| (e.reminder.id, e.next_occurrence_date))
        .collect();
    pairs.sort();
    pairs
}

// =============================================================================
// next_occurrence
// =============================================================================

proptest! {
    #[test]
    fn next_occurrence_matches_stepping(
        anchor in arb_date(),
        recurrence in arb_recurrence(),
        reference in arb_date(),
    ) {
        prop_assert_eq!(
            next_occurrence(anchor, recurrence, reference),
            stepped(anchor, recurrence, reference)
        );
    }
}

proptest! {
    #[test]
    fn next_occurrence_is_on_or_after_reference(
        anchor in arb_date(),
        recurrence in arb_recurrence(),
        reference in arb_date(),
    ) {
        match next_occurrence(anchor, recurrence, reference) {
            Some(date) => {
                prop_assert!(date >= reference);
            }
            None => {
                prop_assert_eq!(recurrence, Recurrence::None);
                prop_assert!(anchor < reference);
            }
        }
    }
}

proptest! {
    #[test]
    fn next_occurrence_is_a_fixed_point(
        anchor in arb_date(),
        recurrence in arb_recurrence(),
        reference in arb_date(),
    ) {
        if let Some(date) = next_occurrence(anchor, recurrence, reference) {
            prop_assert_eq!(next_occurrence(anchor, recurrence, date), Some(date));
        }
    }
}

// =============================================================================
// filter_upcoming
// =============================================================================

proptest! {
    #[test]
    fn upcoming_stays_inside_window(
        reminders in arb_reminders(),
        today in arb_date(),
        weeks in 0u32..60,
    ) {
        let window = OccurrenceWindow::new(today, weeks);
        for entry in filter_upcoming(&reminders, &window) {
            prop_assert!(entry.next_occurrence_date >= today);
            prop_assert!(entry.next_occurrence_date <= window.end_date());
        }
    }
}

proptest! {
    #[test]
    fn upcoming_is_sorted_and_permutation_invariant(
        reminders in arb_reminders(),
        today in arb_date(),
        weeks in 0u32..60,
        seed in any::<u64>(),
    ) {
        let window = OccurrenceWindow::new(today, weeks);
        let upcoming = filter_upcoming(&reminders, &window);
        prop_assert!(upcoming
            .windows(2)
            .all(|w| w[0].next_occurrence_date <= w[1].next_occurrence_date));

        // Rotate and reverse the input.
        let mut shuffled = reminders.clone();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
        }
        shuffled.reverse();

        let permuted = filter_upcoming(&shuffled, &window);
        prop_assert!(permuted
            .windows(2)
            .all(|w| w[0].next_occurrence_date <= w[1].next_occurrence_date));
        prop_assert_eq!(id_dates(upcoming), id_dates(permuted));
    }
}

proptest! {
    #[test]
    fn upcoming_is_idempotent(
        reminders in arb_reminders(),
        today in arb_date(),
        weeks in 0u32..60,
    ) {
        let window = OccurrenceWindow::new(today, weeks);
        prop_assert_eq!(
            filter_upcoming(&reminders, &window),
            filter_upcoming(&reminders, &window)
        );
    }
}

proptest! {
    #[test]
    fn upcoming_includes_everything_due_in_window(
        reminders in arb_reminders(),
        today in arb_date(),
        weeks in 0u32..60,
    ) {
        let window = OccurrenceWindow::new(today, weeks);
        let expected = reminders
            .iter()
            .filter(|r| {
                next_occurrence(r.anchor_date, r.recurrence, today)
                    .is_some_and(|d| window.contains(d))
            })
            .count();
        prop_assert_eq!(filter_upcoming(&reminders, &window).len(), expected);
    }
}

// =============================================================================
// project_occurrences
// =============================================================================

proptest! {
    #[test]
    fn projection_starts_at_next_occurrence(
        reminders in arb_reminders(),
        start in arb_date(),
        span in 0u64..120,
    ) {
        let end = start.checked_add_days(Days::new(span)).unwrap();
        let projected = project_occurrences(&reminders, start, end);

        prop_assert!(projected.windows(2).all(|w| w[0].date <= w[1].date));
        for r in &reminders {
            let first = projected.iter().find(|o| o.reminder.id == r.id).map(|o| o.date);
            let next = next_occurrence(r.anchor_date, r.recurrence, start).filter(|d| *d <= end);
            prop_assert_eq!(first, next, "reminder {}", r.id);
        }
    }
}

proptest! {
    #[test]
    fn projection_follows_the_cursor(
        anchor in arb_date(),
        recurrence in arb_recurrence(),
        start in arb_date(),
        span in 0u64..800,
    ) {
        let end = start.checked_add_days(Days::new(span)).unwrap();
        let reminder = Reminder {
            id: "r".to_string(),
            title: String::new(),
            description: String::new(),
            anchor_date: anchor,
            recurrence,
            created_at: None,
            comments: Vec::new(),
        };
        let dates: Vec<NaiveDate> = project_occurrences(&[reminder], start, end)
            .into_iter()
            .map(|o| o.date)
            .collect();
        for pair in dates.windows(2) {
            prop_assert_eq!(recurrence.step(pair[0]), Some(pair[1]));
        }
    }
}
