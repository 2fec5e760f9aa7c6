use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format the backend uses for reminder anchor dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recurrence {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 5] = [
        Recurrence::None,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly,
        Recurrence::Yearly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::None => "None",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly => "Weekly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Yearly => "Yearly",
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown recurrence {0:?}")]
pub struct ParseRecurrenceError(pub String);

impl FromStr for Recurrence {
    type Err = ParseRecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recurrence::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseRecurrenceError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub timestamp: String,
}

/// A reminder exactly as the backend stores it. Nothing here is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default = "default_recurrence")]
    pub recurrence: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

fn default_recurrence() -> String {
    Recurrence::None.as_str().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub description: String,
    pub anchor_date: NaiveDate,
    pub recurrence: Recurrence,
    pub created_at: Option<String>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    #[error("reminder {id}: invalid date {value:?}")]
    InvalidDate {
        id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("reminder {id}: unknown recurrence {value:?}")]
    UnknownRecurrence { id: String, value: String },
}

impl ReminderError {
    pub fn id(&self) -> &str {
        match self {
            ReminderError::InvalidDate { id, .. } | ReminderError::UnknownRecurrence { id, .. } => {
                id
            }
        }
    }
}

impl TryFrom<ReminderRecord> for Reminder {
    type Error = ReminderError;

    fn try_from(record: ReminderRecord) -> Result<Self, Self::Error> {
        let anchor_date = NaiveDate::parse_from_str(record.date.trim(), DATE_FORMAT).map_err(
            |source| ReminderError::InvalidDate {
                id: record.id.clone(),
                value: record.date.clone(),
                source,
            },
        )?;
        let recurrence = record.recurrence.parse::<Recurrence>().map_err(|_| {
            ReminderError::UnknownRecurrence {
                id: record.id.clone(),
                value: record.recurrence.clone(),
            }
        })?;

        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description,
            anchor_date,
            recurrence,
            created_at: record.created_at,
            comments: record.comments,
        })
    }
}

/// Result of validating a set of backend records.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub reminders: Vec<Reminder>,
    pub rejected: Vec<ReminderError>,
}

/// Validate every record. Bad records are collected in `rejected`; the rest
/// keep their input order.
pub fn validate_batch(records: impl IntoIterator<Item = ReminderRecord>) -> Batch {
    let mut batch = Batch::default();
    for record in records {
        match Reminder::try_from(record) {
            Ok(reminder) => batch.reminders.push(reminder),
            Err(err) => {
                tracing::warn!(id = err.id(), error = %err, "skipping reminder record");
                batch.rejected.push(err);
            }
        }
    }
    batch
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRef {
    pub text: String,
    pub timestamp: String,
    pub reminder_title: String,
}

/// Most recent comments across all reminders, newest first.
///
/// Timestamps are ISO-8601 strings and compare lexically.
pub fn latest_comments(reminders: &[Reminder], limit: usize) -> Vec<CommentRef> {
    let mut all: Vec<CommentRef> = reminders
        .iter()
        .flat_map(|r| {
            r.comments.iter().map(|c| CommentRef {
                text: c.text.clone(),
                timestamp: c.timestamp.clone(),
                reminder_title: r.title.clone(),
            })
        })
        .collect();
    all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    all.truncate(limit);
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, date: &str, recurrence: &str) -> ReminderRecord {
        ReminderRecord {
            id: id.to_string(),
            title: format!("title {id}"),
            description: String::new(),
            date: date.to_string(),
            recurrence: recurrence.to_string(),
            created_at: None,
            comments: Vec::new(),
        }
    }

    fn comment(text: &str, timestamp: &str) -> Comment {
        Comment {
            text: text.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn recurrence_parses_backend_names() {
        for r in Recurrence::ALL {
            assert_eq!(r.as_str().parse::<Recurrence>(), Ok(r));
            assert_eq!(r.to_string(), r.as_str());
        }
        assert!("daily".parse::<Recurrence>().is_err());
        assert!("Fortnightly".parse::<Recurrence>().is_err());
    }

    #[test]
    fn record_converts_to_reminder() {
        let reminder = Reminder::try_from(record("a", "2024-03-15", "Yearly")).unwrap();
        assert_eq!(reminder.anchor_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(reminder.recurrence, Recurrence::Yearly);
        assert_eq!(reminder.title, "title a");
    }

    #[test]
    fn malformed_date_is_reported() {
        for bad in ["", "15/03/2024", "2023-02-30", "2024-13-01"] {
            let err = Reminder::try_from(record("x", bad, "None")).unwrap_err();
            assert!(
                matches!(err, ReminderError::InvalidDate { ref value, .. } if value == bad),
                "{bad}: {err:?}"
            );
            assert_eq!(err.id(), "x");
        }
    }

    #[test]
    fn unknown_recurrence_is_reported() {
        let err = Reminder::try_from(record("y", "2024-01-01", "Hourly")).unwrap_err();
        assert_eq!(
            err,
            ReminderError::UnknownRecurrence {
                id: "y".to_string(),
                value: "Hourly".to_string()
            }
        );
    }

    #[test]
    fn batch_skips_bad_records_and_keeps_order() {
        let batch = validate_batch(vec![
            record("1", "2024-01-01", "Daily"),
            record("2", "not a date", "Daily"),
            record("3", "2024-01-02", "Sometimes"),
            record("4", "2024-01-03", "None"),
        ]);
        let ids: Vec<&str> = batch.reminders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "4"]);
        let rejected: Vec<&str> = batch.rejected.iter().map(|e| e.id()).collect();
        assert_eq!(rejected, ["2", "3"]);
    }

    #[test]
    fn missing_recurrence_defaults_to_one_time() {
        let record: ReminderRecord =
            serde_json::from_str(r#"{"id": "z", "title": "t", "date": "2024-05-01"}"#).unwrap();
        let reminder = Reminder::try_from(record).unwrap();
        assert_eq!(reminder.recurrence, Recurrence::None);
        assert!(reminder.comments.is_empty());
    }

    #[test]
    fn latest_comments_are_newest_first_and_limited() {
        let mut a = Reminder::try_from(record("a", "2024-01-01", "None")).unwrap();
        a.comments = vec![
            comment("first", "2024-01-01T09:00:00"),
            comment("third", "2024-01-03T09:00:00"),
        ];
        let mut b = Reminder::try_from(record("b", "2024-01-01", "None")).unwrap();
        b.comments = vec![comment("second", "2024-01-02T09:00:00")];

        let latest = latest_comments(&[a, b], 2);
        let texts: Vec<&str> = latest.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["third", "second"]);
        assert_eq!(latest[1].reminder_title, "title b");
    }
}
