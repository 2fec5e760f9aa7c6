pub mod loader;
pub mod occurrence;
pub mod reminder;
pub mod store;

pub use loader::{FetchResponse, Loader};
pub use occurrence::{
    filter_upcoming, next_occurrence, project_occurrences, Occurrence, OccurrenceWindow,
    UpcomingEntry,
};
pub use reminder::{
    latest_comments, validate_batch, Batch, Comment, CommentRef, Recurrence, Reminder,
    ReminderError, ReminderRecord,
};
pub use store::{ReminderSource, Store, StoreError};
