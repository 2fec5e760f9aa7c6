use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use color_eyre::Result;

use crate::config::Config;
use crate::reminders::{
    filter_upcoming, latest_comments, project_occurrences, Batch, CommentRef, Loader, Occurrence,
    OccurrenceWindow, Reminder, ReminderSource, Store, UpcomingEntry,
};

const RECENT_COMMENTS: usize = 5;

/// Source of the current date.
pub type Clock = Box<dyn Fn() -> NaiveDate>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Upcoming,
    Month,
}

/// The reminder shown in the detail popup, with the occurrence it was opened from.
#[derive(Debug, Clone)]
pub struct Detail {
    pub reminder: Reminder,
    pub date: NaiveDate,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub weeks: u32,
    pub max_weeks: u32,
    pub reminders: Vec<Reminder>,
    pub upcoming: Vec<UpcomingEntry>,
    pub recent_comments: Vec<CommentRef>,
    pub month_occurrences: Vec<Occurrence>,
    pub day_occurrences: Vec<Occurrence>,
    pub days_with_reminders: HashSet<u32>,
    pub selected_index: usize,
    pub detail: Option<Detail>,
    pub show_help: bool,
    pub status_message: Option<String>,
    /// Records the last fetch had to skip.
    pub skipped: usize,
    loader: Loader,
    clock: Clock,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let store = Store::new(&config.data_file);
        tracing::info!(path = %store.path().display(), "using data file");
        Self::with_source(
            Arc::new(store),
            config,
            Box::new(|| Local::now().date_naive()),
        )
    }

    pub fn with_source(
        source: Arc<dyn ReminderSource>,
        config: &Config,
        clock: Clock,
    ) -> Result<Self> {
        let loader = Loader::new(source, config.fetch_timeout)?;
        let today = clock();

        let mut app = Self {
            running: true,
            view_mode: ViewMode::Upcoming,
            selected_date: today,
            today,
            weeks: config.default_weeks.min(config.max_weeks),
            max_weeks: config.max_weeks,
            reminders: Vec::new(),
            upcoming: Vec::new(),
            recent_comments: Vec::new(),
            month_occurrences: Vec::new(),
            day_occurrences: Vec::new(),
            days_with_reminders: HashSet::new(),
            selected_index: 0,
            detail: None,
            show_help: false,
            status_message: None,
            skipped: 0,
            loader,
            clock,
        };

        app.refresh();
        Ok(app)
    }

    /// Ask the backend for the reminder collection again. The window is
    /// re-anchored on the current date, which may have rolled over.
    pub fn refresh(&mut self) {
        let today = (self.clock)();
        if today != self.today {
            tracing::info!(%today, "date changed");
            if self.selected_date == self.today {
                self.selected_date = today;
            }
            self.today = today;
        }
        self.loader.request(self.weeks);
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_pending()
    }

    /// Apply the newest finished fetch, if any. Returns whether anything changed.
    pub fn poll_loader(&mut self) -> bool {
        let Some(response) = self.loader.poll() else {
            return false;
        };
        match response.result {
            Ok(batch) => {
                tracing::info!(
                    generation = response.generation,
                    weeks = response.weeks,
                    count = batch.reminders.len(),
                    skipped = batch.rejected.len(),
                    "reminders refreshed"
                );
                self.apply_batch(batch);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load reminders");
                self.status_message = Some(format!("Load failed: {e}"));
            }
        }
        true
    }

    fn apply_batch(&mut self, batch: Batch) {
        self.skipped = batch.rejected.len();
        if self.skipped > 0 {
            self.status_message = Some(format!(
                "Skipped {} invalid reminder{}",
                self.skipped,
                if self.skipped == 1 { "" } else { "s" }
            ));
        }
        self.reminders = batch.reminders;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.upcoming = filter_upcoming(&self.reminders, &self.window());
        self.recent_comments = latest_comments(&self.reminders, RECENT_COMMENTS);
        self.refresh_month();
    }

    fn refresh_month(&mut self) {
        let start = self.selected_date.with_day(1).unwrap_or(self.selected_date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX);

        self.month_occurrences = project_occurrences(&self.reminders, start, end);
        self.days_with_reminders = self
            .month_occurrences
            .iter()
            .map(|o| o.date.day())
            .collect();
        self.refresh_day();
    }

    fn refresh_day(&mut self) {
        self.day_occurrences = self
            .month_occurrences
            .iter()
            .filter(|o| o.date == self.selected_date)
            .cloned()
            .collect();
        self.clamp_selection();
    }

    // ── horizon ──

    pub fn window(&self) -> OccurrenceWindow {
        OccurrenceWindow::new(self.today, self.weeks)
    }

    pub fn set_weeks(&mut self, weeks: u32) {
        let weeks = weeks.min(self.max_weeks);
        if weeks != self.weeks {
            self.weeks = weeks;
            self.refresh();
        }
    }

    pub fn increase_weeks(&mut self) {
        self.set_weeks(self.weeks.saturating_add(1));
    }

    pub fn decrease_weeks(&mut self) {
        self.set_weeks(self.weeks.saturating_sub(1));
    }

    // ── views and selection ──

    pub fn set_view(&mut self, mode: ViewMode) {
        if self.view_mode != mode {
            self.view_mode = mode;
            self.selected_index = 0;
        }
    }

    fn list_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Upcoming => self.upcoming.len(),
            ViewMode::Month => self.day_occurrences.len(),
        }
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.list_len().saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.list_len() {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn show_detail(&mut self) {
        self.detail = match self.view_mode {
            ViewMode::Upcoming => self.upcoming.get(self.selected_index).map(|e| Detail {
                reminder: e.reminder.clone(),
                date: e.next_occurrence_date,
            }),
            ViewMode::Month => self.day_occurrences.get(self.selected_index).map(|o| Detail {
                reminder: o.reminder.clone(),
                date: o.date,
            }),
        };
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    // ── date navigation ──

    pub fn next_day(&mut self) {
        self.move_to(self.selected_date.checked_add_days(Days::new(1)));
    }

    pub fn prev_day(&mut self) {
        self.move_to(self.selected_date.checked_sub_days(Days::new(1)));
    }

    pub fn next_month(&mut self) {
        self.move_to(self.selected_date.checked_add_months(Months::new(1)));
    }

    pub fn prev_month(&mut self) {
        self.move_to(self.selected_date.checked_sub_months(Months::new(1)));
    }

    pub fn go_to_today(&mut self) {
        let today = (self.clock)();
        if today != self.today {
            self.today = today;
            self.selected_date = today;
            self.recompute();
        } else {
            self.move_to(Some(today));
        }
    }

    fn move_to(&mut self, date: Option<NaiveDate>) {
        let Some(date) = date else {
            return;
        };
        let month_changed =
            date.year() != self.selected_date.year() || date.month() != self.selected_date.month();
        self.selected_date = date;
        self.selected_index = 0;

        // Only re-project the month when it changed
        if month_changed {
            self.refresh_month();
        } else {
            self.refresh_day();
        }
    }
}
