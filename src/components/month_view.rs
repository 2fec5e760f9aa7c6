use std::collections::HashSet;

use chrono::{Datelike, Months, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        days_with_reminders: &HashSet<u32>,
    ) {
        let theme = theme::current();
        let title = format!(" {} ", selected_date.format("%B %Y"));

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Line::from(
            DAY_NAMES
                .iter()
                .map(|d| Span::styled(format!("{:^5}", d), theme.header))
                .collect::<Vec<_>>(),
        );

        let weeks: Vec<Line> = month_grid(selected_date)
            .into_iter()
            .map(|week| {
                let cells: Vec<Span> = week
                    .into_iter()
                    .map(|cell| match cell {
                        None => Span::raw("     "),
                        Some(date) => {
                            let marker = if days_with_reminders.contains(&date.day()) {
                                '*'
                            } else {
                                ' '
                            };
                            let style = if date == selected_date && date == today {
                                theme.today.add_modifier(Modifier::BOLD | Modifier::REVERSED)
                            } else if date == selected_date {
                                theme.selected
                            } else if date == today {
                                theme.today
                            } else {
                                Style::default()
                            };
                            Span::styled(format!(" {:>2}{} ", date.day(), marker), style)
                        }
                    })
                    .collect();
                Line::from(cells)
            })
            .collect();

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

/// Rows of a Sunday-first month calendar; days outside the month are `None`.
fn month_grid(date: NaiveDate) -> Vec<[Option<NaiveDate>; 7]> {
    let Some(first) = date.with_day(1) else {
        return Vec::new();
    };
    let next_first = first.checked_add_months(Months::new(1));
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = lead;
    for day in first.iter_days().take_while(|d| Some(*d) != next_first) {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_2024_grid() {
        let grid = month_grid(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        // Feb 1 2024 is a Thursday; 29 days span five rows.
        assert_eq!(grid.len(), 5);
        assert!(grid[0][..4].iter().all(Option::is_none));
        assert_eq!(grid[0][4], NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(grid[4][4], NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(grid[4][5], None);
    }

    #[test]
    fn month_starting_sunday_has_no_lead() {
        // September 2024 starts on a Sunday.
        let grid = month_grid(NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());
        assert_eq!(grid[0][0], NaiveDate::from_ymd_opt(2024, 9, 1));
        let days: usize = grid.iter().flatten().filter(|d| d.is_some()).count();
        assert_eq!(days, 30);
    }
}
