use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::reminders::{CommentRef, OccurrenceWindow, UpcomingEntry};
use crate::theme;

pub struct UpcomingList;

impl UpcomingList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        entries: &[UpcomingEntry],
        window: &OccurrenceWindow,
        selected_index: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 40 {
            format!(
                " Upcoming: next {} week{} ({}) ",
                window.horizon_weeks,
                if window.horizon_weeks == 1 { "" } else { "s" },
                entries.len()
            )
        } else {
            format!(" Upcoming {}w ", window.horizon_weeks)
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(
                format!(" until {} ", window.end_date().format("%b %d, %Y")),
                theme.dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if entries.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("Nothing due in this window").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let mut last_date: Option<NaiveDate> = None;
        let mut items: Vec<ListItem> = Vec::new();
        let mut selected_row = 0;

        for (i, entry) in entries.iter().enumerate() {
            // Date header whenever the day changes
            if last_date != Some(entry.next_occurrence_date) {
                if last_date.is_some() {
                    items.push(ListItem::new(Line::from("")));
                }
                last_date = Some(entry.next_occurrence_date);
                items.push(ListItem::new(Line::from(Span::styled(
                    format!(" {}", day_label(entry.next_occurrence_date, window.reference_date)),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))));
            }

            let is_selected = i == selected_index;
            if is_selected {
                selected_row = items.len();
            }
            let rem = &entry.reminder;

            let mut spans = vec![
                Span::raw(" "),
                Span::styled("  ", theme.recurrence_marker(rem.recurrence)),
                Span::styled(
                    format!(" {}", truncate(&rem.title, inner_w.saturating_sub(16))),
                    if is_selected {
                        theme.selected
                    } else {
                        Style::default()
                    },
                ),
            ];

            // Recurrence tag if there's room
            if rem.recurrence.is_recurring() {
                let tag = format!(" {}", rem.recurrence);
                if spans.iter().map(|s| s.width()).sum::<usize>() + tag.len() < inner_w {
                    spans.push(Span::styled(tag, theme.dim));
                }
            }
            if !rem.comments.is_empty() {
                spans.push(Span::styled(format!(" [{}]", rem.comments.len()), theme.dim));
            }

            items.push(ListItem::new(Line::from(spans)));
        }

        let mut state = ListState::default().with_selected(Some(selected_row));
        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut state);
    }
}

pub struct RecentComments;

impl RecentComments {
    pub fn render(frame: &mut Frame, area: Rect, comments: &[CommentRef]) {
        let theme = theme::current();
        let block = Block::default()
            .title(" Recent comments ")
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if comments.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new("No comments yet").style(theme.dim), inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = comments
            .iter()
            .map(|c| {
                let stamp = c.timestamp.get(..10).unwrap_or(&c.timestamp);
                let prefix = format!(" {} {}: ", stamp, c.reminder_title);
                let text = truncate(&c.text, inner_w.saturating_sub(prefix.len()));
                ListItem::new(Line::from(vec![
                    Span::styled(prefix, theme.dim),
                    Span::raw(text),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => format!("Today, {}", date.format("%a %b %d")),
        1 => format!("Tomorrow, {}", date.format("%a %b %d")),
        _ => date.format("%A, %B %d").to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}
