use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::Detail;
use crate::reminders::Occurrence;
use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        occurrences: &[Occurrence],
        selected_index: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let n = occurrences.len();
        let count_str = if n == 0 {
            String::new()
        } else {
            format!(" {} reminder{} ", n, if n == 1 { "" } else { "s" })
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if occurrences.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No reminders").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let items: Vec<ListItem> = occurrences
            .iter()
            .enumerate()
            .map(|(i, occ)| {
                let rem = &occ.reminder;
                let title_style = if i == selected_index {
                    theme.selected
                } else {
                    Style::default()
                };
                let mut spans = vec![
                    Span::styled("  ", theme.recurrence_marker(rem.recurrence)),
                    Span::styled(format!(" {}", rem.title), title_style),
                    Span::styled(format!(" ({})", rem.recurrence), theme.dim),
                ];
                if rem.anchor_date == occ.date && rem.recurrence.is_recurring() {
                    spans.push(Span::styled(" first", theme.dim));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let mut state = ListState::default().with_selected(Some(selected_index));
        frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
    }
}

/// Render a reminder detail popup overlay with its description and comments.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, detail: &Detail) {
    let theme = theme::current();
    let popup_w = area.width.min(60).max(30);
    let popup_h = area.height.min(20).max(8);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let rem = &detail.reminder;
    let accent = theme.recurrence_color(rem.recurrence);
    let block = Block::default()
        .title(format!(" {} ", rem.title))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Next: ", theme.dim),
            Span::raw(detail.date.format("%A, %B %d, %Y").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Repeats: ", theme.dim),
            Span::raw(rem.recurrence.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Anchor: ", theme.dim),
            Span::raw(rem.anchor_date.format("%Y-%m-%d").to_string()),
        ]),
    ];

    if !rem.description.is_empty() {
        lines.push(Line::from(""));
        lines.extend(rem.description.lines().map(|l| Line::from(l.to_string())));
    }

    lines.push(Line::from(""));
    if rem.comments.is_empty() {
        lines.push(Line::from(Span::styled("No comments", theme.dim)));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Comments ({}):", rem.comments.len()),
            theme.dim,
        )));
        for c in &rem.comments {
            let stamp = c.timestamp.get(..16).unwrap_or(&c.timestamp).replace('T', " ");
            lines.push(Line::from(vec![
                Span::styled(format!("  {stamp} "), theme.dim),
                Span::raw(c.text.clone()),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press Esc to close", theme.dim)));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
