use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, ViewMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let style = theme::current().status;
        let w = area.width as usize;

        let mode_str = match app.view_mode {
            ViewMode::Upcoming => "[1]Upcoming",
            ViewMode::Month => "[2]Month",
        };
        let loading = if app.is_loading() { " loading..." } else { "" };
        let left = format!(
            " {} {}/{}w{} ",
            mode_str, app.weeks, app.max_weeks, loading
        );

        // Show status message if present, otherwise show context-aware hints
        let right_text = if let Some(ref msg) = app.status_message {
            format!(" {} ", msg)
        } else {
            match app.view_mode {
                ViewMode::Upcoming if w >= 80 => {
                    " +/-:Weeks jk:Select Enter:Detail r:Refresh ?:Help q:Quit".to_string()
                }
                ViewMode::Month if w >= 80 => {
                    " hl:Day [/]:Mon t:Today jk:Select Enter:Detail ?:Help q:Quit".to_string()
                }
                _ if w >= 50 => " +/-:Weeks Enter:Detail q:Quit".to_string(),
                _ => " ?:Help q:Quit".to_string(),
            }
        };

        let padding_len = w.saturating_sub(left.len() + right_text.len());
        let padding = " ".repeat(padding_len);

        let line = Line::from(vec![
            Span::styled(left, style),
            Span::styled(padding, style),
            Span::styled(right_text, style),
        ]);

        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}
