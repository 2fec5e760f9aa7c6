use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};

use reminder_tui::app::{App, ViewMode};
use reminder_tui::cli::Cli;
use reminder_tui::components::{self, day_view, DayView, MonthView, RecentComments, UpcomingList};
use reminder_tui::config::Config;
use reminder_tui::{event, logging, theme, tui};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut config = match cli.config {
        Some(ref path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    logging::init(&config.log_file)?;
    tracing::info!(
        data_file = %config.data_file.display(),
        weeks = config.default_weeks,
        "starting reminder-tui"
    );

    let mut app = App::new(&config)?;

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    tracing::info!("exiting");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.poll_loader();

        terminal.draw(|frame| {
            let area = frame.area();
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

            match app.view_mode {
                ViewMode::Upcoming => render_upcoming_layout(frame, layout[0], app),
                ViewMode::Month => render_month_layout(frame, layout[0], app),
            }

            if let Some(ref detail) = app.detail {
                day_view::render_detail_popup(frame, area, detail);
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(frame, layout[1], app);
        })?;

        if let Some(key) = event::next_key_press(Duration::from_millis(100))? {
            // Clear status message on any key
            app.status_message = None;

            // Help overlay takes priority
            if app.show_help {
                if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                    app.show_help = false;
                }
                continue;
            }

            // Detail popup takes priority
            if app.detail.is_some() {
                if key.code == KeyCode::Esc || key.code == KeyCode::Enter {
                    app.close_detail();
                }
                continue;
            }

            handle_input(app, key.code, key.modifiers);
        }
    }

    Ok(())
}

fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _)
        | (KeyCode::Esc, _)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.set_view(ViewMode::Upcoming),
        (KeyCode::Char('2'), _) => app.set_view(ViewMode::Month),
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => app.increase_weeks(),
        (KeyCode::Char('-'), _) => app.decrease_weeks(),
        (KeyCode::Char('r'), _) => {
            app.refresh();
            app.status_message = Some("Refreshing reminders".to_string());
        }
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Enter, _) => app.show_detail(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.select_prev(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.select_next(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn render_upcoming_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let comments_h = if app.recent_comments.is_empty() {
        3
    } else {
        app.recent_comments.len() as u16 + 2
    };
    let rows = Layout::vertical([Constraint::Min(5), Constraint::Length(comments_h)]).split(area);

    UpcomingList::render(
        frame,
        rows[0],
        &app.upcoming,
        &app.window(),
        app.selected_index,
    );
    RecentComments::render(frame, rows[1], &app.recent_comments);
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    if area.width < 60 {
        MonthView::render(
            frame,
            area,
            app.selected_date,
            app.today,
            &app.days_with_reminders,
        );
        return;
    }

    let month_w = if area.width >= 100 { 44 } else { 37 };
    let content = Layout::horizontal([Constraint::Length(month_w), Constraint::Min(20)]).split(area);

    MonthView::render(
        frame,
        content[0],
        app.selected_date,
        app.today,
        &app.days_with_reminders,
    );
    DayView::render(
        frame,
        content[1],
        app.selected_date,
        &app.day_occurrences,
        app.selected_index,
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let theme = theme::current();
    let popup_w = area.width.min(52).max(30);
    let popup_h = area.height.min(22).max(12);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let row = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Horizon", section_style)),
        row("+ / -", "Widen / narrow upcoming window"),
        row("r", "Reload reminders"),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        row("1 / 2", "Upcoming / Month view"),
        row("j/k", "Select next / previous"),
        row("Enter", "Reminder details and comments"),
        Line::from(""),
        Line::from(Span::styled("Calendar", section_style)),
        row("h/l", "Previous / next day"),
        row("[ / ]", "Previous / next month"),
        row("t", "Jump to today"),
        Line::from(""),
        row("q / Esc", "Quit / close popup"),
    ];

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}
