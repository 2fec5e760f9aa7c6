use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::config;
use crate::reminders::Recurrence;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Get the active theme (loaded once on first call).
pub fn current() -> &'static Theme {
    THEME.get_or_init(|| Theme::load().unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub accent: Color,
    /// Marker colors, indexed like [`Recurrence::ALL`].
    pub recurrence: [Color; 5],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            accent: Color::Cyan,
            recurrence: [
                Color::Gray,
                Color::Green,
                Color::Blue,
                Color::Magenta,
                Color::Yellow,
            ],
        }
    }
}

impl Theme {
    pub fn load() -> Option<Self> {
        let path = config::config_dir()?.join("theme.toml");
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str::<ThemeConfig>(&content) {
            Ok(config) => Some(config.into_theme()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid theme");
                None
            }
        }
    }

    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    pub fn recurrence_color(&self, recurrence: Recurrence) -> Color {
        self.recurrence[recurrence_index(recurrence)]
    }

    /// Style for the small color block drawn in front of a reminder.
    pub fn recurrence_marker(&self, recurrence: Recurrence) -> Style {
        Style::default().bg(self.recurrence_color(recurrence))
    }

    fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            header: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            status: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            accent: Color::Rgb(255, 121, 198),
            recurrence: [
                Color::Rgb(98, 114, 164),
                Color::Rgb(80, 250, 123),
                Color::Rgb(139, 233, 253),
                Color::Rgb(255, 121, 198),
                Color::Rgb(241, 250, 140),
            ],
        }
    }

    fn gruvbox() -> Self {
        Self {
            name: "gruvbox".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)),
            header: Style::default()
                .fg(Color::Rgb(235, 219, 178))
                .add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            status: Style::default()
                .fg(Color::Rgb(235, 219, 178))
                .bg(Color::Rgb(80, 73, 69)),
            accent: Color::Rgb(254, 128, 25),
            recurrence: [
                Color::Rgb(146, 131, 116),
                Color::Rgb(184, 187, 38),
                Color::Rgb(131, 165, 152),
                Color::Rgb(211, 134, 155),
                Color::Rgb(250, 189, 47),
            ],
        }
    }

    fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)),
            header: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            accent: Color::Rgb(136, 192, 208),
            recurrence: [
                Color::Rgb(76, 86, 106),
                Color::Rgb(163, 190, 140),
                Color::Rgb(129, 161, 193),
                Color::Rgb(180, 142, 173),
                Color::Rgb(235, 203, 139),
            ],
        }
    }
}

fn recurrence_index(recurrence: Recurrence) -> usize {
    match recurrence {
        Recurrence::None => 0,
        Recurrence::Daily => 1,
        Recurrence::Weekly => 2,
        Recurrence::Monthly => 3,
        Recurrence::Yearly => 4,
    }
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
struct ThemeConfig {
    preset: Option<String>,
    today_bg: Option<String>,
    selected_bg: Option<String>,
    header_fg: Option<String>,
    dim_fg: Option<String>,
    border_fg: Option<String>,
    status_bg: Option<String>,
    accent: Option<String>,
    #[serde(default)]
    recurrence: RecurrenceColors,
}

#[derive(Debug, Deserialize, Default)]
struct RecurrenceColors {
    none: Option<String>,
    daily: Option<String>,
    weekly: Option<String>,
    monthly: Option<String>,
    yearly: Option<String>,
}

impl ThemeConfig {
    fn into_theme(self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        if let Some(c) = self.today_bg.as_deref().and_then(parse_color) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = self.selected_bg.as_deref().and_then(parse_color) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = self.header_fg.as_deref().and_then(parse_color) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = self.dim_fg.as_deref().and_then(parse_color) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = self.border_fg.as_deref().and_then(parse_color) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = self.status_bg.as_deref().and_then(parse_color) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = self.accent.as_deref().and_then(parse_color) {
            theme.accent = c;
        }

        let overrides = [
            self.recurrence.none,
            self.recurrence.daily,
            self.recurrence.weekly,
            self.recurrence.monthly,
            self.recurrence.yearly,
        ];
        for (slot, value) in theme.recurrence.iter_mut().zip(overrides) {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *slot = c;
            }
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_named_colors() {
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color(" Grey "), Some(Color::Gray));
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("#ggg000"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn config_starts_from_preset_and_overrides() {
        let config: ThemeConfig = toml::from_str(
            r##"
            preset = "nord"
            accent = "red"

            [recurrence]
            monthly = "#010203"
            "##,
        )
        .unwrap();
        let theme = config.into_theme();
        assert_eq!(theme.name, "nord");
        assert_eq!(theme.accent, Color::Red);
        assert_eq!(theme.recurrence_color(Recurrence::Monthly), Color::Rgb(1, 2, 3));
        assert_eq!(
            theme.recurrence_color(Recurrence::Daily),
            Theme::preset("nord").recurrence_color(Recurrence::Daily)
        );
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        for name in ["default", "dracula", "gruvbox", "nord"] {
            assert_eq!(Theme::preset(name).name, name);
        }
        assert_eq!(Theme::preset("solarized").name, "default");
    }
}
