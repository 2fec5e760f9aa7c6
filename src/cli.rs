use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Terminal dashboard for upcoming and recurring reminders.
#[derive(Parser, Debug)]
#[command(name = "reminder-tui", version, about)]
pub struct Cli {
    /// Reminder data file (overrides `data_file` in config.toml)
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Initial horizon in weeks (overrides `default_weeks`)
    #[arg(long, short = 'w')]
    pub weeks: Option<u32>,

    /// Alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line overrides on top of the file config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref data) = self.data {
            config.data_file = data.clone();
        }
        if let Some(weeks) = self.weeks {
            config.set_weeks(weeks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["reminder-tui", "--data", "/tmp/r.json", "-w", "100"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.data_file, PathBuf::from("/tmp/r.json"));
        assert_eq!(config.default_weeks, config.max_weeks);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::parse_from(["reminder-tui"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
