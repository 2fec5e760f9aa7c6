//! Terminal dashboard for upcoming and recurring reminders.
//!
//! The occurrence engine lives in [`reminders::occurrence`]; everything else
//! fetches reminders from the backend's data file and draws them.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod event;
pub mod logging;
pub mod reminders;
pub mod theme;
pub mod tui;
