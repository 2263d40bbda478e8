pub mod api;
pub mod board;
pub mod breakdown;
pub mod card;
pub mod config;
pub mod error;
pub mod feed;
pub mod feedback;
pub mod filters;
pub mod i18n;
pub mod kanban;
pub mod logging;
pub mod models;
pub mod prefs;
pub mod status;
mod translations;
pub mod tui;
