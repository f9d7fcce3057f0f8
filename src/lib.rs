pub mod browser;
pub mod config;
pub mod data;
pub mod logging;
pub mod output;
pub mod ranking;
pub mod state;
pub mod tui;
