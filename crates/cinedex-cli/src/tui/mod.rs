//! TUI module for the three listing screens.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod browse;
/// Listing screen state types.
pub mod state;
mod ui;

pub use browse::run_browse;
