//! Screens that are not games: welcome, menu, achievements and settings.

pub mod achievements;
pub mod menu;
pub mod settings;
pub mod welcome;
