//! # HRMS CLI
//!
//! Terminal interface for the health record management system: the
//! interactive menu, its five views, and the helpers the one-shot
//! subcommands share with them.

pub mod config;
pub mod editor;
pub mod menu;
pub mod prompt;
pub mod render;
pub mod views;
