//! Core types, configuration, and utilities shared by every Planforge crate.
//!
//! - [`types`] — chat messages, the project analysis schema, and plans
//! - [`config`] — `~/.planforge/config.json` schema and loader
//! - [`utils`] — data paths, timestamps, string helpers

pub mod config;
pub mod types;
pub mod utils;
