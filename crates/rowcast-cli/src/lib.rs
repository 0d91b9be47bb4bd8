//! CLI library components for rowcast.

pub mod commands;
pub mod logging;
