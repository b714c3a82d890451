//! Subcommand handlers.

pub mod predict;
pub mod recommend;
pub mod tables;
