//! CLI subcommand implementations.

pub mod budget;
pub mod items;
pub mod survey;
