//! Subcommand implementations.

pub(crate) mod config;
