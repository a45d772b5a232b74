//! Time tracker CLI library.
//!
//! This crate provides the presentation layer for the time tracker: argument
//! parsing, configuration, and the commands that drive the storage core.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
