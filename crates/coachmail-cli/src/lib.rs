//! # coachmail-cli
//!
//! The `coachmail` command: list the built-in templates, render one to
//! stdout, or send one through the configured mail backend.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
