//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Render and send coaching-center mail templates.
#[derive(Debug, Parser)]
#[command(name = "coachmail", version, about = "Render and send coaching-center mail templates")]
pub struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Render data shared by `render` and `send`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct DataArgs {
    /// JSON or TOML file holding the render data
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Set a value, e.g. `amount=500` or `user.name=Ann` (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the built-in templates
    List,

    /// Render a template to stdout
    Render {
        /// Template name
        name: String,

        #[command(flatten)]
        data: DataArgs,

        /// Print the subject line before the body
        #[arg(long)]
        subject: bool,

        /// Print the plain-text alternative instead of HTML
        #[arg(long)]
        text: bool,
    },

    /// Render a template and deliver it through the configured backend
    Send {
        /// Template name
        name: String,

        /// Recipient address (repeatable)
        #[arg(long, required = true)]
        to: Vec<String>,

        /// Carbon copy address (repeatable)
        #[arg(long)]
        cc: Vec<String>,

        #[command(flatten)]
        data: DataArgs,
    },
}
