//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - validate: Validate command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod install;
pub mod validate;

pub use install::InstallArgs;
pub use validate::ValidateArgs;

/// local-store - materialize a dependency graph on disk
#[derive(Parser, Debug)]
#[command(
    name = "local-store",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install a resolved dependency graph as a local package store",
    long_about = "local-store copies every package of an already resolved dependency graph into \
                  an empty store directory, links dependencies into each package's node_modules \
                  and creates bin shims. It never contacts a registry.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  local-store install graph.json /tmp/store       \x1b[90m# Install a graph\x1b[0m\n   \
                  local-store install graph.yaml /tmp/store -j 2  \x1b[90m# Use at most 2 copy workers\x1b[0m\n   \
                  local-store validate graph.json                 \x1b[90m# Check a graph only\x1b[0m"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a graph into an empty store directory
    Install(InstallArgs),

    /// Validate a graph without installing it
    Validate(ValidateArgs),
}
