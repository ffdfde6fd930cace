//! Command-line interface for treasurehunt.
//!
//! This module provides the CLI structure for the `thunt` binary.

mod commands;
pub mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ListCommand, RemoveHuntCommand, RemoveTreasureCommand, ViewCommand,
};

/// thunt - keep flat-file records of treasure hunts
///
/// Each hunt is a directory holding a binary record file and an audit
/// log; a symbolic link next to the directory points at the most
/// recently mutated hunt's log.
#[derive(Debug, Parser)]
#[command(name = "thunt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a treasure to a hunt (prompts for its fields)
    Add(AddCommand),

    /// List all treasures in a hunt
    List(ListCommand),

    /// View one treasure by id
    View(ViewCommand),

    /// Remove one treasure from a hunt
    RemoveTreasure(RemoveTreasureCommand),

    /// Remove a hunt and everything it owns
    RemoveHunt(RemoveHuntCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
