//! Command-line interface for color-detector.
//!
//! This module provides the CLI structure for the `colordet` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, FavoritesCommand, NameCommand, SampleCommand, StatusCommand, WatchCommand,
};

use crate::logging::Verbosity;

/// colordet - Name the color in the middle of your camera
///
/// Samples the center pixel of a camera or image, names the nearest color,
/// and keeps a list of favorites.
#[derive(Debug, Parser)]
#[command(name = "colordet")]
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
    /// Sample continuously and print color changes
    Watch(WatchCommand),

    /// Read the center color of one image
    Sample(SampleCommand),

    /// Name a hex color
    Name(NameCommand),

    /// Manage saved colors
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// Show storage and cache status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
