//! CLI subcommand arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Watch command arguments.
///
/// While watching, type a key and Enter: `f` saves the live color, `c`
/// copies it, `p` pauses or resumes, `r` retries the camera, `q` quits.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Sample a still image instead of the webcam
    #[arg(short, long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Stop after this many samples
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Print every tick, not only color changes
    #[arg(short, long)]
    pub all: bool,

    /// Output each reading as a JSON line
    #[arg(short, long)]
    pub json: bool,
}

/// Sample command arguments.
#[derive(Debug, Args)]
pub struct SampleCommand {
    /// Image file to read the center pixel from
    #[arg(short, long, value_name = "FILE")]
    pub image: PathBuf,

    /// Save the sampled color to favorites
    #[arg(short, long)]
    pub favorite: bool,

    /// Copy the hex code to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Name command arguments.
#[derive(Debug, Args)]
pub struct NameCommand {
    /// Color as `#rrggbb` or `rrggbb`
    pub hex: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Favorites commands.
#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List saved colors
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Save a color
    Add {
        /// Color as `#rrggbb` or `rrggbb`
        hex: String,
    },

    /// Delete a saved color
    Remove {
        /// Color as `#rrggbb` or `rrggbb`
        hex: String,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_command() {
        let cmd = StatusCommand { json: true };
        assert!(cmd.json);
    }

    #[test]
    fn test_favorites_command_debug() {
        let cmd = FavoritesCommand::Add {
            hex: "#123456".to_string(),
        };
        assert!(format!("{cmd:?}").contains("#123456"));
    }

    #[test]
    fn test_config_validate_with_file() {
        let cmd = ConfigCommand::Validate {
            file: Some(PathBuf::from("/custom/config.toml")),
        };
        if let ConfigCommand::Validate { file } = cmd {
            assert_eq!(file, Some(PathBuf::from("/custom/config.toml")));
        }
    }
}
