//! CLI Module
//!
//! Command-line interface for building, composing and saving avatars.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Avatar Studio - stylized face customizer
#[derive(Parser, Debug)]
#[command(name = "avatar-studio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every feature with its domain and default
    #[command(name = "defaults")]
    Defaults,

    /// Print the render layout of an avatar as JSON
    #[command(name = "compose")]
    Compose {
        /// Feature change as key=value (repeatable, applied in order)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Start from a saved avatar instead of defaults
        #[arg(long)]
        from: Option<String>,

        /// Also emit absent parts, marked invisible
        #[arg(long)]
        include_hidden: bool,
    },

    /// Save an avatar under a name
    #[command(name = "save")]
    Save {
        /// Name of the avatar
        name: String,

        /// Feature change as key=value (repeatable, applied in order)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// List saved avatars
    #[command(name = "list")]
    List,

    /// Print the feature values of a saved avatar
    #[command(name = "show")]
    Show {
        /// Id of the saved avatar
        id: String,
    },
}
