//! CLI argument definitions using clap
//!
//! Commands:
//! - deepcheck verify --text <claim> [--audience <tier>]
//! - deepcheck analyze --file <path> [--no-consensus]
//! - deepcheck cycle
//! - deepcheck monitor

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// deepcheck - Crisis misinformation detection and media forensics
#[derive(Parser, Debug)]
#[command(name = "deepcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a single claim and print the result as JSON
    Verify {
        /// The claim text to verify
        #[arg(long)]
        text: String,

        /// Audience tier for the explanation: simple, general, expert
        #[arg(long, default_value = "general")]
        audience: String,
    },

    /// Analyze an image or video file for manipulation
    Analyze {
        /// Path to the media file
        #[arg(long)]
        file: PathBuf,

        /// Disable dual-provider consensus for this analysis
        #[arg(long)]
        no_consensus: bool,
    },

    /// Run one detection cycle over the configured sources
    Cycle,

    /// Run detection cycles continuously
    Monitor,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
