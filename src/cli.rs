use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelstream")]
#[command(author, version, about = "HTTP byte-range video server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the video server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Register a video in the catalog
    Add {
        /// Catalog identifier used in /video/{id}
        id: String,

        /// Path relative to the media root, without extension
        path: String,

        /// File extension, e.g. ".mp4"
        extension: String,

        /// File size in bytes (read from disk when omitted)
        #[arg(long)]
        size: Option<u64>,
    },

    /// Show one catalog entry
    Show {
        /// Catalog identifier
        id: String,
    },

    /// Remove a video from the catalog (the file is left in place)
    Remove {
        /// Catalog identifier
        id: String,
    },

    /// List catalog entries
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
