use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "versecast")]
#[command(author, version, about = "Scripture audio HLS playlist service")]
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
    /// Start the HTTP server
    Start {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Initialize or upgrade a catalog database file
    Migrate {
        /// Database file (defaults to the configured path)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Sign one storage path with the configured key (debugging aid)
    Sign {
        /// Logical storage path, e.g. audio/ENGESV/ENGESVN2DA/B01.mp3
        #[arg(required = true)]
        path: String,
    },

    /// Generate a random signing key
    Keygen,
}
