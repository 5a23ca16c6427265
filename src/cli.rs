use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./fastfiction.json";

#[derive(Parser)]
#[command(name = "fastfiction")]
#[command(author, version, about = "Browse a small book catalog: authors, books, users and reviews")]
pub struct Cli {
    /// Path to config file [default: ./fastfiction.json]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path (overrides database.path from the config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server with the catalog pages and JSON API
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not seed empty tables on startup
        #[arg(long)]
        no_seed: bool,
    },

    /// Insert the sample fixtures into every empty table
    Seed,

    /// List every book with its author and average rating
    Books {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the reviews of one book
    Reviews {
        /// Book ID
        book_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List books that have no reviews
    Unreviewed {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the full text of one book
    Text {
        /// Book ID
        book_id: String,
    },

    /// Dump every row of a table as JSON (authors, books, users, reviews)
    Dump {
        /// Table name
        table: String,
    },

    /// Validate the configuration file
    Validate,

    /// Display version information
    Version,
}
