use clap::{Parser, Subcommand};
use dailydose_core::QuoteId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dailydose")]
#[command(about = "Quote of the day with offline fallback", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show today's quote, falling back to cached quotes offline
    #[command(alias = "t")]
    Today,

    /// Fetch again; offline, show a different cached quote
    #[command(alias = "r")]
    Refresh {
        /// ID of the quote currently shown, to avoid repeating it
        #[arg(long)]
        after: Option<QuoteId>,
    },

    /// Show a random cached quote
    Random {
        /// ID of the quote currently shown, to avoid repeating it
        #[arg(long)]
        after: Option<QuoteId>,
    },

    /// List stored quotes, most recent first
    #[command(alias = "ls")]
    History {
        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
    },

    /// Toggle the favorite flag of a quote
    #[command(alias = "fav")]
    Favorite { id: QuoteId },

    /// Delete one quote
    #[command(alias = "rm")]
    Delete { id: QuoteId },

    /// Delete every stored quote
    Clear,
}
