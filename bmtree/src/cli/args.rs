// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// A bookmark tree for the terminal: folders, bookmarks and favicons in one SQLite file
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize bookmark database
    CreateDb {
        /// pathname to database file
        path: String,
    },
    /// List the content of a folder
    Ls {
        /// folder path, e.g. /dev/rust
        #[arg(default_value = "/")]
        path: String,
        #[arg(
            short = 'i',
            long = "interleaved",
            help = "mix folders and bookmarks in manual order"
        )]
        interleaved: bool,
        #[arg(long = "json", help = "output as json")]
        is_json: bool,
    },
    /// Create a folder below PATH
    Mkdir {
        /// parent folder path
        path: String,
        title: String,
    },
    /// Add a bookmark to the folder at PATH
    Add {
        /// folder path
        path: String,
        url: String,
        #[arg(long = "title", help = "title, instead of the page title")]
        title: Option<String>,
        #[arg(long = "no-web", help = "do not fetch title and favicon")]
        no_web: bool,
    },
    /// Delete a folder with everything below it
    Rmdir { id: i32 },
    /// Delete a bookmark
    Rm { id: i32 },
    /// Show a folder
    ShowFolder { id: i32 },
    /// Show a bookmark
    Show { id: i32 },
    /// Move a folder below the folder at PATH
    MvFolder { id: i32, path: String },
    /// Move a bookmark into the folder at PATH
    Mv { id: i32, path: String },
    /// Rename a folder
    RenameFolder { id: i32, title: String },
    /// Move a folder or bookmark behind all of its siblings
    Bottom {
        id: i32,
        #[arg(short = 'f', long = "folder", help = "ID is a folder, not a bookmark")]
        folder: bool,
    },
    /// Change title, url or comment of a bookmark
    Edit {
        id: i32,
        #[arg(long = "title")]
        title: Option<String>,
        #[arg(long = "url")]
        url: Option<String>,
        #[arg(long = "comment")]
        comment: Option<String>,
    },
    /// Show the effective configuration
    Config {
        #[arg(long = "default", help = "print the default configuration as TOML")]
        default: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completion for (bash, zsh, fish)
        shell: String,
    },
}
