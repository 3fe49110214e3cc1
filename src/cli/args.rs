//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Forum hierarchy administration: list, create, edit, delete and reorder forums
#[derive(Parser, Debug)]
#[command(name = "forumtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Forum store snapshot (overrides config)
    #[arg(short, long, global = true, env = "FORUMTREE_STORE", value_hint = ValueHint::FilePath)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List forums in tree order
    List,

    /// Show forums as a tree
    Tree,

    /// Create a forum as last child of its parent
    New {
        /// Forum name
        name: String,
        /// Parent forum id (default: top level)
        #[arg(short, long)]
        parent: Option<u64>,
        /// Forum description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Edit a forum
    Edit {
        /// Forum id
        id: u64,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// Move under this parent (as last child)
        #[arg(short, long, conflicts_with = "top_level")]
        parent: Option<u64>,
        /// Move to the top level (as last forum)
        #[arg(long)]
        top_level: bool,
    },

    /// Delete a forum without children
    Delete {
        /// Forum id
        id: u64,
    },

    /// Move a forum before its previous sibling
    MoveUp {
        /// Forum id
        id: u64,
    },

    /// Move a forum after its next sibling
    MoveDown {
        /// Forum id
        id: u64,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
