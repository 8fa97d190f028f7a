//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Hierarchical checklists: tri-state selection over folder/file trees
#[derive(Parser, Debug)]
#[command(name = "checktree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Disable colored glyphs
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Document to load plus toggles to apply, in order.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Checklist document (JSON); defaults to settings, then the built-in sample
    #[arg(short = 'f', long = "file", value_hint = ValueHint::FilePath)]
    pub document: Option<PathBuf>,

    /// Toggle a node by id (folders cascade, files reconcile parents)
    #[arg(short, long = "toggle", value_name = "ID")]
    pub toggles: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the checklist as a tree with tri-state checkboxes
    Tree {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// List selected ids in tree order
    Selected {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Show depth-annotated rows
    Flat {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Collapse a folder by id
        #[arg(long, value_name = "ID")]
        collapse: Vec<String>,
    },

    /// Add an empty-named (or named) file under a folder
    Insert {
        /// Checklist document (JSON)
        #[arg(short = 'f', long = "file", value_hint = ValueHint::FilePath)]
        document: Option<PathBuf>,
        /// Id of the folder receiving the item
        parent: String,
        /// Name of the new item
        #[arg(default_value = "")]
        name: String,
        /// Print the resulting document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename an item in place
    Rename {
        /// Checklist document (JSON)
        #[arg(short = 'f', long = "file", value_hint = ValueHint::FilePath)]
        document: Option<PathBuf>,
        /// Id of the item
        id: String,
        /// New name
        name: String,
        /// Print the resulting document as JSON
        #[arg(long)]
        json: bool,
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
    /// Print effective settings as TOML
    Show,
    /// Print the global config file location
    Path,
}
