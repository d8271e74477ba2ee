//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;

use crate::traverse::Order;

/// Build binary trees from level-order values, render and walk them
#[derive(Parser, Debug)]
#[command(name = "bintree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Node storage used to build the tree
    #[arg(long, value_enum, global = true, default_value_t = StorageArg::Dynamic)]
    pub storage: StorageArg,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArg {
    /// Caller-provided nodes
    Static,
    /// Engine-allocated nodes, bounded by the configured capacity
    Dynamic,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree
    Show {
        /// Level-order values, `_` marks a missing child
        values: Vec<String>,
    },

    /// Print the payloads in traversal order
    Walk {
        /// Traversal order (default from config)
        #[arg(short, long, value_enum)]
        order: Option<Order>,

        /// Level-order values, `_` marks a missing child
        values: Vec<String>,
    },

    /// Print the depth of the tree
    Depth {
        /// Level-order values, `_` marks a missing child
        values: Vec<String>,
    },

    /// Show effective settings
    Config,
}
