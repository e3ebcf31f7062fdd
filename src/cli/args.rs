//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::{Translation, TraversalOrder};

/// Build, traverse and reorder forests described by indented outlines
#[derive(Parser, Debug)]
#[command(name = "treebuilder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print author and version
    #[arg(short, long)]
    pub info: bool,

    /// Treat node values as text instead of integers
    #[arg(short, long, global = true)]
    pub text: bool,

    /// Spaces per nesting level (overrides config)
    #[arg(long, global = true)]
    pub indent: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print node values in traversal order
    Path {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// pre-order, in-order or post-order (default from config)
        #[arg(short, long)]
        order: Option<TraversalOrder>,
        /// Translation to apply before traversing
        #[arg(short = 'x', long)]
        translate: Option<Translation>,
        /// One value per line
        #[arg(short, long)]
        lines: bool,
        /// One line per root instead of one path for the whole forest
        #[arg(long)]
        per_root: bool,
    },

    /// Apply a translation and show the result
    Translate {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// mirror (reverse), sort-ascending or sort-descending
        translation: Translation,
    },

    /// Show the forest as a tree
    Show {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Count roots, nodes and leaves, and report depth
    Stats {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show effective configuration
    Config {
        /// Print a commented template instead
        #[arg(long)]
        template: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
