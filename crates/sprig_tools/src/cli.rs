//! CLI interface for sprig-tools

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sprig-inspect")]
#[command(about = "Inspect LL(1) grammars, parse tables and parse trees")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print nullable, FIRST and FOLLOW sets
    Sets {
        /// Grammar file (`-` for stdin)
        grammar: PathBuf,
    },

    /// Print the LL(1) parse table and any conflicts
    Table {
        /// Grammar file (`-` for stdin)
        grammar: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print grammar metrics and suggestions for fixing conflicts
    Analyze {
        /// Grammar file (`-` for stdin)
        grammar: PathBuf,

        /// Output format; `dot` draws the nonterminal dependency graph
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Parse a toy-language program and print its tree
    Parse {
        /// Source file (`-` for stdin)
        input: PathBuf,

        /// Print the raw derivation tree instead of the reduced CST
        #[arg(long)]
        raw: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = TreeFormat::Text)]
        format: TreeFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text
    Text,
    /// Graphviz DOT
    Dot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    /// Indented outline
    Text,
    /// One-line S-expression
    Sexpr,
    /// Graphviz DOT
    Dot,
    /// Typed program, printed back as source
    Program,
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
