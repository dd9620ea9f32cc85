use std::path::PathBuf;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub(crate) verbose: u8,
    #[command(subcommand)]
    pub(crate) command: FormulaCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum FormulaCommand {
    /// Installs a formula from a fetched staging directory, then smoke-tests it
    Install {
        /// Path to a formula `.toml` file or the name of a built-in formula
        formula: String,
        /// Directory holding the fetched source
        #[clap(long)]
        staging: PathBuf,
        /// Installation prefix. Defaults to $FORMULATE_PREFIX, the config file or the data dir
        #[clap(long)]
        prefix: Option<PathBuf>,
        /// Do not run the smoke test after installing
        #[clap(long)]
        skip_test: bool,
    },
    /// Runs the smoke test of an installed formula
    Test {
        formula: String,
        #[clap(long)]
        prefix: Option<PathBuf>,
    },
    /// Removes the wrapper and installed script of a formula
    Uninstall {
        formula: String,
        #[clap(long)]
        prefix: Option<PathBuf>,
    },
    /// Shows the formula metadata
    Info {
        formula: String,
        /// Print as JSON
        #[clap(long)]
        json: bool,
    },
    /// Prints the wrapper that would be generated, without installing
    Wrapper {
        formula: String,
        #[clap(long)]
        prefix: Option<PathBuf>,
    },
}
