mod state_arg;

use clap::{Parser, Subcommand, ValueEnum};
pub use state_arg::{AllArg, SetArg, StateArgError, parse_state};
use std::path::PathBuf;

/// Compose a boolean filter for a tag-management application from a panel of
/// tri-state controls
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Panel definition file (TOML)
    #[arg(short, long, global = true, env = "FILTER_PANEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase diagnostic output on stderr
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the panel into a filter string and print it
    Build {
        /// Set one control, e.g. "Genre:rock=include"
        #[arg(short, long = "set", value_name = "GROUP:CONTROL=STATE")]
        set: Vec<SetArg>,

        /// Cascade a state through a group toggle, e.g. "Genre=exclude"
        #[arg(short, long = "all", value_name = "GROUP=STATE")]
        all: Vec<AllArg>,

        /// Print the escaped form handed to the injection sink
        #[arg(short, long)]
        escaped: bool,

        /// Also write the filter to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile the panel and transmit the escaped filter through the sink
    Send {
        /// Set one control, e.g. "Genre:rock=include"
        #[arg(short, long = "set", value_name = "GROUP:CONTROL=STATE")]
        set: Vec<SetArg>,

        /// Cascade a state through a group toggle, e.g. "Genre=exclude"
        #[arg(short, long = "all", value_name = "GROUP=STATE")]
        all: Vec<AllArg>,

        /// Print what would be sent instead of invoking the sink command
        #[arg(short, long)]
        dry_run: bool,
    },
    /// Show every group and control with its state and contribution
    Info,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
