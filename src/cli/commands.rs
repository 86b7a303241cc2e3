//! CLI command definitions

use crate::application::Selection;
use crate::error::{IncludeError, Result};
use crate::infrastructure::{Config, SafeMode};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "include-ext")]
#[command(about = "Expand include directives with line and tag selection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand every include directive in a document
    Expand {
        /// Document to expand
        file: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if any include could not be resolved
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Print the lines of a file picked by line ranges or tags
    Select {
        /// File to select lines from
        file: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Write the effective include policy to a TOML config file
    Config {
        /// Where to write the config
        path: PathBuf,

        #[command(flatten)]
        policy: PolicyArgs,
    },
}

/// Include policy, layered over an optional config file
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Safe mode (unsafe, safe, server, secure) [default: safe]
    #[arg(long)]
    pub safe_mode: Option<String>,

    /// Maximum nesting of includes [default: 64]
    #[arg(long)]
    pub max_include_depth: Option<i64>,

    /// Allow including remote (URI) targets
    #[arg(long)]
    pub allow_uri_read: bool,

    /// Directory local includes may not escape [default: directory of FILE]
    #[arg(long)]
    pub base_dir: Option<PathBuf>,
}

impl PolicyArgs {
    /// Build the effective config: file (or defaults), then flags.
    ///
    /// Without a config file the command line defaults to `safe` mode rather
    /// than the library's `secure`.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::new(SafeMode::Safe),
        };

        if let Some(mode) = &self.safe_mode {
            config.safe_mode = SafeMode::from_str(mode).map_err(IncludeError::Config)?;
        }
        if let Some(depth) = self.max_include_depth {
            config.max_include_depth = depth;
        }
        if self.allow_uri_read {
            config.allow_uri_read = true;
        }
        if let Some(dir) = &self.base_dir {
            config.base_dir = Some(dir.clone());
        }

        Ok(config)
    }
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct SelectionArgs {
    /// Line ranges, e.g. "1;3..4;6..-1"
    #[arg(long)]
    pub lines: Option<String>,

    /// A single tag name, optionally prefixed with '!'
    #[arg(long)]
    pub tag: Option<String>,

    /// Tag names separated by ',' or ';', e.g. "snippets;!snippet-b"
    #[arg(long)]
    pub tags: Option<String>,
}

impl SelectionArgs {
    pub fn selection(&self) -> Selection {
        if let Some(lines) = &self.lines {
            Selection::Lines(lines.clone())
        } else if let Some(tag) = &self.tag {
            Selection::Tag(tag.clone())
        } else if let Some(tags) = &self.tags {
            Selection::Tags(tags.clone())
        } else {
            Selection::All
        }
    }
}
