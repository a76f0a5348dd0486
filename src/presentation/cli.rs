//! Command-line surface of the `dunning` binary.
//!
//! Without a subcommand the binary runs the dispatcher. `periods` and
//! `overdue` are read-only helpers.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "dunning")]
#[command(author, version, about = "Sends WhatsApp payment reminders for open receivables", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    /// Append logs to this file as well as stderr.
    #[arg(long, global = true, default_value = "dunning.log")]
    pub log_file: PathBuf,

    /// Log to stderr only.
    #[arg(long, global = true)]
    pub no_log_file: bool,

    /// Output format of the final report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn log_file(&self) -> Option<&Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }
}

/// Options for a dispatch run.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Run only this period (for example `D+7`).
    #[arg(long)]
    pub period: Option<String>,

    /// Per-period message cap; overrides DISPATCH_MAX_MESSAGES.
    #[arg(long)]
    pub max_messages: Option<NonZeroUsize>,

    /// Log the messages instead of sending them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the dunning periods and their date rules.
    Periods,
    /// Report invoices overdue by at least N days.
    Overdue(OverdueArgs),
}

#[derive(Debug, Clone, Args)]
pub struct OverdueArgs {
    #[arg(long, default_value_t = 1)]
    pub min_days: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
