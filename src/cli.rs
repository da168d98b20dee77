//! CLI arguments and subcommands for herakles-task-filter.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-task-filter",
    about = "Bounded-volume top-N process and top-K thread filter for task snapshots",
    long_about = "Bounded-volume top-N process and top-K thread filter for task snapshots.\n\n\
                  Reduces a snapshot of all processes and threads to the busiest processes by \
                  CPU and memory, and caps the threads kept per process by a normalized \
                  CPU/memory/disk score, so monitoring logs stay bounded.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Keep the N processes with the highest cumulative CPU time (override config)
    #[arg(long)]
    pub cpu_top: Option<usize>,

    /// Keep the N processes with the highest resident memory (override config)
    #[arg(long)]
    pub mem_top: Option<usize>,

    /// Keep at most K threads per process (override config)
    #[arg(long)]
    pub thread_max: Option<usize>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter a snapshot dump with the effective limits
    Filter {
        /// Snapshot dump to read ("-" for stdin)
        #[arg(short = 'i', long, default_value = "-")]
        input: PathBuf,

        /// Where to write the filtered dump ("-" for stdout)
        #[arg(short = 'o', long, default_value = "-")]
        output: PathBuf,

        /// Print a per-process summary table instead of the filtered dump
        #[arg(long)]
        summary: bool,
    },

    /// Generate a synthetic snapshot dump
    Generate {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long, default_value = "snapshot.json")]
        output: PathBuf,

        /// Number of processes to generate
        #[arg(long, default_value_t = 50)]
        processes: usize,

        /// Maximum number of threads per process
        #[arg(long, default_value_t = 16)]
        max_threads: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Validate configuration and a snapshot dump
    Check {
        /// Snapshot dump to validate
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },
}
