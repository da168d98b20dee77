//! herakles-task-filter - version 0.1.0
//!
//! Top-N process and top-K thread filter for task snapshots, with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info, Level};

use cli::{Args, Commands};
use commands::{command_check, command_config, command_filter, command_generate};
use config::{resolve_config, show_config, validate_effective_config, Config, DEFAULT_LOG_LEVEL};

/// Initializes tracing logging subsystem with configured log level.
/// Logs go to stderr so dumps written to stdout stay parseable.
fn setup_logging(config: &Config) {
    let level = config
        .log_level
        .as_deref()
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_ascii_lowercase();

    if level == "off" {
        return;
    }

    let log_level = match level.as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    debug!("Logging initialized with level: {}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Config generation does not need a valid effective config
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return command_config(output.clone(), *format, *commented);
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config);

    let command = args.command.unwrap_or(Commands::Filter {
        input: PathBuf::from("-"),
        output: PathBuf::from("-"),
        summary: false,
    });

    let result = match command {
        Commands::Filter {
            input,
            output,
            summary,
        } => command_filter(&input, &output, summary, &config),

        Commands::Generate {
            output,
            processes,
            max_threads,
            seed,
        } => command_generate(
            &output,
            processes,
            max_threads,
            seed,
            config.pretty_output.unwrap_or(true),
        ),

        Commands::Check { input } => command_check(input.as_deref(), &config),

        Commands::Config { .. } => unreachable!("Config handled above"),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        return Err(e.into());
    }

    info!("herakles-task-filter finished");
    Ok(())
}
