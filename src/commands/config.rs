//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("herakles-task-filter.yaml"),
    };

    let mut content = render_config(&config, format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Herakles Task Filter Configuration
# ==================================
#
# Process Filter
# --------------
# record_cpu_top: null         # Keep the N processes with most CPU time (null = disabled)
# record_mem_top: null         # Keep the N processes with most resident memory (null = disabled)
#                              # CPU and memory selections are merged; a limit larger
#                              # than the number of processes disables the filter
#
# Thread Filter
# -------------
# thread_max: null             # Keep at most K threads per process (null = disabled)
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
#
# Output
# ------
# pretty_output: true          # Pretty-print filtered JSON dumps
"#;

    format!("{comments}\n{yaml}")
}
