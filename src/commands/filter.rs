//! Filter command implementation.
//!
//! Loads a snapshot dump, runs the process and thread filters with the
//! effective limits, and writes the reduced dump or a summary table.

use anyhow::Context;
use herakles_task_filter::{
    filter_snapshot, load_dump, save_dump, FilterReport, Snapshot, StageOutcome,
};
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Runs one filtering pass over a dump file.
pub fn command_filter(
    input: &Path,
    output: &Path,
    summary: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let snapshot = load_dump(input)
        .with_context(|| format!("Failed to load snapshot from {}", input.display()))?;

    let limits = config.limits();
    info!(
        "Filtering with cpu_top={:?} mem_top={:?} thread_max={:?}",
        limits.cpu_top_n(),
        limits.mem_top_n(),
        limits.thread_cap()
    );

    let filtered = filter_snapshot(&snapshot, &limits);
    log_report(&filtered.report);

    if summary {
        print!("{}", render_summary(&filtered.snapshot, &filtered.report));
        return Ok(());
    }

    let pretty = config.pretty_output.unwrap_or(true);
    save_dump(output, &filtered.snapshot, pretty)
        .with_context(|| format!("Failed to write filtered snapshot to {}", output.display()))?;

    Ok(())
}

fn log_report(report: &FilterReport) {
    let describe = |outcome: &StageOutcome| match outcome {
        StageOutcome::Unchanged => "unchanged".to_string(),
        StageOutcome::Filtered {
            tasks_in,
            tasks_out,
        } => format!("{tasks_in} -> {tasks_out} tasks"),
    };

    info!(
        "Process filter: {}, thread filter: {}",
        describe(&report.processes),
        describe(&report.threads)
    );
    info!(
        "Kept {}/{} processes, {}/{} tasks",
        report.processes_after, report.processes_before, report.tasks_after, report.tasks_before
    );
}

/// Per-process table: pid, name, kept thread records, CPU seconds, memory.
fn render_summary(snapshot: &Snapshot, report: &FilterReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>8}  {:<20} {:>8} {:>12} {:>12} {:>12}\n",
        "TGID", "NAME", "THREADS", "CPU(s)", "RSS(MB)", "DISK"
    ));

    let tasks = snapshot.tasks();
    for group in snapshot.groups() {
        let leader = &tasks[group.leader];
        out.push_str(&format!(
            "{:>8}  {:<20} {:>4}/{:<3} {:>12.2} {:>12.1} {:>12}\n",
            leader.tgid,
            truncate(&leader.name, 20),
            group.thread_count(),
            leader.nthr,
            leader.cpu.seconds(),
            leader.mem.rmem as f64 / 1024.0,
            leader.effective_disk()
        ));
    }

    out.push_str(&format!(
        "\n{} of {} processes, {} of {} tasks kept\n",
        report.processes_after, report.processes_before, report.tasks_after, report.tasks_before
    ));
    out
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        name.chars().take(max).collect()
    }
}
