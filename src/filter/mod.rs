//! Snapshot filtering stages and the orchestrator that chains them.
//!
//! This module provides:
//! - `top_n`: process selection by CPU and memory rank
//! - `threads`: per-process thread capping by normalized score
//!
//! [`filter_snapshot`] runs the process filter first and feeds its result
//! into the thread filter. Each stage either borrows its input unchanged or
//! returns a new owned snapshot; the caller's snapshot is never consumed.

pub mod threads;
pub mod top_n;

pub use threads::filter_top_threads;
pub use top_n::filter_top_processes;

use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

use crate::limits::FilterLimits;
use crate::task::Snapshot;

/// What a single stage did to its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageOutcome {
    /// Input passed through without a copy.
    Unchanged,
    /// A new snapshot was built.
    Filtered { tasks_in: usize, tasks_out: usize },
}

impl StageOutcome {
    fn of(input: &Snapshot, output: &Cow<'_, Snapshot>) -> Self {
        match output {
            Cow::Borrowed(_) => StageOutcome::Unchanged,
            Cow::Owned(s) => StageOutcome::Filtered {
                tasks_in: input.task_count(),
                tasks_out: s.task_count(),
            },
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, StageOutcome::Filtered { .. })
    }
}

/// Summary of one [`filter_snapshot`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub processes: StageOutcome,
    pub threads: StageOutcome,
    /// The process filter's output was dropped in favour of the thread
    /// filter's output.
    pub released_intermediate: bool,
    pub tasks_before: usize,
    pub tasks_after: usize,
    pub processes_before: usize,
    pub processes_after: usize,
}

/// Result of a filtering pass.
#[derive(Debug)]
pub struct Filtered<'a> {
    pub snapshot: Cow<'a, Snapshot>,
    pub report: FilterReport,
}

impl Filtered<'_> {
    /// True when neither stage built a new snapshot.
    pub fn is_unchanged(&self) -> bool {
        matches!(self.snapshot, Cow::Borrowed(_))
    }
}

/// Runs the process filter followed by the thread filter.
pub fn filter_snapshot<'a>(snapshot: &'a Snapshot, limits: &FilterLimits) -> Filtered<'a> {
    let proc_filtered = filter_top_processes(snapshot, limits);
    let processes = StageOutcome::of(snapshot, &proc_filtered);

    let (task_filtered, threads) = {
        let out = filter_top_threads(&proc_filtered, limits.thread_cap());
        let outcome = StageOutcome::of(&proc_filtered, &out);
        (
            match out {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            },
            outcome,
        )
    };

    // Only the intermediate this pass allocated is dropped here; a borrowed
    // intermediate is the caller's snapshot.
    let released_intermediate = task_filtered.is_some() && processes.is_filtered();
    let result = match task_filtered {
        Some(s) => {
            drop(proc_filtered);
            Cow::Owned(s)
        }
        None => proc_filtered,
    };

    let report = FilterReport {
        processes,
        threads,
        released_intermediate,
        tasks_before: snapshot.task_count(),
        tasks_after: result.task_count(),
        processes_before: snapshot.process_count(),
        processes_after: result.process_count(),
    };
    debug!(?report, "Snapshot filter pass complete");

    Filtered {
        snapshot: result,
        report,
    }
}
