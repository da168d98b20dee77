//! Top-N process filter.
//!
//! Restricts a snapshot to the union of the N processes with the highest
//! cumulative CPU time and the M processes with the highest resident
//! memory. A selected process always keeps all of its threads.

use std::borrow::Cow;
use tracing::debug;

use crate::limits::FilterLimits;
use crate::rank::{top_group_ids, RankAxis};
use crate::task::{Snapshot, SnapshotBuilder};

/// Applies the CPU and memory top-N limits.
///
/// Returns the input unchanged when both limits are unset, or when either
/// configured limit exceeds the number of processes in the snapshot.
pub fn filter_top_processes<'a>(snapshot: &'a Snapshot, limits: &FilterLimits) -> Cow<'a, Snapshot> {
    let cpu_top = limits.cpu_top_n();
    let mem_top = limits.mem_top_n();

    if cpu_top.is_none() && mem_top.is_none() {
        return Cow::Borrowed(snapshot);
    }

    let nprocs = snapshot.process_count();
    for (axis, limit) in [(RankAxis::Cpu, cpu_top), (RankAxis::Memory, mem_top)] {
        if let Some(n) = limit {
            if n > nprocs {
                debug!(
                    "{} top-{} exceeds {} processes in snapshot, skipping process filter",
                    axis, n, nprocs
                );
                return Cow::Borrowed(snapshot);
            }
        }
    }

    let cpu_ids = cpu_top.map(|n| top_group_ids(snapshot.processes(), RankAxis::Cpu, n));
    let mem_ids = mem_top.map(|n| top_group_ids(snapshot.processes(), RankAxis::Memory, n));

    let selected = |tgid: u32| {
        let in_set = |ids: &Option<Vec<u32>>| ids.as_ref().is_some_and(|v| v.binary_search(&tgid).is_ok());
        in_set(&cpu_ids) || in_set(&mem_ids)
    };

    let tasks = snapshot.tasks();
    let mut builder = SnapshotBuilder::with_capacity(tasks.len(), nprocs);
    for group in snapshot.groups() {
        let leader = &tasks[group.leader];
        if selected(leader.tgid) {
            builder.push_group(leader, &tasks[group.threads.clone()]);
        }
    }
    let filtered = builder.finish();

    debug!(
        "Process filter kept {}/{} processes ({}/{} tasks)",
        filtered.process_count(),
        nprocs,
        filtered.task_count(),
        snapshot.task_count()
    );

    Cow::Owned(filtered)
}
