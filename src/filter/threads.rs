//! Top-K thread filter.
//!
//! Caps the number of thread records kept per process. Threads are ranked
//! by their normalized CPU, memory and disk score, with maxima taken over
//! the whole snapshot so every process is scored on the same scale.

use std::borrow::Cow;
use tracing::{debug, trace};

use crate::metrics::MetricMaxima;
use crate::task::{Snapshot, SnapshotBuilder, TaskRecord};

/// Keeps at most `thread_cap` threads for every process whose recorded
/// thread count exceeds it.
///
/// Returns the input unchanged when the cap is unset or not smaller than
/// the total number of task records.
pub fn filter_top_threads(snapshot: &Snapshot, thread_cap: Option<usize>) -> Cow<'_, Snapshot> {
    let cap = match thread_cap.filter(|&k| k > 0) {
        Some(k) if k < snapshot.task_count() => k,
        _ => return Cow::Borrowed(snapshot),
    };

    let tasks = snapshot.tasks();
    let maxima = MetricMaxima::from_tasks(tasks);
    debug!(
        "Thread filter cap={} maxima cpu={} mem={} dsk={}",
        cap, maxima.cpu, maxima.mem, maxima.dsk
    );

    let mut builder = SnapshotBuilder::with_capacity(tasks.len(), snapshot.process_count());
    let mut trimmed_groups = 0usize;

    for group in snapshot.groups() {
        let leader = &tasks[group.leader];
        let threads = &tasks[group.threads.clone()];

        if leader.nthr <= cap {
            builder.push_group(leader, threads);
            continue;
        }

        let keep = select_top_threads(threads, cap, &maxima);
        trace!(
            "Process {} ({}) has {} threads, keeping {}",
            leader.tgid,
            leader.name,
            leader.nthr,
            keep.len()
        );
        builder.push_group(leader, keep.into_iter().map(|i| &threads[i]));
        trimmed_groups += 1;
    }

    let filtered = builder.finish();
    debug!(
        "Thread filter trimmed {} processes, kept {}/{} tasks",
        trimmed_groups,
        filtered.task_count(),
        snapshot.task_count()
    );

    Cow::Owned(filtered)
}

/// Indices of the `min(cap, threads.len())` highest-scoring threads, in
/// their original order.
fn select_top_threads(threads: &[TaskRecord], cap: usize, maxima: &MetricMaxima) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = threads
        .iter()
        .enumerate()
        .map(|(i, t)| (i, maxima.score(t)))
        .collect();

    // Stable sort: equal scores keep collection order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(cap);

    let mut keep: Vec<usize> = scored.into_iter().map(|(i, _)| i).collect();
    keep.sort_unstable();
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// One process whose threads carry the given (cpu, mem) pairs.
    fn process_with_threads(tgid: u32, threads: &[(u64, u64)]) -> Vec<TaskRecord> {
        let mut tasks = vec![TaskRecord::process(tgid, "app", threads.len())];
        for (i, &(cpu, mem)) in threads.iter().enumerate() {
            tasks.push(
                TaskRecord::thread(tgid, tgid + i as u32, "app")
                    .with_cpu(cpu, 0)
                    .with_mem(mem),
            );
        }
        tasks
    }

    fn thread_pids(snapshot: &Snapshot) -> Vec<u32> {
        snapshot
            .tasks()
            .iter()
            .filter(|t| !t.is_proc)
            .map(|t| t.pid)
            .collect()
    }

    // -------------------------------------------------------------------------
    // Tests for select_top_threads
    // -------------------------------------------------------------------------

    #[test]
    fn test_select_takes_min_of_cap_and_threads() {
        let threads: Vec<TaskRecord> = (0..3)
            .map(|i| TaskRecord::thread(1, i, "t").with_cpu(i as u64, 0))
            .collect();
        let maxima = MetricMaxima::from_tasks(&threads);

        assert_eq!(select_top_threads(&threads, 10, &maxima), vec![0, 1, 2]);
        assert_eq!(select_top_threads(&threads, 2, &maxima), vec![1, 2]);
        assert!(select_top_threads(&[], 2, &maxima).is_empty());
    }

    #[test]
    fn test_select_with_all_zero_maxima_keeps_first() {
        let threads: Vec<TaskRecord> = (0..4).map(|i| TaskRecord::thread(1, i, "idle")).collect();
        let maxima = MetricMaxima::from_tasks(&threads);
        assert!(maxima.is_zero());
        assert_eq!(select_top_threads(&threads, 2, &maxima), vec![0, 1]);
    }

    // -------------------------------------------------------------------------
    // Tests for filter_top_threads
    // -------------------------------------------------------------------------

    #[test]
    fn test_unset_cap_borrows_input() {
        let snapshot = Snapshot::new(process_with_threads(1, &[(1, 1), (2, 2)])).unwrap();
        assert!(matches!(filter_top_threads(&snapshot, None), Cow::Borrowed(_)));
        assert!(matches!(filter_top_threads(&snapshot, Some(0)), Cow::Borrowed(_)));
    }

    #[test]
    fn test_cap_not_below_task_count_borrows_input() {
        let snapshot = Snapshot::new(process_with_threads(1, &[(1, 1), (2, 2)])).unwrap();
        assert!(matches!(filter_top_threads(&snapshot, Some(3)), Cow::Borrowed(_)));
        assert!(matches!(filter_top_threads(&snapshot, Some(30)), Cow::Borrowed(_)));
    }

    #[test]
    fn test_small_group_copied_unchanged() {
        let mut tasks = process_with_threads(1, &[(1, 1), (2, 2)]);
        tasks.extend(process_with_threads(100, &[(0, 0); 6]));
        let snapshot = Snapshot::new(tasks).unwrap();

        let out = filter_top_threads(&snapshot, Some(5));
        assert!(matches!(out, Cow::Owned(_)));
        assert_eq!(&out.tasks()[0..3], &snapshot.tasks()[0..3]);
        assert_eq!(out.groups()[1].thread_count(), 5);
    }

    #[test]
    fn test_heavy_group_keeps_leader_and_top_threads() {
        let threads: Vec<(u64, u64)> = vec![
            (1, 1),
            (50, 10),
            (2, 2),
            (10, 100),
            (3, 3),
        ];
        let snapshot = Snapshot::new(process_with_threads(1000, &threads)).unwrap();

        let out = filter_top_threads(&snapshot, Some(2));
        assert_eq!(out.task_count(), 3);
        assert!(out.tasks()[0].is_proc);
        // scores: 1001 -> 1.1, 1003 -> 1.2
        assert_eq!(thread_pids(&out), vec![1001, 1003]);
    }

    #[test]
    fn test_recorded_count_decides_not_actual_records() {
        // Leader claims 2 threads but 4 records follow: group left alone
        let mut tasks = process_with_threads(1, &[(1, 1), (2, 2), (3, 3), (4, 4)]);
        tasks[0].nthr = 2;
        let snapshot = Snapshot::new(tasks).unwrap();

        let out = filter_top_threads(&snapshot, Some(2));
        assert_eq!(out.tasks(), snapshot.tasks());
    }

    #[test]
    fn test_maxima_are_global_across_processes() {
        // Process 1's threads are dwarfed by process 2 on cpu; memory decides
        let mut tasks = process_with_threads(1, &[(5, 10), (6, 1), (4, 30)]);
        tasks.extend(process_with_threads(200, &[(1000, 0)]));
        let snapshot = Snapshot::new(tasks).unwrap();

        let out = filter_top_threads(&snapshot, Some(1));
        assert_eq!(thread_pids(&out), vec![3, 200]);
    }
}
