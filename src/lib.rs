//! Herakles Task Filter Library
//!
//! Reduces a per-cycle snapshot of processes and threads to a bounded subset
//! suitable for logging. A host with thousands of short-lived processes, or a
//! process with thousands of threads, would otherwise produce unbounded log
//! volume.
//!
//! # Stages
//!
//! - **Metric aggregation**: maximum CPU, memory and effective disk values
//! - **Top-N process filter**: union of the N busiest processes by CPU and the
//!   M largest by resident memory, each kept with all its threads
//! - **Top-K thread filter**: per process, at most K threads ranked by a
//!   normalized CPU/memory/disk score
//!
//! # Usage
//!
//! ```rust
//! use herakles_task_filter::{filter_snapshot, FilterLimits, Snapshot, TaskRecord};
//!
//! let snapshot = Snapshot::new(vec![
//!     TaskRecord::process(100, "postgres", 2).with_cpu(900, 100).with_mem(512_000),
//!     TaskRecord::thread(100, 100, "postgres").with_cpu(800, 90),
//!     TaskRecord::thread(100, 101, "postgres").with_cpu(100, 10),
//!     TaskRecord::process(200, "cron", 0).with_cpu(3, 1).with_mem(2_000),
//! ])
//! .expect("threads follow their leader");
//!
//! let limits = FilterLimits::new(Some(1), None, Some(1));
//! let filtered = filter_snapshot(&snapshot, &limits);
//!
//! assert_eq!(filtered.snapshot.process_count(), 1);
//! assert_eq!(filtered.snapshot.task_count(), 2);
//! assert!(filtered.report.released_intermediate);
//! ```

pub mod dump;
pub mod filter;
pub mod limits;
pub mod metrics;
pub mod rank;
pub mod task;

// Re-export main types for convenience
pub use dump::{load_dump, parse_dump, render_dump, save_dump, DumpError, SnapshotDump};
pub use filter::{
    filter_snapshot, filter_top_processes, filter_top_threads, FilterReport, Filtered,
    StageOutcome,
};
pub use limits::FilterLimits;
pub use metrics::MetricMaxima;
pub use rank::RankAxis;
pub use task::{CpuStat, DiskStat, MemStat, Snapshot, SnapshotError, TaskGroup, TaskRecord};
