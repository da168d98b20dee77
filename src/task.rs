//! Task records and the snapshot container consumed by the filter stages.
//!
//! A snapshot is an ordered list of task records in which every process
//! leader is immediately followed by its thread records. That layout is
//! checked when a [`Snapshot`] is built, and the grouping it implies is
//! exposed through [`Snapshot::groups`].

use ahash::AHashSet as HashSet;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    100.0
}

/// System clock ticks per second (for converting CPU ticks to seconds).
pub static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// Accumulated CPU ticks of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuStat {
    #[serde(default)]
    pub utime: u64,
    #[serde(default)]
    pub stime: u64,
}

impl CpuStat {
    /// Cumulative CPU time in ticks (system + user).
    pub fn total(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }

    /// Cumulative CPU time in seconds.
    pub fn seconds(&self) -> f64 {
        self.total() as f64 / *CLK_TCK
    }
}

/// Memory counters of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStat {
    /// Resident memory size in KiB.
    #[serde(default)]
    pub rmem: u64,
}

/// Disk I/O counters of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskStat {
    /// Read operations.
    #[serde(default)]
    pub rio: u64,
    /// Write size.
    #[serde(default)]
    pub wsz: u64,
    /// Cancelled (merged) write size.
    #[serde(default)]
    pub cwsz: u64,
}

impl DiskStat {
    /// Effective disk volume: reads plus writes that were not cancelled.
    /// Never less than the read count alone.
    pub fn effective(&self) -> u64 {
        if self.wsz > self.cwsz {
            self.rio.saturating_add(self.wsz - self.cwsz)
        } else {
            self.rio
        }
    }
}

/// One process or thread observed in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub pid: u32,
    pub tgid: u32,
    #[serde(default)]
    pub name: String,
    pub is_proc: bool,
    /// Number of threads of the process. Only meaningful on the leader.
    #[serde(default)]
    pub nthr: usize,
    #[serde(default)]
    pub cpu: CpuStat,
    #[serde(default)]
    pub mem: MemStat,
    #[serde(default)]
    pub dsk: DiskStat,
}

impl TaskRecord {
    /// Leader record for a process.
    pub fn process(tgid: u32, name: impl Into<String>, nthr: usize) -> Self {
        Self {
            pid: tgid,
            tgid,
            name: name.into(),
            is_proc: true,
            nthr,
            cpu: CpuStat::default(),
            mem: MemStat::default(),
            dsk: DiskStat::default(),
        }
    }

    /// Thread record belonging to process `tgid`.
    pub fn thread(tgid: u32, pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            tgid,
            name: name.into(),
            is_proc: false,
            nthr: 0,
            cpu: CpuStat::default(),
            mem: MemStat::default(),
            dsk: DiskStat::default(),
        }
    }

    pub fn with_cpu(mut self, utime: u64, stime: u64) -> Self {
        self.cpu = CpuStat { utime, stime };
        self
    }

    pub fn with_mem(mut self, rmem: u64) -> Self {
        self.mem = MemStat { rmem };
        self
    }

    pub fn with_disk(mut self, rio: u64, wsz: u64, cwsz: u64) -> Self {
        self.dsk = DiskStat { rio, wsz, cwsz };
        self
    }

    pub fn cpu_total(&self) -> u64 {
        self.cpu.total()
    }

    pub fn effective_disk(&self) -> u64 {
        self.dsk.effective()
    }
}

/// Layout violations detected while building a snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("thread {pid} at index {index} has no leader for group {tgid} before it")]
    OrphanThread { index: usize, pid: u32, tgid: u32 },

    #[error("thread {pid} at index {index} of group {tgid} is not contiguous with its leader")]
    DetachedThread { index: usize, pid: u32, tgid: u32 },

    #[error("group {tgid} has a second leader record at index {index}")]
    DuplicateLeader { index: usize, tgid: u32 },
}

/// A process leader and the index range of its thread records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup {
    pub leader: usize,
    pub threads: Range<usize>,
}

impl TaskGroup {
    /// Index range covering the leader and all its threads.
    pub fn span(&self) -> Range<usize> {
        self.leader..self.threads.end
    }

    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }
}

/// Point-in-time capture of all task records for one monitoring cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    tasks: Vec<TaskRecord>,
    groups: Vec<TaskGroup>,
}

impl Snapshot {
    /// Builds a snapshot, checking that threads directly follow their leader.
    pub fn new(tasks: Vec<TaskRecord>) -> Result<Self, SnapshotError> {
        let groups = group_tasks(&tasks)?;
        Ok(Self { tasks, groups })
    }

    pub fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// All task records, in collection order.
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<TaskRecord> {
        self.tasks
    }

    /// Process groups in collection order.
    pub fn groups(&self) -> &[TaskGroup] {
        &self.groups
    }

    /// Leader records only, in collection order.
    pub fn processes(&self) -> impl Iterator<Item = &TaskRecord> + '_ {
        self.groups.iter().map(move |g| &self.tasks[g.leader])
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn process_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Assembles a snapshot group by group, so the layout holds by construction.
pub(crate) struct SnapshotBuilder {
    tasks: Vec<TaskRecord>,
    groups: Vec<TaskGroup>,
}

impl SnapshotBuilder {
    pub(crate) fn with_capacity(tasks: usize, groups: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(tasks),
            groups: Vec::with_capacity(groups),
        }
    }

    /// Appends a leader followed by the given threads.
    pub(crate) fn push_group<'a, I>(&mut self, leader: &TaskRecord, threads: I)
    where
        I: IntoIterator<Item = &'a TaskRecord>,
    {
        let leader_index = self.tasks.len();
        self.tasks.push(leader.clone());
        self.tasks.extend(threads.into_iter().cloned());
        self.groups.push(TaskGroup {
            leader: leader_index,
            threads: leader_index + 1..self.tasks.len(),
        });
    }

    pub(crate) fn finish(self) -> Snapshot {
        Snapshot {
            tasks: self.tasks,
            groups: self.groups,
        }
    }
}

/// Grouping pass over the flat task list.
fn group_tasks(tasks: &[TaskRecord]) -> Result<Vec<TaskGroup>, SnapshotError> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    let mut seen: HashSet<u32> = HashSet::new();

    for (index, task) in tasks.iter().enumerate() {
        if task.is_proc {
            if !seen.insert(task.tgid) {
                return Err(SnapshotError::DuplicateLeader {
                    index,
                    tgid: task.tgid,
                });
            }
            groups.push(TaskGroup {
                leader: index,
                threads: index + 1..index + 1,
            });
            continue;
        }

        match groups.last_mut() {
            Some(current) if tasks[current.leader].tgid == task.tgid => {
                current.threads.end = index + 1;
            }
            _ if seen.contains(&task.tgid) => {
                return Err(SnapshotError::DetachedThread {
                    index,
                    pid: task.pid,
                    tgid: task.tgid,
                });
            }
            _ => {
                return Err(SnapshotError::OrphanThread {
                    index,
                    pid: task.pid,
                    tgid: task.tgid,
                });
            }
        }
    }

    Ok(groups)
}
