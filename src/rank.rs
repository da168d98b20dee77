//! Process-level comparators used to rank leader records.

use crate::task::TaskRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Metric a process ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankAxis {
    /// Cumulative CPU ticks (user + system).
    Cpu,
    /// Resident memory size.
    Memory,
}

impl RankAxis {
    /// Value of this axis for a task.
    pub fn value(self, task: &TaskRecord) -> u64 {
        match self {
            RankAxis::Cpu => task.cpu_total(),
            RankAxis::Memory => task.mem.rmem,
        }
    }

    /// Descending comparison: the task with the larger value sorts first.
    pub fn compare(self, a: &TaskRecord, b: &TaskRecord) -> Ordering {
        self.value(b).cmp(&self.value(a))
    }
}

impl fmt::Display for RankAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankAxis::Cpu => write!(f, "cpu"),
            RankAxis::Memory => write!(f, "memory"),
        }
    }
}

/// Returns the group ids of the `n` highest-ranked leaders, sorted
/// ascending for binary-search membership tests.
///
/// Leaders tied with the n-th value are cut wherever the sort left them.
pub fn top_group_ids<'a, I>(leaders: I, axis: RankAxis, n: usize) -> Vec<u32>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let mut ranked: Vec<&TaskRecord> = leaders.into_iter().collect();
    ranked.sort_unstable_by(|a, b| axis.compare(a, b));

    let mut ids: Vec<u32> = ranked.iter().take(n).map(|t| t.tgid).collect();
    ids.sort_unstable();
    ids
}
