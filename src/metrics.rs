//! Maximum observed values of the ranking metrics.
//!
//! The maxima normalize CPU ticks, resident KiB and disk volume onto a
//! common [0, 1] scale before thread scores are summed.

use crate::task::TaskRecord;

/// Maximum CPU, memory and effective disk values over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricMaxima {
    pub cpu: u64,
    pub mem: u64,
    pub dsk: u64,
}

impl MetricMaxima {
    /// Computes each maximum independently; all zero for an empty slice.
    pub fn from_tasks(tasks: &[TaskRecord]) -> Self {
        tasks.iter().fold(Self::default(), |acc, task| Self {
            cpu: acc.cpu.max(task.cpu_total()),
            mem: acc.mem.max(task.mem.rmem),
            dsk: acc.dsk.max(task.effective_disk()),
        })
    }

    /// True when no metric can contribute to a score.
    pub fn is_zero(&self) -> bool {
        self.cpu == 0 && self.mem == 0 && self.dsk == 0
    }

    /// Normalized score of a task: the sum of `value / max` over every
    /// metric whose maximum is nonzero.
    pub fn score(&self, task: &TaskRecord) -> f64 {
        let mut sum = 0.0;
        if self.mem != 0 {
            sum += task.mem.rmem as f64 / self.mem as f64;
        }
        if self.cpu != 0 {
            sum += task.cpu_total() as f64 / self.cpu as f64;
        }
        if self.dsk != 0 {
            sum += task.effective_disk() as f64 / self.dsk as f64;
        }
        sum
    }
}
