//! Tunable limits for the filter stages.

use serde::{Deserialize, Serialize};

/// The three independent filter limits.
///
/// `None` and `Some(0)` both mean the axis is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterLimits {
    /// Keep the N processes with the highest cumulative CPU time.
    pub cpu_top_n: Option<usize>,
    /// Keep the N processes with the highest resident memory.
    pub mem_top_n: Option<usize>,
    /// Keep at most K threads of any process with more than K threads.
    pub thread_cap: Option<usize>,
}

impl FilterLimits {
    pub fn new(cpu_top_n: Option<usize>, mem_top_n: Option<usize>, thread_cap: Option<usize>) -> Self {
        Self {
            cpu_top_n,
            mem_top_n,
            thread_cap,
        }
    }

    /// No filtering at all.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn cpu_top_n(&self) -> Option<usize> {
        positive(self.cpu_top_n)
    }

    pub fn mem_top_n(&self) -> Option<usize> {
        positive(self.mem_top_n)
    }

    pub fn thread_cap(&self) -> Option<usize> {
        positive(self.thread_cap)
    }

    pub fn is_unset(&self) -> bool {
        self.cpu_top_n().is_none() && self.mem_top_n().is_none() && self.thread_cap().is_none()
    }
}

fn positive(limit: Option<usize>) -> Option<usize> {
    limit.filter(|&n| n > 0)
}
