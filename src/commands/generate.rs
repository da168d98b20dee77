//! Generate command implementation.
//!
//! Generates synthetic snapshot dumps for exercising the filter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::debug;

use herakles_task_filter::{save_dump, Snapshot, TaskRecord};

// Constants for synthetic value ranges
const MAX_CPU_TICKS: u64 = 1_000_000; // ~2.7 hours at 100 Hz
const MAX_RMEM_KB: u64 = 4 * 1024 * 1024; // 4 GB
const MAX_READ_OPS: u64 = 100_000;
const MAX_WRITE_SIZE: u64 = 10 * 1024 * 1024;

const NAMES: [&str; 10] = [
    "postgres", "nginx", "java", "sshd", "systemd", "node", "python3", "redis-server", "containerd",
    "chrome",
];

/// Generates a synthetic snapshot and writes it as a dump.
pub fn command_generate(
    output: &Path,
    processes: usize,
    max_threads: usize,
    seed: Option<u64>,
    pretty: bool,
) -> anyhow::Result<()> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let snapshot = generate_snapshot(&mut rng, processes, max_threads)?;
    save_dump(output, &snapshot, pretty)?;

    if output.as_os_str() != "-" {
        println!(
            "✅ Generated snapshot: {} processes, {} tasks in {}",
            snapshot.process_count(),
            snapshot.task_count(),
            output.display()
        );
    }
    Ok(())
}

/// Builds a snapshot with leaders followed by their threads.
pub fn generate_snapshot(
    rng: &mut impl Rng,
    processes: usize,
    max_threads: usize,
) -> anyhow::Result<Snapshot> {
    let mut tasks = Vec::new();
    let mut next_pid: u32 = 1000;

    for i in 0..processes {
        let tgid = next_pid;
        let name = NAMES[i % NAMES.len()];
        let nthr = rng.gen_range(1..=max_threads.max(1));

        let mut threads = Vec::with_capacity(nthr);
        for t in 0..nthr {
            let thread = TaskRecord::thread(tgid, tgid + t as u32, name);
            threads.push(random_counters(&mut *rng, thread));
        }

        // Leader counters are the sum of its threads
        let mut leader = TaskRecord::process(tgid, name, nthr);
        for t in &threads {
            leader.cpu.utime += t.cpu.utime;
            leader.cpu.stime += t.cpu.stime;
            leader.mem.rmem = leader.mem.rmem.max(t.mem.rmem);
            leader.dsk.rio += t.dsk.rio;
            leader.dsk.wsz += t.dsk.wsz;
            leader.dsk.cwsz += t.dsk.cwsz;
        }

        tasks.push(leader);
        tasks.extend(threads);
        next_pid += nthr as u32 + 1;
    }

    debug!("Generated {} tasks for {} processes", tasks.len(), processes);
    Ok(Snapshot::new(tasks)?)
}

/// Fills a record with random counters. Most tasks are idle.
fn random_counters(rng: &mut impl Rng, task: TaskRecord) -> TaskRecord {
    let busy = rng.gen_bool(0.2);
    let scale = if busy { 1 } else { 100 };

    let utime = rng.gen_range(0..MAX_CPU_TICKS / scale);
    let stime = rng.gen_range(0..MAX_CPU_TICKS / scale / 4);
    let rmem = rng.gen_range(1024..MAX_RMEM_KB / scale);
    let rio = rng.gen_range(0..MAX_READ_OPS / scale);
    let wsz = rng.gen_range(0..MAX_WRITE_SIZE / scale);
    let cwsz = rng.gen_range(0..=wsz / 2);

    task.with_cpu(utime, stime)
        .with_mem(rmem)
        .with_disk(rio, wsz, cwsz)
}
