//! Integration tests for snapshot dump files.

use herakles_task_filter::{
    filter_snapshot, load_dump, save_dump, DumpError, FilterLimits, Snapshot, SnapshotDump,
    TaskRecord,
};
use std::fs;
use tempfile::tempdir;

fn sample_snapshot() -> Snapshot {
    Snapshot::new(vec![
        TaskRecord::process(1200, "java", 3)
            .with_cpu(4_000, 800)
            .with_mem(2_097_152)
            .with_disk(120, 40_960, 4_096),
        TaskRecord::thread(1200, 1200, "java").with_cpu(3_000, 500),
        TaskRecord::thread(1200, 1201, "java").with_cpu(900, 250).with_disk(100, 40_960, 0),
        TaskRecord::thread(1200, 1202, "java").with_cpu(100, 50),
        TaskRecord::process(77, "sshd", 1).with_cpu(12, 3).with_mem(8_192),
        TaskRecord::thread(77, 77, "sshd").with_cpu(12, 3),
    ])
    .expect("valid layout")
}

#[test]
fn test_saved_dump_loads_back() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("snapshot.json");

    let snapshot = sample_snapshot();
    save_dump(&path, &snapshot, true).expect("dump written");

    let loaded = load_dump(&path).expect("dump loads");
    assert_eq!(loaded, snapshot);
}

#[test]
fn test_filtered_dump_on_disk() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("filtered.json");

    let snapshot = sample_snapshot();
    let filtered = filter_snapshot(&snapshot, &FilterLimits::new(Some(1), None, Some(1)));
    save_dump(&path, &filtered.snapshot, false).expect("dump written");

    let content = fs::read_to_string(&path).expect("readable");
    let dump: SnapshotDump = serde_json::from_str(&content).expect("valid json");
    assert_eq!(dump.version, "1.0");
    let pids: Vec<u32> = dump.tasks.iter().map(|t| t.pid).collect();
    // java leader plus its top-scoring thread (disk volume outweighs cpu)
    assert_eq!(pids, vec![1200, 1201]);
}

#[test]
fn test_missing_dump_reports_not_found() {
    let dir = tempdir().expect("Failed to create temp dir");
    let err = load_dump(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, DumpError::NotFound(_)));
}

#[test]
fn test_dump_with_detached_thread_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{"version": "1.0", "generated_at": "2026-10-18T00:00:00Z", "tasks": [
            {"pid": 1, "tgid": 1, "is_proc": true, "nthr": 1},
            {"pid": 2, "tgid": 2, "is_proc": true, "nthr": 0},
            {"pid": 3, "tgid": 1, "is_proc": false}
        ]}"#,
    )
    .expect("Failed to write dump");

    let err = load_dump(&path).unwrap_err();
    assert!(matches!(err, DumpError::Layout(_)));
    assert!(err.to_string().contains("not contiguous"));
}
