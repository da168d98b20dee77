//! Check command implementation.
//!
//! Validates configuration and the layout of a snapshot dump.

use herakles_task_filter::{load_dump, MetricMaxima};
use std::path::Path;

use crate::config::{validate_effective_config, Config};

/// Validates configuration and, if given, a snapshot dump.
pub fn command_check(input: Option<&Path>, config: &Config) -> anyhow::Result<()> {
    println!("🔍 Herakles Task Filter - Check");
    println!("==============================");

    let mut all_ok = true;

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
            let limits = config.limits();
            println!("   ├─ cpu top-N: {}", describe_limit(limits.cpu_top_n()));
            println!("   ├─ mem top-N: {}", describe_limit(limits.mem_top_n()));
            println!("   └─ thread max: {}", describe_limit(limits.thread_cap()));
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    if let Some(path) = input {
        println!("\n📁 Checking snapshot {}...", path.display());
        match load_dump(path) {
            Ok(snapshot) => {
                let maxima = MetricMaxima::from_tasks(snapshot.tasks());
                println!(
                    "   ✅ {} processes, {} tasks, layout valid",
                    snapshot.process_count(),
                    snapshot.task_count()
                );
                println!(
                    "   └─ maxima: cpu={} ticks, mem={} KB, disk={}",
                    maxima.cpu, maxima.mem, maxima.dsk
                );

                let limits = config.limits();
                for (label, limit) in [("cpu", limits.cpu_top_n()), ("mem", limits.mem_top_n())] {
                    if let Some(n) = limit.filter(|&n| n > snapshot.process_count()) {
                        println!(
                            "   ⚠️  {} top-N {} exceeds process count, process filter will be skipped",
                            label, n
                        );
                    }
                }
            }
            Err(e) => {
                println!("   ❌ {}", e);
                all_ok = false;
            }
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}

fn describe_limit(limit: Option<usize>) -> String {
    limit.map_or_else(|| "disabled".to_string(), |n| n.to_string())
}
