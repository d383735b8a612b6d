//! Snapshot assembler that combines all collectors.
//!
//! `HostSnapshotAssembler` runs one pass over every source and packages the
//! results into a `HostSnapshot`. Each collector degrades on its own; no
//! failure aborts the pass.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, warn};

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::parse_uptime;
use crate::collector::procfs::{CpuCollector, MemoryCollector, MountCollector};
use crate::collector::traits::{CommandRunner, FileSystem, HostEnv};
use crate::model::HostSnapshot;

/// Default path of the proc filesystem.
pub const DEFAULT_PROC_PATH: &str = "/proc";

/// Builds a fresh `HostSnapshot` per call.
///
/// Holds no per-request state, so a single assembler can be shared across
/// concurrent requests.
pub struct HostSnapshotAssembler<F, C, H>
where
    F: FileSystem + Clone,
    C: CommandRunner + Clone,
    H: HostEnv,
{
    fs: F,
    env: H,
    proc_path: String,
    cpu: CpuCollector<F, C>,
    memory: MemoryCollector<F>,
    mounts: MountCollector<F, C>,
}

impl<F, C, H> HostSnapshotAssembler<F, C, H>
where
    F: FileSystem + Clone,
    C: CommandRunner + Clone,
    H: HostEnv,
{
    /// Creates a new assembler.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `commands` - Command runner for `sensors` and `df`
    /// * `env` - Host identity and clock
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    ///
    /// The logical core count used to normalize load is read from `env` once,
    /// here.
    pub fn new(fs: F, commands: C, env: H, proc_path: impl Into<String>) -> Self {
        let proc_path = proc_path.into();
        let cores = env.cpu_count();

        Self {
            cpu: CpuCollector::new(fs.clone(), commands.clone(), &proc_path, cores),
            memory: MemoryCollector::new(fs.clone(), &proc_path),
            mounts: MountCollector::new(fs.clone(), commands, &proc_path),
            fs,
            env,
            proc_path,
        }
    }

    /// Reads seconds since boot from `/proc/uptime`.
    pub fn collect_uptime(&self) -> Result<f64, CollectError> {
        let path = format!("{}/uptime", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;
        Ok(parse_uptime(&content)?)
    }

    /// Boot time as `now - uptime`, or `now` when uptime is unavailable.
    fn boot_time(&self, now: i64) -> i64 {
        match self.collect_uptime() {
            Ok(uptime) => now - uptime as i64,
            Err(e) => {
                warn!(error = %e, "uptime unavailable, reporting current time as boot time");
                now
            }
        }
    }

    fn hostname(&self) -> String {
        self.env.hostname().unwrap_or_else(|e| {
            warn!(error = %e, "could not resolve hostname");
            String::new()
        })
    }

    /// Runs one collection pass. Never fails.
    pub fn assemble(&self) -> HostSnapshot {
        let started = Instant::now();
        let now = self.env.now_unix();

        let snapshot = HostSnapshot {
            available: true,
            boot_time: self.boot_time(now),
            hostname: self.hostname(),
            platform: self.env.platform(),
            cpu: self.cpu.collect(),
            memory: self.memory.collect(),
            mountpoints: self.mounts.collect(),
        };

        debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            mountpoints = snapshot.mountpoints.len(),
            load_available = snapshot.cpu.load_available,
            temp_available = snapshot.cpu.temp_available,
            memory_available = snapshot.memory.available,
            "snapshot assembled"
        );

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockHost, MockHostEnv};
    use crate::collector::sensors::SENSORS_COMMAND;
    use crate::model::{CpuMetrics, MemoryMetrics};

    #[test]
    fn test_assemble_typical_system() {
        let snapshot = MockHost::typical_system().assembler().assemble();

        assert!(snapshot.available);
        assert_eq!(snapshot.boot_time, 1_700_000_000 - 12345);
        assert_eq!(snapshot.hostname, "testhost");
        assert_eq!(snapshot.platform, "linux");

        assert_eq!(
            snapshot.cpu,
            CpuMetrics {
                load_available: true,
                load1_pct: 12,
                load15_pct: 37,
                temp_available: true,
                temperature_c: 45,
            }
        );

        assert!(snapshot.memory.available);
        assert_eq!(snapshot.memory.total_mb, 15625);
        assert_eq!(snapshot.memory.used_pct, 50);
        assert_eq!(snapshot.memory.swap_total_mb, 4000);
        assert_eq!(snapshot.memory.swap_used_mb, 1000);
        assert_eq!(snapshot.memory.swap_used_pct, 25);

        let paths: Vec<&str> = snapshot.mountpoints.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/home"]);
        assert_eq!(snapshot.mountpoints[0].used_pct, 40);
    }

    #[test]
    fn test_assemble_all_sources_failing() {
        let snapshot = MockHost::all_sources_failing().assembler().assemble();

        assert!(snapshot.available);
        assert_eq!(snapshot.boot_time, 1_700_000_000);
        assert_eq!(snapshot.hostname, "");
        assert_eq!(snapshot.cpu, CpuMetrics::default());
        assert_eq!(snapshot.memory, MemoryMetrics::default());
        assert!(snapshot.mountpoints.is_empty());
    }

    #[test]
    fn test_assemble_collectors_fail_independently() {
        let mut host = MockHost::typical_system();
        host.fs.remove_file("/proc/meminfo");
        host.commands.remove_output(SENSORS_COMMAND, &[]);

        let snapshot = host.assembler().assemble();

        assert!(snapshot.cpu.load_available);
        assert!(!snapshot.cpu.temp_available);
        assert_eq!(snapshot.memory, MemoryMetrics::default());
        assert_eq!(snapshot.mountpoints.len(), 2);
        assert_eq!(snapshot.hostname, "testhost");
    }

    #[test]
    fn test_assemble_malformed_uptime_falls_back_to_now() {
        let mut host = MockHost::typical_system();
        host.fs.add_file("/proc/uptime", "not-a-number\n");

        let snapshot = host.assembler().assemble();
        assert_eq!(snapshot.boot_time, 1_700_000_000);
    }

    #[test]
    fn test_assemble_uses_env_core_count() {
        let mut host = MockHost::typical_system();
        host.env = MockHostEnv::new().with_cpu_count(1);

        let snapshot = host.assembler().assemble();
        assert_eq!(snapshot.cpu.load1_pct, 50);
        assert_eq!(snapshot.cpu.load15_pct, 100);
    }

    #[test]
    fn test_assemble_is_fresh_per_call() {
        let host = MockHost::typical_system();
        let assembler = host.assembler();

        let first = assembler.assemble();
        let second = assembler.assemble();
        assert_eq!(first, second);
    }

    #[test]
    fn test_assemble_serializes_to_expected_json() {
        let snapshot = MockHost::typical_system().assembler().assemble();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["available"], true);
        assert_eq!(json["cpu"]["load1_pct"], 12);
        assert_eq!(json["cpu"]["temperature_c"], 45);
        assert_eq!(json["memory"]["total_mb"], 15625);
        assert_eq!(json["mountpoints"][1]["name"], "/home");
    }
}
