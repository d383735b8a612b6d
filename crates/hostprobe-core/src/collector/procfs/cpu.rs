//! CPU collector: load average from `/proc/loadavg` and temperature from `sensors`.

use std::path::Path;

use tracing::warn;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{LoadAvg, parse_loadavg};
use crate::collector::sensors::read_temperature;
use crate::collector::traits::{CommandRunner, FileSystem};
use crate::model::CpuMetrics;

/// Collects CPU load and temperature.
///
/// Load and temperature degrade independently: either can be unavailable
/// while the other is reported.
pub struct CpuCollector<F: FileSystem, C: CommandRunner> {
    fs: F,
    commands: C,
    proc_path: String,
    cores: usize,
}

impl<F: FileSystem, C: CommandRunner> CpuCollector<F, C> {
    /// Creates a new CPU collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `commands` - Command runner used for `sensors`
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    /// * `cores` - Logical CPU count used to normalize load; 0 is treated as 1
    pub fn new(fs: F, commands: C, proc_path: impl Into<String>, cores: usize) -> Self {
        Self {
            fs,
            commands,
            proc_path: proc_path.into(),
            cores: cores.max(1),
        }
    }

    /// Reads and parses `/proc/loadavg`.
    pub fn collect_loadavg(&self) -> Result<LoadAvg, CollectError> {
        let path = format!("{}/loadavg", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;
        Ok(parse_loadavg(&content)?)
    }

    /// Collects CPU metrics. Never fails.
    pub fn collect(&self) -> CpuMetrics {
        let mut metrics = CpuMetrics::default();

        match self.collect_loadavg() {
            Ok(load) => {
                metrics.load_available = true;
                metrics.load1_pct = load_percent(load.load1, self.cores);
                metrics.load15_pct = load_percent(load.load15, self.cores);
            }
            Err(e) => warn!(error = %e, "load average unavailable"),
        }

        match read_temperature(&self.commands) {
            Ok(temp) => {
                metrics.temp_available = true;
                metrics.temperature_c = temp;
            }
            Err(e) => warn!(error = %e, "cpu temperature unavailable"),
        }

        metrics
    }
}

/// Load average as a percentage of `cores`, truncated and capped at 100.
///
/// The kernel reports load with two decimals, so the value is rounded to
/// hundredths before the integer division.
pub fn load_percent(load: f64, cores: usize) -> u8 {
    if !load.is_finite() || load <= 0.0 {
        return 0;
    }
    let hundredths = (load * 100.0).round() as u64;
    (hundredths / cores.max(1) as u64).min(100) as u8
}
