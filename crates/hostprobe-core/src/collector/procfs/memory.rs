//! Memory collector: physical memory and swap usage from `/proc/meminfo`.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::parse_key_values;
use crate::collector::traits::FileSystem;
use crate::model::{MemoryMetrics, percent_of};

const KB_PER_MB: u64 = 1024;

/// Collects memory and swap usage.
///
/// Unlike CPU metrics there is no partial degradation: if `/proc/meminfo`
/// cannot be used, memory and swap are both reported unavailable.
pub struct MemoryCollector<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> MemoryCollector<F> {
    /// Creates a new memory collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Reads `/proc/meminfo` into a key -> kB map.
    pub fn collect_meminfo(&self) -> Result<HashMap<String, u64>, CollectError> {
        let path = format!("{}/meminfo", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;
        Ok(parse_key_values(&content))
    }

    /// Collects memory metrics. Never fails.
    pub fn collect(&self) -> MemoryMetrics {
        match self
            .collect_meminfo()
            .and_then(|values| memory_metrics(&values))
        {
            Ok(metrics) => metrics,
            Err(e) => {
                warn!(error = %e, "memory metrics unavailable");
                MemoryMetrics::default()
            }
        }
    }
}

/// Derives usage metrics from parsed `/proc/meminfo` values (kB).
///
/// A missing or zero `MemTotal` makes the whole metric unavailable. Missing
/// `MemAvailable`, `SwapTotal` or `SwapFree` read as zero.
pub fn memory_metrics(values: &HashMap<String, u64>) -> Result<MemoryMetrics, CollectError> {
    let kb = |key: &str| values.get(key).copied().unwrap_or(0);

    let total_mb = kb("MemTotal") / KB_PER_MB;
    if total_mb == 0 {
        return Err(CollectError::Parse("MemTotal missing or zero".to_string()));
    }
    let available_mb = kb("MemAvailable") / KB_PER_MB;
    let used_mb = total_mb.saturating_sub(available_mb);

    let swap_total_mb = kb("SwapTotal") / KB_PER_MB;
    let swap_free_mb = kb("SwapFree") / KB_PER_MB;
    let swap_used_mb = swap_total_mb.saturating_sub(swap_free_mb);

    Ok(MemoryMetrics {
        available: true,
        total_mb,
        used_mb,
        used_pct: percent_of(used_mb, total_mb),
        swap_available: true,
        swap_total_mb,
        swap_used_mb,
        swap_used_pct: percent_of(swap_used_mb, swap_total_mb),
    })
}
