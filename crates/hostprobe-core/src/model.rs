//! Host metrics returned by a single assembly pass.
//!
//! Every struct here is built fresh per request and serialized as-is by the
//! HTTP layer, so field names are part of the wire format. Whenever an
//! `*_available` flag is `false`, its companion numeric fields are zero.

use serde::{Deserialize, Serialize};

/// One complete, immutable set of host metrics.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct HostSnapshot {
    /// Always `true` for an assembled snapshot; `false` only for the
    /// placeholder returned when assembly could not run at all.
    pub available: bool,

    /// System boot time, seconds since epoch.
    /// Source: current time minus `/proc/uptime`
    pub boot_time: i64,

    /// Host name, empty when the lookup failed.
    pub hostname: String,

    /// Target OS identifier (`linux`, `macos`, ...).
    pub platform: String,

    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,

    /// Mounted filesystems in mount-table order.
    pub mountpoints: Vec<MountMetrics>,
}

/// CPU load and temperature.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct CpuMetrics {
    /// Whether `/proc/loadavg` was read and parsed.
    pub load_available: bool,

    /// 1-minute load average per logical core, percent, capped at 100.
    pub load1_pct: u8,

    /// 15-minute load average per logical core, percent, capped at 100.
    pub load15_pct: u8,

    /// Whether a CPU temperature was found in `sensors` output.
    pub temp_available: bool,

    /// CPU temperature in whole degrees Celsius (fraction truncated).
    pub temperature_c: i32,
}

/// Physical memory and swap usage.
///
/// Source: `/proc/meminfo`, kB values divided by 1024.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MemoryMetrics {
    pub available: bool,
    pub total_mb: u64,
    pub used_mb: u64,
    pub used_pct: u8,
    pub swap_available: bool,
    pub swap_total_mb: u64,
    pub swap_used_mb: u64,
    pub swap_used_pct: u8,
}

/// Usage of one mounted filesystem.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MountMetrics {
    /// Mountpoint path.
    pub path: String,
    /// Display name; currently the mountpoint path.
    pub name: String,
    pub total_mb: u64,
    pub used_mb: u64,
    pub used_pct: u8,
}

impl HostSnapshot {
    /// Snapshot with every availability flag cleared and all fields zeroed.
    ///
    /// Used by the HTTP layer when the assembly task itself could not run.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Integer percentage `part / whole * 100`, truncated and capped at 100.
///
/// Returns 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as u128 * 100 / whole as u128).min(100) as u8
}
