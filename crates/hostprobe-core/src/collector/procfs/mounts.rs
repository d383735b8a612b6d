//! Filesystem collector: mounted filesystems from `/proc/mounts` with usage from `df`.

use std::path::Path;

use tracing::{debug, warn};

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{DiskUsage, MountEntry, parse_df_output, parse_mounts};
use crate::collector::traits::{CommandRunner, FileSystem};
use crate::model::{MountMetrics, percent_of};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Mountpoint prefixes that are never reported.
const EXCLUDED_MOUNTPOINT_PREFIXES: &[&str] = &["/snap", "/boot/efi"];

/// Device prefixes that are never reported.
const EXCLUDED_DEVICE_PREFIXES: &[&str] = &["/dev/loop"];

/// Pseudo filesystem types that are never reported.
const EXCLUDED_FSTYPES: &[&str] = &["tmpfs", "devtmpfs", "proc", "sysfs"];

/// Command used to query per-mountpoint usage in exact bytes.
pub const DF_COMMAND: &str = "df";

/// Collects usage for every relevant mounted filesystem.
pub struct MountCollector<F: FileSystem, C: CommandRunner> {
    fs: F,
    commands: C,
    proc_path: String,
}

impl<F: FileSystem, C: CommandRunner> MountCollector<F, C> {
    /// Creates a new mount collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `commands` - Command runner used for `df`
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, commands: C, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            commands,
            proc_path: proc_path.into(),
        }
    }

    /// Reads `/proc/mounts` and returns the entries worth reporting.
    pub fn collect_mounts(&self) -> Result<Vec<MountEntry>, CollectError> {
        let path = format!("{}/mounts", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;
        Ok(filter_mounts(parse_mounts(&content)))
    }

    /// Queries used/total bytes for one mountpoint with `df -B1 -P`.
    pub fn query_usage(&self, mountpoint: &str) -> Result<DiskUsage, CollectError> {
        let output = self
            .commands
            .run(DF_COMMAND, &["-B1", "-P", mountpoint])
            .map_err(|e| CollectError::command(DF_COMMAND, e))?;
        Ok(parse_df_output(&output)?)
    }

    /// Collects usage for all relevant mountpoints, in mount-table order.
    ///
    /// Never fails: an unreadable mount table yields an empty list, and a
    /// mountpoint whose usage query fails is left out.
    pub fn collect(&self) -> Vec<MountMetrics> {
        let mounts = match self.collect_mounts() {
            Ok(mounts) => mounts,
            Err(e) => {
                warn!(error = %e, "mount table unavailable");
                return Vec::new();
            }
        };

        mounts
            .into_iter()
            .filter_map(|mount| match self.query_usage(&mount.mountpoint) {
                Ok(usage) => Some(mount_metrics(mount.mountpoint, usage)),
                Err(e) => {
                    debug!(mountpoint = %mount.mountpoint, error = %e, "skipping mountpoint");
                    None
                }
            })
            .collect()
    }
}

/// True when a mount entry should be reported.
pub fn is_relevant_mount(mount: &MountEntry) -> bool {
    !EXCLUDED_MOUNTPOINT_PREFIXES
        .iter()
        .any(|prefix| mount.mountpoint.starts_with(prefix))
        && !EXCLUDED_DEVICE_PREFIXES
            .iter()
            .any(|prefix| mount.device.starts_with(prefix))
        && !EXCLUDED_FSTYPES.contains(&mount.fstype.as_str())
}

/// Drops pseudo filesystems, snap/loop mounts and the EFI partition.
///
/// Order is preserved and filtering an already filtered list is a no-op.
pub fn filter_mounts(mounts: Vec<MountEntry>) -> Vec<MountEntry> {
    mounts.into_iter().filter(is_relevant_mount).collect()
}

fn mount_metrics(mountpoint: String, usage: DiskUsage) -> MountMetrics {
    MountMetrics {
        name: mountpoint.clone(),
        path: mountpoint,
        total_mb: usage.total_bytes / BYTES_PER_MB,
        used_mb: usage.used_bytes / BYTES_PER_MB,
        used_pct: percent_of(usage.used_bytes, usage.total_bytes),
    }
}
