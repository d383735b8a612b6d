//! Pre-built mock host scenarios for testing.
//!
//! These scenarios provide realistic `/proc`, `sensors` and `df` states
//! for testing various system conditions.

use super::commands::MockCommands;
use super::filesystem::MockFs;
use super::host::MockHostEnv;
use crate::collector::assembler::{DEFAULT_PROC_PATH, HostSnapshotAssembler};
use crate::collector::sensors::SENSORS_COMMAND;

const GIB: u64 = 1024 * 1024 * 1024;

/// A complete set of mocked sources for one host.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    pub fs: MockFs,
    pub commands: MockCommands,
    pub env: MockHostEnv,
}

impl MockHost {
    /// Creates a typical 4-core AMD desktop.
    ///
    /// Load `0.50 1.00 1.50`, 16 GB RAM half used, swap a quarter used,
    /// `Tctl` at 45.3°C, and `/` plus `/home` as the only reportable mounts.
    pub fn typical_system() -> Self {
        let mut fs = MockFs::new();

        fs.add_file("/proc/uptime", "12345.67 98765.43\n");
        fs.add_file("/proc/loadavg", "0.50 1.00 1.50 2/512 31337\n");
        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16000000 kB
MemFree:         2000000 kB
MemAvailable:    8000000 kB
Buffers:          512000 kB
Cached:          4096000 kB
SwapCached:            0 kB
SwapTotal:       4096000 kB
SwapFree:        3072000 kB
Dirty:              1024 kB
",
        );
        fs.add_file(
            "/proc/mounts",
            "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
udev /dev devtmpfs rw,nosuid,relatime,size=8103440k 0 0
tmpfs /run tmpfs rw,nosuid,nodev,noexec,relatime,size=1631580k 0 0
/dev/nvme0n1p2 / ext4 rw,relatime,errors=remount-ro 0 0
/dev/loop3 /snap/core22/1380 squashfs ro,nodev,relatime 0 0
/dev/nvme0n1p1 /boot/efi vfat rw,relatime,fmask=0077,dmask=0077 0 0
/dev/sda1 /home ext4 rw,relatime 0 0
",
        );

        let mut commands = MockCommands::new();
        commands.add_output(
            SENSORS_COMMAND,
            &[],
            "\
k10temp-pci-00c3
Adapter: PCI adapter
Tctl:         +45.3°C
Tccd1:        +43.5°C

amdgpu-pci-0b00
Adapter: PCI adapter
edge:         +39.0°C
",
        );
        commands.add_df("/dev/nvme0n1p2", "/", 500 * GIB, 200 * GIB);
        commands.add_df("/dev/nvme0n1p1", "/boot/efi", GIB / 2, GIB / 100);
        commands.add_df("tmpfs", "/run", 2 * GIB, GIB / 1000);
        commands.add_df("/dev/sda1", "/home", 2000 * GIB, 1500 * GIB);

        Self {
            fs,
            commands,
            env: MockHostEnv::new(),
        }
    }

    /// Creates a host where every file, command and hostname lookup fails.
    pub fn all_sources_failing() -> Self {
        Self {
            fs: MockFs::new(),
            commands: MockCommands::new(),
            env: MockHostEnv::new().without_hostname(),
        }
    }

    /// Creates a typical system under heavy load with no temperature sensors.
    pub fn high_cpu_load() -> Self {
        let mut host = Self::typical_system();
        host.fs
            .add_file("/proc/loadavg", "6.20 5.10 4.50 12/900 40000\n");
        host.commands.remove_output(SENSORS_COMMAND, &[]);
        host
    }

    /// Creates an assembler reading from this host's mocked sources.
    pub fn assembler(&self) -> HostSnapshotAssembler<MockFs, MockCommands, MockHostEnv> {
        HostSnapshotAssembler::new(
            self.fs.clone(),
            self.commands.clone(),
            self.env.clone(),
            DEFAULT_PROC_PATH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_cpu_load_scenario() {
        let snapshot = MockHost::high_cpu_load().assembler().assemble();

        assert!(snapshot.cpu.load_available);
        assert_eq!(snapshot.cpu.load1_pct, 100);
        assert_eq!(snapshot.cpu.load15_pct, 100);
        assert!(!snapshot.cpu.temp_available);
        assert_eq!(snapshot.cpu.temperature_c, 0);
    }
}
