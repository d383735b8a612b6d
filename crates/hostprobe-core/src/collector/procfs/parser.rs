//! Parsers for `/proc` files and `df` output.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.

use std::collections::HashMap;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses `key: value [unit]` lines into a key -> value map.
///
/// The key is the first whitespace-separated field with a trailing `:`
/// stripped; the value is the second field parsed as an integer. Lines with
/// fewer than two fields or a non-numeric value are skipped. Used for
/// `/proc/meminfo`, where values are in kB.
pub fn parse_key_values(content: &str) -> HashMap<String, u64> {
    let mut values = HashMap::new();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let key = key.strip_suffix(':').unwrap_or(key);
        if let Ok(value) = value.parse() {
            values.insert(key.to_string(), value);
        }
    }

    values
}

/// One entry from `/proc/mounts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
}

/// Parses `/proc/mounts` content.
///
/// Format: device mountpoint fstype options dump pass. Only the first three
/// fields are kept; lines with fewer than three fields are skipped. Octal
/// escapes the kernel uses for whitespace in paths (`\040`) are decoded.
pub fn parse_mounts(content: &str) -> Vec<MountEntry> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let device = parts.next()?;
            let mountpoint = parts.next()?;
            let fstype = parts.next()?;
            Some(MountEntry {
                device: unescape_octal(device),
                mountpoint: unescape_octal(mountpoint),
                fstype: fstype.to_string(),
            })
        })
        .collect()
}

/// Decodes `\NNN` octal escapes as written by the kernel in mount tables.
///
/// Malformed escapes are kept verbatim.
fn unescape_octal(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\'
            && i + 3 < bytes.len()
            && bytes[i + 1..=i + 3].iter().all(|b| (b'0'..=b'7').contains(b))
        {
            let code = (bytes[i + 1] - b'0') as u16 * 64
                + (bytes[i + 2] - b'0') as u16 * 8
                + (bytes[i + 3] - b'0') as u16;
            if let Ok(byte) = u8::try_from(code) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Parsed data from `/proc/loadavg`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadAvg {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
}

/// Parses `/proc/loadavg` content.
///
/// Only the three load averages are required; the trailing
/// `running/total last_pid` fields are ignored.
pub fn parse_loadavg(content: &str) -> Result<LoadAvg, ParseError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError::new("invalid loadavg format"));
    }

    let parse_load = |idx: usize, name: &str| -> Result<f64, ParseError> {
        let value: f64 = parts[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("invalid {}", name)))?;
        if !value.is_finite() || value < 0.0 {
            return Err(ParseError::new(format!("{} out of range", name)));
        }
        Ok(value)
    };

    Ok(LoadAvg {
        load1: parse_load(0, "load1")?,
        load5: parse_load(1, "load5")?,
        load15: parse_load(2, "load15")?,
    })
}

/// Parses `/proc/uptime` content and returns seconds since boot.
///
/// Format: uptime_seconds idle_seconds
pub fn parse_uptime(content: &str) -> Result<f64, ParseError> {
    let first = content
        .split_whitespace()
        .next()
        .ok_or_else(|| ParseError::new("empty uptime"))?;
    let uptime: f64 = first
        .parse()
        .map_err(|_| ParseError::new("invalid uptime"))?;
    if !uptime.is_finite() || uptime < 0.0 {
        return Err(ParseError::new("uptime out of range"));
    }
    Ok(uptime)
}

/// Byte counts reported by `df -B1 -P` for one filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

/// Parses `df -B1 -P <path>` output.
///
/// The first line is a header; the second holds
/// `filesystem total used available capacity mountpoint`. Both the
/// filesystem and the mountpoint may contain spaces, so the numeric columns
/// are located relative to the capacity column (`NN%`, or `-` when unknown).
pub fn parse_df_output(content: &str) -> Result<DiskUsage, ParseError> {
    let line = content
        .lines()
        .nth(1)
        .ok_or_else(|| ParseError::new("invalid df output"))?;
    let parts: Vec<&str> = line.split_whitespace().collect();

    let capacity = (4..parts.len())
        .find(|&i| {
            is_df_capacity(parts[i]) && parts[i - 3..i].iter().all(|p| p.parse::<u64>().is_ok())
        })
        .ok_or_else(|| ParseError::new("invalid df output format"))?;

    let total_bytes = parts[capacity - 3]
        .parse()
        .map_err(|_| ParseError::new("invalid df total"))?;
    let used_bytes = parts[capacity - 2]
        .parse()
        .map_err(|_| ParseError::new("invalid df used"))?;

    Ok(DiskUsage {
        total_bytes,
        used_bytes,
    })
}

fn is_df_capacity(field: &str) -> bool {
    field == "-"
        || field
            .strip_suffix('%')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_values_meminfo() {
        let content = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
HugePages_Total:       0
";
        let values = parse_key_values(content);

        assert_eq!(values["MemTotal"], 16384000);
        assert_eq!(values["MemAvailable"], 12000000);
        assert_eq!(values["SwapFree"], 4096000);
        assert_eq!(values["HugePages_Total"], 0);
        assert_eq!(values.len(), 6);
    }

    #[test]
    fn test_parse_key_values_skips_garbage() {
        let content = "\
MemTotal: 1000 kB

justonefield
MemFree: lots kB
   Cached:   200 kB
";
        let values = parse_key_values(content);

        assert_eq!(values.len(), 2);
        assert_eq!(values["MemTotal"], 1000);
        assert_eq!(values["Cached"], 200);
        assert!(!values.contains_key("MemFree"));
    }

    #[test]
    fn test_parse_mounts() {
        let content = "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
/dev/nvme0n1p1 /boot/efi vfat rw,relatime 0 0
short line
";
        let mounts = parse_mounts(content);

        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts[0].fstype, "sysfs");
        assert_eq!(
            mounts[1],
            MountEntry {
                device: "/dev/nvme0n1p2".into(),
                mountpoint: "/".into(),
                fstype: "ext4".into(),
            }
        );
        assert_eq!(mounts[2].mountpoint, "/boot/efi");
    }

    #[test]
    fn test_parse_mounts_three_fields_is_enough() {
        let mounts = parse_mounts("/dev/sda1 /data xfs\n");
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].fstype, "xfs");
    }

    #[test]
    fn test_parse_mounts_decodes_octal_escapes() {
        let content = "/dev/sdb1 /media/My\\040Disk ext4 rw 0 0\n";
        let mounts = parse_mounts(content);

        assert_eq!(mounts[0].mountpoint, "/media/My Disk");
    }

    #[test]
    fn test_unescape_octal_keeps_malformed() {
        assert_eq!(unescape_octal("a\\04"), "a\\04");
        assert_eq!(unescape_octal("a\\0x9b"), "a\\0x9b");
        assert_eq!(unescape_octal("back\\134slash"), "back\\slash");
        assert_eq!(unescape_octal("plain"), "plain");
    }

    #[test]
    fn test_parse_loadavg() {
        let content = "0.15 0.10 0.05 1/150 1234\n";
        let load = parse_loadavg(content).unwrap();

        assert!((load.load1 - 0.15).abs() < 0.001);
        assert!((load.load5 - 0.10).abs() < 0.001);
        assert!((load.load15 - 0.05).abs() < 0.001);
    }

    #[test]
    fn test_parse_loadavg_three_fields() {
        let load = parse_loadavg("0.50 1.00 1.50").unwrap();
        assert!((load.load15 - 1.50).abs() < 0.001);
    }

    #[test]
    fn test_parse_loadavg_invalid() {
        assert!(parse_loadavg("").is_err());
        assert!(parse_loadavg("0.5 1.0").is_err());
        assert!(parse_loadavg("abc 1.0 1.0").is_err());
        assert!(parse_loadavg("-1.0 1.0 1.0").is_err());
        assert!(parse_loadavg("NaN 1.0 1.0").is_err());
    }

    #[test]
    fn test_parse_uptime() {
        let uptime = parse_uptime("12345.67 98765.43\n").unwrap();
        assert!((uptime - 12345.67).abs() < 0.001);
    }

    #[test]
    fn test_parse_uptime_invalid() {
        assert!(parse_uptime("").is_err());
        assert!(parse_uptime("soon 1.0").is_err());
    }

    #[test]
    fn test_parse_df_output() {
        let content = "\
Filesystem        1-blocks         Used    Available Capacity Mounted on
/dev/nvme0n1p2 502392610816 210453397504 266308497408      45% /
";
        let usage = parse_df_output(content).unwrap();

        assert_eq!(usage.total_bytes, 502392610816);
        assert_eq!(usage.used_bytes, 210453397504);
    }

    #[test]
    fn test_parse_df_output_invalid() {
        assert!(parse_df_output("").is_err());
        assert!(parse_df_output("Filesystem 1-blocks Used\n").is_err());
        assert!(parse_df_output("header\n/dev/sda1 10 20\n").is_err());
        assert!(parse_df_output("header\n/dev/sda1 ten 5 5 50% /\n").is_err());
        assert!(parse_df_output("header\n10 20 30 40% /\n").is_err());
    }

    #[test]
    fn test_parse_df_output_device_with_spaces() {
        let content = "\
Filesystem   1-blocks   Used  Available Capacity Mounted on
my remote share 1000000 250000 750000 25% /mnt/share
";
        let usage = parse_df_output(content).unwrap();

        assert_eq!(usage.total_bytes, 1000000);
        assert_eq!(usage.used_bytes, 250000);
    }

    #[test]
    fn test_parse_df_output_mountpoint_with_spaces() {
        let content = "\
Filesystem 1-blocks Used Available Capacity Mounted on
/dev/sdb1 4096 1024 3072 25% /media/usb stick 2
";
        let usage = parse_df_output(content).unwrap();

        assert_eq!(usage.total_bytes, 4096);
        assert_eq!(usage.used_bytes, 1024);
    }

    #[test]
    fn test_parse_df_output_unknown_capacity() {
        let usage = parse_df_output("header\nproc 0 0 0 - /proc\n").unwrap();

        assert_eq!(usage, DiskUsage::default());
    }
}
