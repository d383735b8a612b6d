//! Canned command outputs for testing collectors without running processes.

use crate::collector::traits::CommandRunner;
use std::collections::HashMap;
use std::io;

/// In-memory command runner.
///
/// Outputs are keyed by the full command line (`program` and `args` joined
/// by single spaces). Unregistered command lines fail as if the program
/// were missing.
#[derive(Debug, Clone, Default)]
pub struct MockCommands {
    outputs: HashMap<String, String>,
}

impl MockCommands {
    /// Creates a runner where every command fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers stdout for a command line.
    pub fn add_output(&mut self, program: &str, args: &[&str], stdout: impl Into<String>) {
        self.outputs
            .insert(command_line(program, args), stdout.into());
    }

    /// Registers `df -B1 -P <path>` output reporting the given byte counts.
    pub fn add_df(&mut self, device: &str, path: &str, total_bytes: u64, used_bytes: u64) {
        let avail = total_bytes.saturating_sub(used_bytes);
        let pct = if total_bytes == 0 {
            0
        } else {
            used_bytes * 100 / total_bytes
        };
        let stdout = format!(
            "Filesystem 1-blocks Used Available Capacity Mounted on\n\
             {device} {total_bytes} {used_bytes} {avail} {pct}% {path}\n"
        );
        self.add_output("df", &["-B1", "-P", path], stdout);
    }

    /// Unregisters a command line so it fails.
    pub fn remove_output(&mut self, program: &str, args: &[&str]) {
        self.outputs.remove(&command_line(program, args));
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl CommandRunner for MockCommands {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String> {
        let line = command_line(program, args);
        self.outputs.get(&line).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("command not found: {line}"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_commands_registered_output() {
        let mut cmds = MockCommands::new();
        cmds.add_output("sensors", &[], "Tctl: +45.3°C\n");

        assert_eq!(cmds.run("sensors", &[]).unwrap(), "Tctl: +45.3°C\n");
    }

    #[test]
    fn test_mock_commands_args_are_part_of_key() {
        let mut cmds = MockCommands::new();
        cmds.add_df("/dev/sda1", "/", 1000, 500);

        assert!(cmds.run("df", &["-B1", "-P", "/"]).is_ok());
        assert!(cmds.run("df", &["-B1", "-P", "/home"]).is_err());
        assert!(cmds.run("df", &["/"]).is_err());
    }

    #[test]
    fn test_mock_commands_remove_output() {
        let mut cmds = MockCommands::new();
        cmds.add_output("sensors", &[], "x");
        cmds.remove_output("sensors", &[]);

        let err = cmds.run("sensors", &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
