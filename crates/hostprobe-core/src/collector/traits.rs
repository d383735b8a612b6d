//! Abstractions over every external source the collectors consume.
//!
//! Collectors never touch `std::fs`, `std::process` or the system clock
//! directly. They go through these traits so tests can substitute the mocks
//! from [`crate::collector::mock`] for real OS state.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Abstraction for filesystem reads.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    ///
    /// # Arguments
    /// * `path` - Path to the file to read
    ///
    /// # Returns
    /// The file contents as a string, or an I/O error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Abstraction for running an external command and capturing its stdout.
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and returns its standard output.
    ///
    /// A command that cannot be spawned, exits unsuccessfully or outlives
    /// the runner's time limit is reported as an I/O error.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String>;
}

/// Runs commands as real child processes with a hard time limit.
#[derive(Debug, Clone, Copy)]
pub struct RealCommandRunner {
    timeout: Duration,
}

impl RealCommandRunner {
    /// Default time limit for a single command, in milliseconds.
    pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

    /// Default time limit for a single command.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(Self::DEFAULT_TIMEOUT_MS);

    const POLL_INTERVAL: Duration = Duration::from_millis(10);

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for RealCommandRunner {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

impl CommandRunner for RealCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<String> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        // Drain stdout on a separate thread so a chatty child never blocks
        // on a full pipe while we poll for its exit.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{program} timed out after {:?}", self.timeout),
                ));
            }
            thread::sleep(Self::POLL_INTERVAL);
        };

        let output = reader
            .join()
            .map_err(|_| io::Error::other("stdout reader thread panicked"))??;

        if !status.success() {
            return Err(io::Error::other(format!("{program} exited with {status}")));
        }

        Ok(String::from_utf8_lossy(&output).into_owned())
    }
}

/// Abstraction for host identity and clock lookups.
pub trait HostEnv: Send + Sync {
    /// Host name as reported by the OS.
    fn hostname(&self) -> io::Result<String>;

    /// Target OS identifier, e.g. `linux`.
    fn platform(&self) -> String;

    /// Number of logical CPU cores, at least 1.
    fn cpu_count(&self) -> usize;

    /// Current time, seconds since epoch.
    fn now_unix(&self) -> i64;
}

/// Host environment backed by the running OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealHostEnv;

impl RealHostEnv {
    pub fn new() -> Self {
        Self
    }
}

impl HostEnv for RealHostEnv {
    fn hostname(&self) -> io::Result<String> {
        hostname::get()?.into_string().map_err(|raw| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("hostname is not valid UTF-8: {raw:?}"),
            )
        })
    }

    fn platform(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn cpu_count(&self) -> usize {
        thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
