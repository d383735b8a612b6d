//! Fixed host identity and clock for deterministic tests.

use crate::collector::traits::HostEnv;
use std::io;

/// Host environment with fixed, test-controlled answers.
#[derive(Debug, Clone)]
pub struct MockHostEnv {
    /// `None` makes the hostname lookup fail.
    pub hostname: Option<String>,
    pub platform: String,
    pub cpu_count: usize,
    pub now_unix: i64,
}

impl Default for MockHostEnv {
    fn default() -> Self {
        Self {
            hostname: Some("testhost".to_string()),
            platform: "linux".to_string(),
            cpu_count: 4,
            now_unix: 1_700_000_000,
        }
    }
}

impl MockHostEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cpu_count(mut self, cpu_count: usize) -> Self {
        self.cpu_count = cpu_count;
        self
    }

    pub fn without_hostname(mut self) -> Self {
        self.hostname = None;
        self
    }
}

impl HostEnv for MockHostEnv {
    fn hostname(&self) -> io::Result<String> {
        self.hostname
            .clone()
            .ok_or_else(|| io::Error::other("hostname lookup failed"))
    }

    fn platform(&self) -> String {
        self.platform.clone()
    }

    fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    fn now_unix(&self) -> i64 {
        self.now_unix
    }
}
