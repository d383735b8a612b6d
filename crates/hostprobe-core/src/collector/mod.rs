//! Host metrics collector.
//!
//! This module reads load, memory, mount and sensor data from the host and
//! assembles it into a `HostSnapshot`, with every external source behind a
//! trait so the whole pipeline runs against mocks in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   HostSnapshotAssembler                      │
//! │  /proc/uptime, hostname, platform                            │
//! │  ┌──────────────┐ ┌────────────────┐ ┌───────────────────┐   │
//! │  │ CpuCollector │ │MemoryCollector │ │  MountCollector   │   │
//! │  │ /proc/loadavg│ │ /proc/meminfo  │ │  /proc/mounts     │   │
//! │  │ sensors      │ │                │ │  df -B1 -P <path> │   │
//! │  └──────┬───────┘ └───────┬────────┘ └─────────┬─────────┘   │
//! │         └─────────────────┼────────────────────┘             │
//! │        ┌──────────────────┼──────────────────┐               │
//! │  ┌─────▼──────┐   ┌───────▼───────┐   ┌──────▼────┐          │
//! │  │ FileSystem │   │ CommandRunner │   │  HostEnv  │ (traits) │
//! │  └─────┬──────┘   └───────┬───────┘   └──────┬────┘          │
//! └────────┼──────────────────┼──────────────────┼───────────────┘
//!          │                  │                  │
//!   RealFs / MockFs   RealCommandRunner /   RealHostEnv /
//!                     MockCommands          MockHostEnv
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```no_run
//! use hostprobe_core::collector::{
//!     DEFAULT_PROC_PATH, HostSnapshotAssembler, RealCommandRunner, RealFs, RealHostEnv,
//! };
//!
//! let assembler = HostSnapshotAssembler::new(
//!     RealFs::new(),
//!     RealCommandRunner::default(),
//!     RealHostEnv::new(),
//!     DEFAULT_PROC_PATH,
//! );
//! let snapshot = assembler.assemble();
//! println!("{}", snapshot.hostname);
//! ```
//!
//! ## Testing (with mocks)
//!
//! ```
//! use hostprobe_core::collector::MockHost;
//!
//! let snapshot = MockHost::typical_system().assembler().assemble();
//! assert_eq!(snapshot.cpu.load1_pct, 12);
//! ```

mod assembler;
pub mod error;
pub mod mock;
pub mod procfs;
pub mod sensors;
pub mod traits;

pub use assembler::{DEFAULT_PROC_PATH, HostSnapshotAssembler};
pub use error::CollectError;
pub use mock::{MockCommands, MockFs, MockHost, MockHostEnv};
pub use procfs::{CpuCollector, MemoryCollector, MountCollector};
pub use traits::{CommandRunner, FileSystem, HostEnv, RealCommandRunner, RealFs, RealHostEnv};
