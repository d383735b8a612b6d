//! Mock source implementations for testing.
//!
//! This module provides `MockFs`, `MockCommands`, `MockHostEnv` and pre-built
//! scenarios for testing collectors without real `/proc`, `sensors` or `df`.

mod commands;
mod filesystem;
mod host;
mod scenarios;

pub use commands::MockCommands;
pub use filesystem::MockFs;
pub use host::MockHostEnv;
pub use scenarios::MockHost;
