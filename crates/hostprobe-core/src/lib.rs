//! hostprobe-core — host telemetry collection for the hostprobe endpoint.
//!
//! Provides:
//! - `collector` — source abstractions (filesystem, commands, host env),
//!   `/proc` parsers, per-metric collectors and the snapshot assembler
//! - `model` — serializable snapshot types returned to the HTTP layer

pub mod collector;
pub mod model;

/// Crate version with the git SHA it was built from, e.g. `0.1.0 (a1b2c3d)`.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");
