//! Collectors for Linux `/proc` filesystem.
//!
//! This module provides parsers and collectors for reading load, memory and
//! mount information from the `/proc` virtual filesystem.

pub mod cpu;
pub mod memory;
pub mod mounts;
pub mod parser;

pub use cpu::CpuCollector;
pub use memory::MemoryCollector;
pub use mounts::MountCollector;
