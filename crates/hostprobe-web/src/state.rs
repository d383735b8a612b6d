//! Shared application state.

use std::sync::Arc;

use axum::extract::State;

use hostprobe_core::collector::{CommandRunner, FileSystem, HostEnv, HostSnapshotAssembler};
use hostprobe_core::model::HostSnapshot;

/// Anything that can produce a fresh snapshot on demand.
pub(crate) trait SnapshotSource: Send + Sync + 'static {
    fn assemble(&self) -> HostSnapshot;
}

impl<F, C, H> SnapshotSource for HostSnapshotAssembler<F, C, H>
where
    F: FileSystem + Clone + 'static,
    C: CommandRunner + Clone + 'static,
    H: HostEnv + 'static,
{
    fn assemble(&self) -> HostSnapshot {
        HostSnapshotAssembler::assemble(self)
    }
}

pub(crate) type SharedSource = Arc<dyn SnapshotSource>;

pub(crate) type AppState = State<SharedSource>;
