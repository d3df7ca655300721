//! Core parts of the algorithms without abstraction.

pub mod grad;
pub mod memory;
pub mod params;
pub mod snapshot;

pub use grad::GradientRecord;
pub use memory::{Memory, MemoryState, SnapshotMemory};
pub use params::{Gate, GateRef, LstmParams};
pub use snapshot::Snapshot;

mod back_propagation;
mod forward;

pub use back_propagation::*;
pub use forward::*;
