pub use faer;

mod activation;
mod cell;
mod error;
mod fixed;
mod pretty_print;
pub mod raw;

pub use activation::*;
pub use cell::*;
pub use error::*;
pub use fixed::*;
pub use pretty_print::*;
pub use raw::{
    Gate, GateRef, GradientRecord, LstmParams, Memory, MemoryState, Snapshot, SnapshotMemory,
    back_propagate, forward_step,
};
