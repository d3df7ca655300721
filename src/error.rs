use derive_more::{Display, Error};

pub type LstmResult<T> = Result<T, LstmError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum LstmError {
    /// `backward` was called while the snapshot memory was empty.
    #[display("no forward pass recorded")]
    EmptyMemory,
    /// A runtime-sized buffer did not have the length required by a fixed-size type.
    #[display("shape mismatch: expected {expected} elements, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}
