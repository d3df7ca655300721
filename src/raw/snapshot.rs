use crate::Vector;

/// Everything one forward step produced, kept so the backward pass never recomputes it.
///
/// Gate fields hold pre-activation values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<const I: usize, const O: usize> {
    pub x: Vector<I>,
    pub z: Vector<O>,
    pub i: Vector<O>,
    pub f: Vector<O>,
    /// Cell state.
    pub c: Vector<O>,
    pub o: Vector<O>,
    /// Output.
    pub y: Vector<O>,
}
