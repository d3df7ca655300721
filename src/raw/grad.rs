use crate::Vector;

/// Gradients for one timestep of a backward pass. Only lives for the duration of the pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientRecord<const I: usize, const O: usize> {
    pub del_x: Vector<I>,
    pub del_z: Vector<O>,
    pub del_i: Vector<O>,
    pub del_f: Vector<O>,
    pub del_c: Vector<O>,
    pub del_o: Vector<O>,
    pub del_y: Vector<O>,
}

impl<const I: usize, const O: usize> GradientRecord<I, O> {
    pub const fn zeroed() -> Self {
        Self {
            del_x: Vector::zeroed(),
            del_z: Vector::zeroed(),
            del_i: Vector::zeroed(),
            del_f: Vector::zeroed(),
            del_c: Vector::zeroed(),
            del_o: Vector::zeroed(),
            del_y: Vector::zeroed(),
        }
    }
}

impl<const I: usize, const O: usize> Default for GradientRecord<I, O> {
    fn default() -> Self {
        Self::zeroed()
    }
}
