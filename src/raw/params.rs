use std::slice;

use bytemuck::{Pod, Zeroable};
use rand::{Rng, distr::uniform::SampleRange, rngs::ThreadRng};

use crate::{Matrix, PrettyPrintGate, Vector};

/// The four weight blocks of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Candidate activation.
    Z,
    /// Input gate.
    I,
    /// Forget gate.
    F,
    /// Output gate.
    O,
}

impl Gate {
    pub const ALL: [Gate; 4] = [Gate::Z, Gate::I, Gate::F, Gate::O];

    pub fn name(self) -> &'static str {
        match self {
            Gate::Z => "z",
            Gate::I => "i",
            Gate::F => "f",
            Gate::O => "o",
        }
    }
}

/// Immutable view of the parameters feeding one gate.
#[derive(Debug, Clone, Copy)]
pub struct GateRef<'a, const I: usize, const O: usize> {
    pub gate: Gate,
    /// Input weights.
    pub w: &'a Matrix<O, I>,
    /// Recurrent weights.
    pub u: &'a Matrix<O, O>,
    /// Peephole weights. The candidate has none.
    pub peep: Option<&'a Vector<O>>,
    pub b: &'a Vector<O>,
}

/// All trainable parameters of a cell.
///
/// `I` is the input width and `O` the output (and cell state) width.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct LstmParams<const I: usize, const O: usize> {
    pub w_z: Matrix<O, I>,
    pub w_i: Matrix<O, I>,
    pub w_f: Matrix<O, I>,
    pub w_o: Matrix<O, I>,

    pub u_z: Matrix<O, O>,
    pub u_i: Matrix<O, O>,
    pub u_f: Matrix<O, O>,
    pub u_o: Matrix<O, O>,

    pub peep_i: Vector<O>,
    pub peep_f: Vector<O>,
    pub peep_o: Vector<O>,

    pub b_z: Vector<O>,
    pub b_i: Vector<O>,
    pub b_f: Vector<O>,
    pub b_o: Vector<O>,
}

// Safety: every field is a `Pod` block of `f32`s, so the `repr(C)` layout has no padding.
unsafe impl<const I: usize, const O: usize> Zeroable for LstmParams<I, O> {}
unsafe impl<const I: usize, const O: usize> Pod for LstmParams<I, O> {}

impl<const I: usize, const O: usize> Default for LstmParams<I, O> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const I: usize, const O: usize> LstmParams<I, O> {
    /// Total number of scalar parameters.
    pub const N_PARAMS: usize = 4 * O * I + 4 * O * O + 3 * O + 4 * O;

    pub fn zeroed() -> Self {
        Zeroable::zeroed()
    }

    pub fn new_boxed_zeroed() -> Box<Self> {
        bytemuck::zeroed_box()
    }

    pub fn n_params(&self) -> usize {
        Self::N_PARAMS
    }

    /// Direct access to the parameters as one flat buffer.
    /// Useful for dumping/loading params from file.
    pub fn as_slice(&self) -> &[f32] {
        bytemuck::cast_slice(slice::from_ref(self))
    }

    /// Direct access to the parameters as one flat buffer.
    /// Useful for dumping/loading params from file.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        bytemuck::cast_slice_mut(slice::from_mut(self))
    }

    pub fn clear(&mut self) {
        self.as_mut_slice().fill(0.0);
    }

    pub fn randomize(&mut self, range: impl SampleRange<f32> + Clone) {
        let mut rng = ThreadRng::default();
        self.randomize_with(&mut rng, range);
    }

    pub fn randomize_with(&mut self, rng: &mut impl Rng, range: impl SampleRange<f32> + Clone) {
        for p in self.as_mut_slice() {
            *p = rng.random_range(range.clone());
        }
    }

    pub fn gate(&self, gate: Gate) -> GateRef<'_, I, O> {
        let (w, u, peep, b) = match gate {
            Gate::Z => (&self.w_z, &self.u_z, None, &self.b_z),
            Gate::I => (&self.w_i, &self.u_i, Some(&self.peep_i), &self.b_i),
            Gate::F => (&self.w_f, &self.u_f, Some(&self.peep_f), &self.b_f),
            Gate::O => (&self.w_o, &self.u_o, Some(&self.peep_o), &self.b_o),
        };
        GateRef {
            gate,
            w,
            u,
            peep,
            b,
        }
    }

    pub fn pretty_print_gate(
        &self,
        gate: Gate,
        activation_name: &'static str,
    ) -> PrettyPrintGate<'_, I, O> {
        PrettyPrintGate::new(self.gate(gate), activation_name)
    }
}
