use rand::{Rng, distr::uniform::SampleRange};
use tracing::{debug, trace};

use crate::{
    ActivationFunction, ActivationPair, DynActivationFunction, Gate, GradientRecord, LstmParams,
    LstmResult, MemoryState, PrettyPrintGate, Snapshot, SnapshotMemory, Vector,
    raw::{back_propagate, forward_step},
};

/// Construction-time configuration of a cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellDescription {
    /// Number of snapshots kept for the backward pass. 0 means unbounded.
    pub memory_capacity: usize,
    pub activations: ActivationPair,
}

impl CellDescription {
    pub fn new(memory_capacity: usize) -> Self {
        Self {
            memory_capacity,
            activations: ActivationPair::default(),
        }
    }

    pub fn with_memory_capacity(mut self, memory_capacity: usize) -> Self {
        self.memory_capacity = memory_capacity;
        self
    }

    /// Replaces the primary activation (default `Tanh`).
    pub fn with_activation(mut self, phi: impl ActivationFunction) -> Self {
        self.activations.phi = DynActivationFunction::new(phi);
        self
    }

    /// Replaces the gate activation (default `Sigmoid`).
    pub fn with_gate_activation(mut self, sigma: impl ActivationFunction) -> Self {
        self.activations.sigma = DynActivationFunction::new(sigma);
        self
    }

    pub fn with_activations(mut self, activations: ActivationPair) -> Self {
        self.activations = activations;
        self
    }
}

/// A single LSTM cell with peephole connections, trained by truncated backpropagation through
/// time.
///
/// `I` is the input width and `O` the output width.
pub struct LstmCell<const I: usize, const O: usize> {
    description: CellDescription,
    params: Box<LstmParams<I, O>>,
    memory: SnapshotMemory<I, O>,
}

impl<const I: usize, const O: usize> LstmCell<I, O> {
    /// A cell with every parameter set to zero.
    pub fn new(description: CellDescription) -> Self {
        Self::from_params(description, LstmParams::new_boxed_zeroed())
    }

    pub fn from_params(description: CellDescription, params: Box<LstmParams<I, O>>) -> Self {
        Self {
            description,
            params,
            memory: SnapshotMemory::new(description.memory_capacity),
        }
    }

    pub fn into_params(self) -> Box<LstmParams<I, O>> {
        self.params
    }

    pub fn description(&self) -> &CellDescription {
        &self.description
    }

    pub fn n_inputs(&self) -> usize {
        I
    }

    pub fn n_outputs(&self) -> usize {
        O
    }

    /// Runs one timestep and records it in memory.
    ///
    /// The previous output and cell state come from the newest snapshot, or are zero if memory
    /// is empty. Parameters are not touched.
    pub fn forward(&mut self, x: &Vector<I>) -> &Vector<O> {
        let step = forward_step(
            &*self.params,
            self.description.activations,
            self.memory.latest(),
            x,
        );
        let capacity = self.memory.capacity();
        let (latest, evicted) = self.memory.push_and_get(step);
        if evicted.is_some() {
            trace!(capacity, "memory window full, evicted oldest snapshot");
        }
        &latest.y
    }

    /// Backpropagates `dl_dy`, the gradient for the most recent output, through the whole
    /// memory window.
    ///
    /// Gradients are added directly onto the parameters; choosing a step size or resetting
    /// parameters is up to the caller. Returns the gradient with respect to the oldest retained
    /// input.
    pub fn backward(&mut self, dl_dy: &Vector<O>) -> LstmResult<Vector<I>> {
        self.backward_with(dl_dy, |_, _| {})
    }

    /// Like `backward`, also returning every timestep's gradients, newest first.
    pub fn backward_traced(
        &mut self,
        dl_dy: &Vector<O>,
    ) -> LstmResult<(Vector<I>, Vec<GradientRecord<I, O>>)> {
        let mut records = Vec::with_capacity(self.memory.len());
        let del_x = self.backward_with(dl_dy, |_, record| records.push(*record))?;
        Ok((del_x, records))
    }

    fn backward_with(
        &mut self,
        dl_dy: &Vector<O>,
        on_record: impl FnMut(usize, &GradientRecord<I, O>),
    ) -> LstmResult<Vector<I>> {
        let del_x = back_propagate(
            &mut *self.params,
            self.description.activations,
            &self.memory,
            dl_dy,
            on_record,
        )?;
        debug!(
            steps = self.memory.len(),
            capacity = self.memory.capacity(),
            "backward pass accumulated into parameters"
        );
        Ok(del_x)
    }

    /// Forgets every snapshot, starting a new sequence. Parameters are kept.
    pub fn reset_memory(&mut self) {
        self.memory.clear();
    }

    pub fn memory(&self) -> &SnapshotMemory<I, O> {
        &self.memory
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn memory_capacity(&self) -> usize {
        self.memory.capacity()
    }

    pub fn memory_state(&self) -> MemoryState {
        self.memory.state()
    }

    pub fn latest_snapshot(&self) -> Option<&Snapshot<I, O>> {
        self.memory.latest()
    }

    pub fn last_output(&self) -> Option<&Vector<O>> {
        self.latest_snapshot().map(|step| &step.y)
    }

    pub fn last_cell_state(&self) -> Option<&Vector<O>> {
        self.latest_snapshot().map(|step| &step.c)
    }

    pub fn params(&self) -> &LstmParams<I, O> {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut LstmParams<I, O> {
        &mut self.params
    }

    pub fn params_as_slice(&self) -> &[f32] {
        self.params.as_slice()
    }

    pub fn params_as_mut_slice(&mut self) -> &mut [f32] {
        self.params.as_mut_slice()
    }

    pub fn randomize_params(&mut self, range: impl SampleRange<f32> + Clone) {
        self.params.randomize(range);
    }

    pub fn randomize_params_with(
        &mut self,
        rng: &mut impl Rng,
        range: impl SampleRange<f32> + Clone,
    ) {
        self.params.randomize_with(rng, range);
    }

    /// Pretty printer for one gate, labelled with the activation that gate actually uses.
    pub fn pretty_print_gate(&self, gate: Gate) -> PrettyPrintGate<'_, I, O> {
        let ActivationPair { phi, sigma } = self.description.activations;
        let activation = match gate {
            Gate::F => phi,
            Gate::Z | Gate::I | Gate::O => sigma,
        };
        self.params.pretty_print_gate(gate, activation.name())
    }
}
