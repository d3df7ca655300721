use crate::{
    ActivationPair, GradientRecord, LstmError, LstmParams, LstmResult, SnapshotMemory, Vector,
};

/// Truncated backpropagation through every snapshot in `memory`, newest to oldest.
///
/// Gradients are added onto `params` in place as each timestep is visited; there is no separate
/// gradient buffer and no step size. `on_record` sees each timestep's gradients (with its
/// logical index in `memory`) in the order they are produced.
///
/// Returns `dL/dx` for the oldest retained input.
pub fn back_propagate<const I: usize, const O: usize>(
    params: &mut LstmParams<I, O>,
    activations: ActivationPair,
    memory: &SnapshotMemory<I, O>,
    dl_dy: &Vector<O>,
    mut on_record: impl FnMut(usize, &GradientRecord<I, O>),
) -> LstmResult<Vector<I>> {
    let ActivationPair { phi, sigma } = activations;
    let newest = memory.len().checked_sub(1).ok_or(LstmError::EmptyMemory)?;

    // Gradients of timestep t + 1, zero while visiting the newest step.
    let mut next = GradientRecord::<I, O>::zeroed();
    // φ(f_{t+1}), the factor that carried c_t into c_{t+1}.
    let mut next_forget = Vector::<O>::zeroed();

    for (t, step) in memory.iter().enumerate().rev() {
        let previous = t.checked_sub(1).and_then(|t_prev| memory.get(t_prev));

        // Recurrent flow from the gates of t + 1.
        let mut del_y = params.u_z.transpose_mul_vector(&next.del_z)
            + params.u_i.transpose_mul_vector(&next.del_i)
            + params.u_f.transpose_mul_vector(&next.del_f)
            + params.u_o.transpose_mul_vector(&next.del_o);
        if t == newest {
            del_y += *dl_dy;
        }

        let del_o = del_y
            .hadamard(&phi.apply_vector(&step.c))
            .hadamard(&sigma.deriv_vector(&step.o));

        let mut del_c = del_y
            .hadamard(&sigma.apply_vector(&step.o))
            .hadamard(&phi.deriv_vector(&step.c));
        del_c.add_hadamard_in_place(&params.peep_o, &del_o);
        del_c.add_hadamard_in_place(&params.peep_i, &next.del_i);
        del_c.add_hadamard_in_place(&params.peep_f, &next.del_f);
        del_c.add_hadamard_in_place(&next.del_c, &next_forget);

        // The oldest retained step has no predecessor state to blame.
        let del_f = match previous {
            Some(previous) => del_c
                .hadamard(&previous.c)
                .hadamard(&sigma.deriv_vector(&step.f)),
            None => Vector::zeroed(),
        };

        let del_i = del_c
            .hadamard(&sigma.apply_vector(&step.z))
            .hadamard(&sigma.deriv_vector(&step.i));

        let del_z = del_c
            .hadamard(&sigma.apply_vector(&step.i))
            .hadamard(&phi.deriv_vector(&step.z));

        let del_x = params.w_z.transpose_mul_vector(&del_z)
            + params.w_i.transpose_mul_vector(&del_i)
            + params.w_f.transpose_mul_vector(&del_f)
            + params.w_o.transpose_mul_vector(&del_o);

        params.w_z.add_outer_in_place(&del_z, &step.x);
        params.w_i.add_outer_in_place(&del_i, &step.x);
        params.w_f.add_outer_in_place(&del_f, &step.x);
        params.w_o.add_outer_in_place(&del_o, &step.x);

        params.u_z.add_outer_in_place(&next.del_z, &step.y);
        params.u_i.add_outer_in_place(&next.del_i, &step.y);
        params.u_f.add_outer_in_place(&next.del_f, &step.y);
        params.u_o.add_outer_in_place(&next.del_o, &step.y);

        params.b_z += del_z;
        params.b_i += del_i;
        params.b_f += del_f;
        params.b_o += del_o;

        params.peep_i.add_hadamard_in_place(&del_c, &next.del_i);
        params.peep_f.add_hadamard_in_place(&del_c, &next.del_f);
        params.peep_o.add_hadamard_in_place(&del_c, &del_o);

        next = GradientRecord {
            del_x,
            del_z,
            del_i,
            del_f,
            del_c,
            del_o,
            del_y,
        };
        next_forget = phi.apply_vector(&step.f);
        on_record(t, &next);
    }

    Ok(next.del_x)
}
