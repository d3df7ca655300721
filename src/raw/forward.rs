use crate::{ActivationPair, LstmParams, Snapshot, Vector};

/// Computes one timestep.
///
/// `previous` is the snapshot of the step before, if any; without one the previous output and
/// cell state are zero.
pub fn forward_step<const I: usize, const O: usize>(
    params: &LstmParams<I, O>,
    activations: ActivationPair,
    previous: Option<&Snapshot<I, O>>,
    x: &Vector<I>,
) -> Snapshot<I, O> {
    let ActivationPair { phi, sigma } = activations;
    let (y_prev, c_prev) = match previous {
        Some(previous) => (previous.y, previous.c),
        None => (Vector::zeroed(), Vector::zeroed()),
    };

    // z = W_z x + U_z y_prev + b_z
    let z = params.w_z.mul_vector(x) + params.u_z.mul_vector(&y_prev) + params.b_z;

    // i = W_i x + U_i y_prev + peep_i ⊙ c_prev + b_i
    let i = params.w_i.mul_vector(x)
        + params.u_i.mul_vector(&y_prev)
        + params.peep_i.hadamard(&c_prev)
        + params.b_i;

    // f = W_f x + U_f y_prev + peep_f ⊙ c_prev + b_f
    let f = params.w_f.mul_vector(x)
        + params.u_f.mul_vector(&y_prev)
        + params.peep_f.hadamard(&c_prev)
        + params.b_f;

    // c = σ(i) ⊙ σ(z) + φ(f) ⊙ c_prev
    // The candidate goes through the gate activation and the forget term through the primary
    // one.
    let c = sigma.apply_vector(&i).hadamard(&sigma.apply_vector(&z))
        + phi.apply_vector(&f).hadamard(&c_prev);

    // o = W_o x + U_o y_prev + peep_o ⊙ c + b_o
    let o = params.w_o.mul_vector(x)
        + params.u_o.mul_vector(&y_prev)
        + params.peep_o.hadamard(&c)
        + params.b_o;

    // y = σ(o) ⊙ φ(c)
    let y = sigma.apply_vector(&o).hadamard(&phi.apply_vector(&c));

    Snapshot {
        x: *x,
        z,
        i,
        f,
        c,
        o,
        y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_params_first_step() {
        let params = LstmParams::<2, 1>::zeroed();
        let step = forward_step(
            &params,
            ActivationPair::default(),
            None,
            &Vector::new([1.0, 1.0]),
        );
        assert_eq!(step.z, Vector::zeroed());
        assert_eq!(step.i, Vector::zeroed());
        assert_eq!(step.f, Vector::zeroed());
        // σ(0) σ(0) + tanh(0) · 0
        assert_eq!(step.c, Vector::splat(0.25));
        assert_eq!(step.o, Vector::zeroed());
        assert_eq!(step.y, Vector::splat(0.5 * 0.25f32.tanh()));
    }

    #[test]
    fn previous_step_feeds_recurrence() {
        let mut params = LstmParams::<1, 1>::zeroed();
        params.u_z = crate::Matrix::splat(2.0);
        params.peep_i = Vector::splat(3.0);
        let previous = Snapshot {
            y: Vector::splat(0.5),
            c: Vector::splat(0.25),
            ..forward_step(&params, ActivationPair::default(), None, &Vector::zeroed())
        };
        let step = forward_step(
            &params,
            ActivationPair::default(),
            Some(&previous),
            &Vector::zeroed(),
        );
        assert_eq!(step.z, Vector::splat(1.0));
        assert_eq!(step.i, Vector::splat(0.75));
    }
}
