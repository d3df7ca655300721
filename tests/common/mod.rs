//! Loop-based reference cell over plain arrays, independent of `Vector`/`Matrix`.
//!
//! Gate blocks are ordered z, i, f, o; peepholes i, f, o. Row index is the output unit.

#![allow(dead_code)]

use peephole_lstm::{LstmParams, Matrix, Vector};

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + f32::exp(-x))
}

pub fn sigmoid_deriv(x: f32) -> f32 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

pub fn tanh_deriv(x: f32) -> f32 {
    1.0 - f32::tanh(x).powi(2)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefParams<const I: usize, const O: usize> {
    pub w: [[[f32; I]; O]; 4],
    pub u: [[[f32; O]; O]; 4],
    pub peep: [[f32; O]; 3],
    pub b: [[f32; O]; 4],
}

#[derive(Debug, Clone, Copy)]
pub struct RefStep<const I: usize, const O: usize> {
    pub x: [f32; I],
    pub z: [f32; O],
    pub i: [f32; O],
    pub f: [f32; O],
    pub c: [f32; O],
    pub o: [f32; O],
    pub y: [f32; O],
}

#[derive(Debug, Clone, Copy)]
pub struct RefGrads<const I: usize, const O: usize> {
    pub x: [f32; I],
    pub z: [f32; O],
    pub i: [f32; O],
    pub f: [f32; O],
    pub c: [f32; O],
    pub o: [f32; O],
    pub y: [f32; O],
}

impl<const I: usize, const O: usize> RefGrads<I, O> {
    fn zeroed() -> Self {
        Self {
            x: [0.0; I],
            z: [0.0; O],
            i: [0.0; O],
            f: [0.0; O],
            c: [0.0; O],
            o: [0.0; O],
            y: [0.0; O],
        }
    }

    /// Gate gradients in block order z, i, f, o.
    fn gates(&self) -> [[f32; O]; 4] {
        [self.z, self.i, self.f, self.o]
    }
}

/// Deterministic, non-trivial values in roughly [-0.6, 0.6].
pub fn pattern(seed: usize) -> f32 {
    ((seed * 37 + 11) % 23) as f32 / 19.0 - 0.6
}

impl<const I: usize, const O: usize> RefParams<I, O> {
    pub fn patterned() -> Self {
        let mut seed = 0;
        let mut next = || {
            seed += 1;
            pattern(seed)
        };
        let mut params = Self {
            w: [[[0.0; I]; O]; 4],
            u: [[[0.0; O]; O]; 4],
            peep: [[0.0; O]; 3],
            b: [[0.0; O]; 4],
        };
        params.w.iter_mut().flatten().flatten().for_each(|p| *p = next());
        params.u.iter_mut().flatten().flatten().for_each(|p| *p = next());
        params.peep.iter_mut().flatten().for_each(|p| *p = next());
        params.b.iter_mut().flatten().for_each(|p| *p = next());
        params
    }

    pub fn to_params(&self) -> Box<LstmParams<I, O>> {
        let mut params = LstmParams::<I, O>::new_boxed_zeroed();
        let [w_z, w_i, w_f, w_o] = self.w.map(Matrix::new);
        let [u_z, u_i, u_f, u_o] = self.u.map(Matrix::new);
        let [peep_i, peep_f, peep_o] = self.peep.map(Vector::new);
        let [b_z, b_i, b_f, b_o] = self.b.map(Vector::new);
        *params = LstmParams {
            w_z,
            w_i,
            w_f,
            w_o,
            u_z,
            u_i,
            u_f,
            u_o,
            peep_i,
            peep_f,
            peep_o,
            b_z,
            b_i,
            b_f,
            b_o,
        };
        params
    }

    /// `w[r] · x + u[r] · y_prev` for one gate block.
    fn affine(&self, gate: usize, r: usize, x: &[f32; I], y_prev: &[f32; O]) -> f32 {
        let mut wx = 0.0;
        for c in 0..I {
            wx += self.w[gate][r][c] * x[c];
        }
        let mut uy = 0.0;
        for k in 0..O {
            uy += self.u[gate][r][k] * y_prev[k];
        }
        wx + uy
    }

    pub fn forward(&self, x: [f32; I], previous: Option<&RefStep<I, O>>) -> RefStep<I, O> {
        let (y_prev, c_prev) = previous.map_or(([0.0; O], [0.0; O]), |p| (p.y, p.c));
        let mut step = RefStep {
            x,
            z: [0.0; O],
            i: [0.0; O],
            f: [0.0; O],
            c: [0.0; O],
            o: [0.0; O],
            y: [0.0; O],
        };
        for r in 0..O {
            let [p_i, p_f, p_o] = [self.peep[0][r], self.peep[1][r], self.peep[2][r]];
            let z = self.affine(0, r, &x, &y_prev) + self.b[0][r];
            let i = self.affine(1, r, &x, &y_prev) + p_i * c_prev[r] + self.b[1][r];
            let f = self.affine(2, r, &x, &y_prev) + p_f * c_prev[r] + self.b[2][r];
            let c = sigmoid(i) * sigmoid(z) + f.tanh() * c_prev[r];
            let o = self.affine(3, r, &x, &y_prev) + p_o * c + self.b[3][r];
            step.z[r] = z;
            step.i[r] = i;
            step.f[r] = f;
            step.c[r] = c;
            step.o[r] = o;
            step.y[r] = sigmoid(o) * c.tanh();
        }
        step
    }

    pub fn run(&self, xs: &[[f32; I]]) -> Vec<RefStep<I, O>> {
        let mut steps: Vec<RefStep<I, O>> = Vec::new();
        for &x in xs {
            let step = self.forward(x, steps.last());
            steps.push(step);
        }
        steps
    }

    /// Truncated BPTT over `steps`, accumulating into `self` in place.
    /// Returns the gradients of every step, newest first.
    pub fn backward(&mut self, steps: &[RefStep<I, O>], dl_dy: [f32; O]) -> Vec<RefGrads<I, O>> {
        let n = steps.len();
        let mut records = Vec::new();
        let mut next = RefGrads::<I, O>::zeroed();
        let mut next_forget = [0.0f32; O];
        for t in (0..n).rev() {
            let s = &steps[t];
            let next_gates = next.gates();
            let mut g = RefGrads::<I, O>::zeroed();

            for r in 0..O {
                // del_y = Σ_gates U_gᵀ · del_g(t + 1)
                let mut del_y = 0.0;
                for gate in 0..4 {
                    let mut sum = 0.0;
                    for k in 0..O {
                        sum += next_gates[gate][k] * self.u[gate][k][r];
                    }
                    del_y += sum;
                }
                if t == n - 1 {
                    del_y += dl_dy[r];
                }
                g.y[r] = del_y;
            }
            for r in 0..O {
                g.o[r] = g.y[r] * s.c[r].tanh() * sigmoid_deriv(s.o[r]);
                let mut del_c = g.y[r] * sigmoid(s.o[r]) * tanh_deriv(s.c[r]);
                del_c += self.peep[2][r] * g.o[r];
                del_c += self.peep[0][r] * next.i[r];
                del_c += self.peep[1][r] * next.f[r];
                del_c += next.c[r] * next_forget[r];
                g.c[r] = del_c;
                g.f[r] = match t {
                    0 => 0.0,
                    _ => g.c[r] * steps[t - 1].c[r] * sigmoid_deriv(s.f[r]),
                };
                g.i[r] = g.c[r] * sigmoid(s.z[r]) * sigmoid_deriv(s.i[r]);
                g.z[r] = g.c[r] * sigmoid(s.i[r]) * tanh_deriv(s.z[r]);
            }
            let gates = g.gates();
            for c in 0..I {
                let mut del_x = 0.0;
                for gate in 0..4 {
                    let mut sum = 0.0;
                    for r in 0..O {
                        sum += gates[gate][r] * self.w[gate][r][c];
                    }
                    del_x += sum;
                }
                g.x[c] = del_x;
            }

            for gate in 0..4 {
                for r in 0..O {
                    for c in 0..I {
                        self.w[gate][r][c] += gates[gate][r] * s.x[c];
                    }
                    for k in 0..O {
                        self.u[gate][r][k] += next_gates[gate][r] * s.y[k];
                    }
                    self.b[gate][r] += gates[gate][r];
                }
            }
            for r in 0..O {
                self.peep[0][r] += g.c[r] * next.i[r];
                self.peep[1][r] += g.c[r] * next.f[r];
                self.peep[2][r] += g.c[r] * g.o[r];
            }

            next_forget = s.f.map(f32::tanh);
            next = g;
            records.push(g);
        }
        records
    }
}

pub fn assert_close(label: &str, got: &[f32], expected: &[f32]) {
    assert_eq!(got.len(), expected.len(), "{label}: length mismatch");
    for (k, (g, e)) in got.iter().zip(expected).enumerate() {
        assert!((g - e).abs() < 1e-6, "{label}[{k}]: got {g}, expected {e}");
    }
}
