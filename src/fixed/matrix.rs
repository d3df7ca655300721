use std::{
    fmt::{self, Debug},
    ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign},
};

use bytemuck::{Pod, Zeroable};
use faer::prelude::*;

use crate::{LstmError, LstmResult, Vector};

/// A matrix with its shape fixed at the type level.
/// M: Number of rows / height of matrix.
/// N: Number of columns / width of matrix / size of each row vector.
#[derive(Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Matrix<const M: usize, const N: usize> {
    pub rows: [Vector<N>; M],
}

// Safety: `Matrix<M, N>` is `repr(transparent)` over `[Vector<N>; M]`, which is `Pod`.
unsafe impl<const M: usize, const N: usize> Zeroable for Matrix<M, N> {}
unsafe impl<const M: usize, const N: usize> Pod for Matrix<M, N> {}

impl<const M: usize, const N: usize> Debug for Matrix<M, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter_rows()).finish()
    }
}

impl<const M: usize, const N: usize> Default for Matrix<M, N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const M: usize, const N: usize> From<[[f32; N]; M]> for Matrix<M, N> {
    fn from(rows: [[f32; N]; M]) -> Self {
        Self::new(rows)
    }
}

impl<const M: usize, const N: usize> Matrix<M, N> {
    pub const N_ROWS: usize = M;
    pub const N_COLS: usize = N;

    pub fn new(rows: [[f32; N]; M]) -> Self {
        Self {
            rows: rows.map(Vector::new),
        }
    }

    pub const fn from_rows(rows: [Vector<N>; M]) -> Self {
        Self { rows }
    }

    /// Initializes a matrix of size M×N, all zeroes.
    pub const fn zeroed() -> Self {
        Self::splat(0.0)
    }

    pub const fn splat(value: f32) -> Self {
        Self {
            rows: [Vector::splat(value); M],
        }
    }

    pub fn from_fn(mut f: impl FnMut(usize, usize) -> f32) -> Self {
        Self {
            rows: std::array::from_fn(|i_m| Vector::from_fn(|i_n| f(i_m, i_n))),
        }
    }

    /// Copies a runtime-sized, row-major slice into a matrix.
    /// Fails with `ShapeMismatch` if `slice.len() != M * N`.
    pub fn try_from_row_major(slice: &[f32]) -> LstmResult<Self> {
        if slice.len() != M * N {
            return Err(LstmError::ShapeMismatch {
                expected: M * N,
                got: slice.len(),
            });
        }
        let mut result = Self::zeroed();
        result.as_flat_mut_slice().copy_from_slice(slice);
        Ok(result)
    }

    /// Heap-allocated zero matrix, for sizes that should stay off the stack.
    pub fn new_boxed_zeroed() -> Box<Self> {
        bytemuck::zeroed_box()
    }

    pub fn clear(&mut self) {
        self.fill(0.0);
    }

    pub fn fill(&mut self, value: f32) {
        self.as_flat_mut_slice().fill(value);
    }

    pub fn get_row(&self, i_m: usize) -> Option<&Vector<N>> {
        self.rows.get(i_m)
    }

    pub fn get_row_mut(&mut self, i_m: usize) -> Option<&mut Vector<N>> {
        self.rows.get_mut(i_m)
    }

    pub fn get_element(&self, i_m: usize, i_n: usize) -> Option<f32> {
        self.get_row(i_m).and_then(|row| row.get(i_n))
    }

    pub fn get_element_mut(&mut self, i_m: usize, i_n: usize) -> Option<&mut f32> {
        self.get_row_mut(i_m).and_then(|row| row.get_mut(i_n))
    }

    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &Vector<N>> {
        self.rows.iter()
    }

    pub fn iter_rows_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Vector<N>> {
        self.rows.iter_mut()
    }

    pub fn iter_elements(&self) -> impl Iterator<Item = &f32> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    pub fn iter_elements_mut(&mut self) -> impl Iterator<Item = &mut f32> {
        self.rows.iter_mut().flat_map(|row| row.iter_mut())
    }

    /// Row-major view of all `M * N` elements.
    pub fn as_flat_slice(&self) -> &[f32] {
        bytemuck::cast_slice(self.rows.as_slice())
    }

    pub fn as_flat_mut_slice(&mut self) -> &mut [f32] {
        bytemuck::cast_slice_mut(self.rows.as_mut_slice())
    }

    /// Zero-copy view for use with `faer` routines.
    pub fn as_mat_ref(&self) -> MatRef<'_, f32> {
        MatRef::from_row_major_slice(self.as_flat_slice(), M, N)
    }

    pub fn as_mat_mut(&mut self) -> MatMut<'_, f32> {
        MatMut::from_row_major_slice_mut(self.as_flat_mut_slice(), M, N)
    }

    /// Returns a new matrix with `f` applied to every element.
    pub fn transform(&self, mut f: impl FnMut(f32) -> f32) -> Self {
        let mut result = *self;
        result.unary_op_in_place(&mut f);
        result
    }

    pub fn add_in_place(&mut self, other: &Self) {
        self.binary_op_in_place(other, |lhs, rhs| lhs + rhs);
    }

    pub fn sub_in_place(&mut self, other: &Self) {
        self.binary_op_in_place(other, |lhs, rhs| lhs - rhs);
    }

    pub fn add_in_place_scaled(&mut self, scalar: f32, other: &Self) {
        self.binary_op_in_place(other, |lhs, rhs| lhs + rhs * scalar);
    }

    pub fn mul_scalar_in_place(&mut self, scalar: f32) {
        self.unary_op_in_place(|x| x * scalar);
    }

    pub fn div_scalar_in_place(&mut self, scalar: f32) {
        self.unary_op_in_place(|x| x / scalar);
    }

    pub fn neg_in_place(&mut self) {
        self.unary_op_in_place(|x| -x);
    }

    #[inline(always)]
    fn unary_op_in_place(&mut self, mut f: impl FnMut(f32) -> f32) {
        for x in self.as_flat_mut_slice() {
            *x = f(*x);
        }
    }

    #[inline(always)]
    fn binary_op_in_place(&mut self, other: &Self, mut f: impl FnMut(f32, f32) -> f32) {
        for i_m in 0..M {
            let self_row = &mut self.rows[i_m];
            let other_row = &other.rows[i_m];
            for i_n in 0..N {
                let lhs = &mut self_row.elements[i_n];
                let rhs = other_row.elements[i_n];
                *lhs = f(*lhs, rhs);
            }
        }
    }

    /// `self · vector`, one row-wise dot product per output element.
    pub fn mul_vector(&self, vector: &Vector<N>) -> Vector<M> {
        let mut result = Vector::zeroed();
        for i_m in 0..M {
            result.elements[i_m] = self.rows[i_m].dot_vector(vector);
        }
        result
    }

    /// `transpose(self) · vector` without materialising the transpose.
    pub fn transpose_mul_vector(&self, vector: &Vector<M>) -> Vector<N> {
        let mut result = Vector::zeroed();
        for i_m in 0..M {
            result.add_in_place_scaled(vector.elements[i_m], &self.rows[i_m]);
        }
        result
    }

    pub fn mul_matrix<const P: usize>(&self, other: &Matrix<N, P>) -> Matrix<M, P> {
        let mut result = Matrix::<M, P>::zeroed();
        for i_m in 0..M {
            for i_p in 0..P {
                for i_n in 0..N {
                    result.rows[i_m].elements[i_p] +=
                        self.rows[i_m].elements[i_n] * other.rows[i_n].elements[i_p];
                }
            }
        }
        result
    }

    pub fn transpose(&self) -> Matrix<N, M> {
        let mut result = Matrix::<N, M>::zeroed();
        for i_m in 0..M {
            for i_n in 0..N {
                result.rows[i_n].elements[i_m] = self.rows[i_m].elements[i_n];
            }
        }
        result
    }

    /// The direct (outer) product: entry `(m, n)` is `lhs[m] * rhs[n]`.
    pub fn outer(lhs: &Vector<M>, rhs: &Vector<N>) -> Self {
        let mut result = Self::zeroed();
        result.add_outer_in_place(lhs, rhs);
        result
    }

    /// `self += outer(lhs, rhs)`, without a temporary.
    pub fn add_outer_in_place(&mut self, lhs: &Vector<M>, rhs: &Vector<N>) {
        for i_m in 0..M {
            self.rows[i_m].add_in_place_scaled(lhs.elements[i_m], rhs);
        }
    }
}

impl<const M: usize, const N: usize> Index<usize> for Matrix<M, N> {
    type Output = Vector<N>;

    #[track_caller]
    fn index(&self, i_m: usize) -> &Vector<N> {
        &self.rows[i_m]
    }
}

impl<const M: usize, const N: usize> IndexMut<usize> for Matrix<M, N> {
    #[track_caller]
    fn index_mut(&mut self, i_m: usize) -> &mut Vector<N> {
        &mut self.rows[i_m]
    }
}

impl<const M: usize, const N: usize> Index<(usize, usize)> for Matrix<M, N> {
    type Output = f32;

    #[track_caller]
    fn index(&self, (i_m, i_n): (usize, usize)) -> &f32 {
        &self.rows[i_m].elements[i_n]
    }
}

impl<const M: usize, const N: usize> IndexMut<(usize, usize)> for Matrix<M, N> {
    #[track_caller]
    fn index_mut(&mut self, (i_m, i_n): (usize, usize)) -> &mut f32 {
        &mut self.rows[i_m].elements[i_n]
    }
}

impl<const M: usize, const N: usize> AddAssign for Matrix<M, N> {
    fn add_assign(&mut self, rhs: Self) {
        self.add_in_place(&rhs);
    }
}

impl<const M: usize, const N: usize> SubAssign for Matrix<M, N> {
    fn sub_assign(&mut self, rhs: Self) {
        self.sub_in_place(&rhs);
    }
}

impl<const M: usize, const N: usize> MulAssign<f32> for Matrix<M, N> {
    fn mul_assign(&mut self, rhs: f32) {
        self.mul_scalar_in_place(rhs);
    }
}

impl<const M: usize, const N: usize> DivAssign<f32> for Matrix<M, N> {
    fn div_assign(&mut self, rhs: f32) {
        self.div_scalar_in_place(rhs);
    }
}

impl<const M: usize, const N: usize> Add for Matrix<M, N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const M: usize, const N: usize> Sub for Matrix<M, N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const M: usize, const N: usize> Neg for Matrix<M, N> {
    type Output = Self;

    fn neg(mut self) -> Self {
        self.neg_in_place();
        self
    }
}

impl<const M: usize, const N: usize> Mul<f32> for Matrix<M, N> {
    type Output = Self;

    fn mul(mut self, rhs: f32) -> Self {
        self *= rhs;
        self
    }
}

impl<const M: usize, const N: usize> Div<f32> for Matrix<M, N> {
    type Output = Self;

    fn div(mut self, rhs: f32) -> Self {
        self /= rhs;
        self
    }
}

impl<const M: usize, const N: usize> Mul<Vector<N>> for Matrix<M, N> {
    type Output = Vector<M>;

    fn mul(self, rhs: Vector<N>) -> Vector<M> {
        self.mul_vector(&rhs)
    }
}

impl<const M: usize, const N: usize, const P: usize> Mul<Matrix<N, P>> for Matrix<M, N> {
    type Output = Matrix<M, P>;

    fn mul(self, rhs: Matrix<N, P>) -> Matrix<M, P> {
        self.mul_matrix(&rhs)
    }
}
