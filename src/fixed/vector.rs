use std::{
    fmt::{self, Debug},
    ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign},
};

use bytemuck::{Pod, Zeroable};
use faer::prelude::*;

use crate::{LstmError, LstmResult};

/// A vector with a length fixed at the type level.
#[derive(Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Vector<const N: usize> {
    pub elements: [f32; N],
}

// Safety: `Vector<N>` is `repr(transparent)` over `[f32; N]`, which is `Pod`.
unsafe impl<const N: usize> Zeroable for Vector<N> {}
unsafe impl<const N: usize> Pod for Vector<N> {}

impl<const N: usize> Debug for Vector<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Debug::fmt(&self.elements, f)
    }
}

impl<const N: usize> Default for Vector<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const N: usize> AsRef<[f32; N]> for Vector<N> {
    fn as_ref(&self) -> &[f32; N] {
        &self.elements
    }
}

impl<const N: usize> AsMut<[f32; N]> for Vector<N> {
    fn as_mut(&mut self) -> &mut [f32; N] {
        &mut self.elements
    }
}

impl<const N: usize> From<[f32; N]> for Vector<N> {
    fn from(elements: [f32; N]) -> Self {
        Self::new(elements)
    }
}

impl<const N: usize> Vector<N> {
    pub const LEN: usize = N;

    pub const fn new(elements: [f32; N]) -> Self {
        Self { elements }
    }

    /// Initializes a vector of size N, all zeroes.
    pub const fn zeroed() -> Self {
        Self::splat(0.0)
    }

    pub const fn splat(value: f32) -> Self {
        Self {
            elements: [value; N],
        }
    }

    pub fn from_fn(f: impl FnMut(usize) -> f32) -> Self {
        Self {
            elements: std::array::from_fn(f),
        }
    }

    /// Copies a runtime-sized slice into a vector.
    /// Fails with `ShapeMismatch` if `slice.len() != N`.
    pub fn try_from_slice(slice: &[f32]) -> LstmResult<Self> {
        let elements: [f32; N] = slice.try_into().map_err(|_| LstmError::ShapeMismatch {
            expected: N,
            got: slice.len(),
        })?;
        Ok(Self { elements })
    }

    /// Heap-allocated zero vector, for sizes that should stay off the stack.
    pub fn new_boxed_zeroed() -> Box<Self> {
        bytemuck::zeroed_box()
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn clear(&mut self) {
        self.fill(0.0);
    }

    pub fn fill(&mut self, value: f32) {
        self.elements.fill(value);
    }

    pub fn get(&self, i: usize) -> Option<f32> {
        self.elements.get(i).copied()
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut f32> {
        self.elements.get_mut(i)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &f32> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut f32> {
        self.elements.iter_mut()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.elements
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.elements
    }

    /// Zero-copy column view for use with `faer` routines.
    pub fn as_col_ref(&self) -> ColRef<'_, f32> {
        ColRef::from_slice(&self.elements)
    }

    pub fn as_col_mut(&mut self) -> ColMut<'_, f32> {
        ColMut::from_slice_mut(&mut self.elements)
    }

    /// Returns a new vector with `f` applied to every element.
    pub fn transform(&self, f: impl FnMut(f32) -> f32) -> Self {
        let mut result = *self;
        result.unary_op_in_place(f);
        result
    }

    pub fn transform_in_place(&mut self, f: impl FnMut(f32) -> f32) {
        self.unary_op_in_place(f);
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

    /// Elementwise product.
    pub fn hadamard(&self, other: &Self) -> Self {
        self.binary_op(other, |lhs, rhs| lhs * rhs)
    }

    /// Elementwise quotient.
    pub fn hadamard_quotient(&self, other: &Self) -> Self {
        self.binary_op(other, |lhs, rhs| lhs / rhs)
    }

    /// `self += lhs ⊙ rhs`, without a temporary.
    pub fn add_hadamard_in_place(&mut self, lhs: &Self, rhs: &Self) {
        for i in 0..N {
            self.elements[i] += lhs.elements[i] * rhs.elements[i];
        }
    }

    pub fn dot_vector(&self, other: &Self) -> f32 {
        let mut sum = 0.0;
        for i in 0..N {
            let lhs = self.elements[i];
            let rhs = other.elements[i];
            sum += lhs * rhs;
        }
        sum
    }

    pub fn norm_squared(&self) -> f32 {
        self.dot_vector(self)
    }

    #[inline(always)]
    fn unary_op_in_place(&mut self, mut f: impl FnMut(f32) -> f32) {
        for i in 0..N {
            let x = &mut self.elements[i];
            *x = f(*x);
        }
    }

    #[inline(always)]
    fn binary_op(&self, other: &Self, mut f: impl FnMut(f32, f32) -> f32) -> Self {
        let mut result = Self::zeroed();
        for i in 0..N {
            let lhs = self.elements[i];
            let rhs = other.elements[i];
            result.elements[i] = f(lhs, rhs);
        }
        result
    }

    #[inline(always)]
    fn binary_op_in_place(&mut self, other: &Self, mut f: impl FnMut(f32, f32) -> f32) {
        for i in 0..N {
            let lhs = &mut self.elements[i];
            let rhs = other.elements[i];
            *lhs = f(*lhs, rhs);
        }
    }
}

impl<const N: usize> Index<usize> for Vector<N> {
    type Output = f32;

    #[track_caller]
    fn index(&self, i: usize) -> &f32 {
        &self.elements[i]
    }
}

impl<const N: usize> IndexMut<usize> for Vector<N> {
    #[track_caller]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.elements[i]
    }
}

impl<const N: usize> AddAssign for Vector<N> {
    fn add_assign(&mut self, rhs: Self) {
        self.add_in_place(&rhs);
    }
}

impl<const N: usize> SubAssign for Vector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        self.sub_in_place(&rhs);
    }
}

impl<const N: usize> MulAssign<f32> for Vector<N> {
    fn mul_assign(&mut self, rhs: f32) {
        self.mul_scalar_in_place(rhs);
    }
}

impl<const N: usize> DivAssign<f32> for Vector<N> {
    fn div_assign(&mut self, rhs: f32) {
        self.div_scalar_in_place(rhs);
    }
}

impl<const N: usize> Add for Vector<N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const N: usize> Sub for Vector<N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const N: usize> Neg for Vector<N> {
    type Output = Self;

    fn neg(mut self) -> Self {
        self.neg_in_place();
        self
    }
}

impl<const N: usize> Mul<f32> for Vector<N> {
    type Output = Self;

    fn mul(mut self, rhs: f32) -> Self {
        self *= rhs;
        self
    }
}

impl<const N: usize> Mul<Vector<N>> for f32 {
    type Output = Vector<N>;

    fn mul(self, rhs: Vector<N>) -> Vector<N> {
        rhs * self
    }
}

impl<const N: usize> Div<f32> for Vector<N> {
    type Output = Self;

    fn div(mut self, rhs: f32) -> Self {
        self /= rhs;
        self
    }
}
